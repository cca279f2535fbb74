use chrono::{DateTime, Datelike, Local};

use super::time;

/// Linear end-of-month projection from the month-to-date cost.
pub fn project_month_cost(month_to_date: f64, day_of_month: u32, days_in_month: u32) -> f64 {
    if day_of_month == 0 {
        return 0.0;
    }

    month_to_date / day_of_month as f64 * days_in_month as f64
}

/// Consumption against the user's monthly budget target.
///
/// The unclamped ratio drives over-budget detection; only the display
/// value is clamped. Not constructible for a target of zero or less,
/// which means "no budget set" rather than "0% consumed".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    pub month_to_date: f64,
    pub target: f64,
    pub ratio_pct: f64,
}

impl BudgetStatus {
    pub fn evaluate(month_to_date: f64, target: f64) -> Option<Self> {
        if target <= 0.0 {
            return None;
        }

        Some(Self {
            month_to_date,
            target,
            ratio_pct: month_to_date / target * 100.0,
        })
    }

    pub fn over_budget(&self) -> bool {
        self.ratio_pct > 100.0
    }

    pub fn display_ratio_pct(&self) -> f64 {
        self.ratio_pct.clamp(0.0, 200.0)
    }
}

/// Month outlook derived from the latest reading: linear cost
/// projection plus budget consumption, when a target is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostOutlook {
    pub month_to_date: f64,
    pub projected_cost: f64,
    pub budget: Option<BudgetStatus>,
}

impl CostOutlook {
    pub fn derive(month_to_date: f64, at: DateTime<Local>, budget_target: f64) -> Self {
        let day = at.day();
        let days = time::days_in_month(at.year(), at.month());

        Self {
            month_to_date,
            projected_cost: project_month_cost(month_to_date, day, days),
            budget: BudgetStatus::evaluate(month_to_date, budget_target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::parse_timestamp;

    #[test]
    fn test_linear_projection() {
        assert_eq!(project_month_cost(100_000.0, 10, 30), 300_000.0);
        assert_eq!(project_month_cost(100_000.0, 0, 30), 0.0);
    }

    #[test]
    fn test_over_budget_uses_unclamped_ratio() {
        let status = BudgetStatus::evaluate(300_000.0, 250_000.0).unwrap();

        assert_eq!(status.ratio_pct, 120.0);
        assert!(status.over_budget());
        assert_eq!(status.display_ratio_pct(), 120.0);
    }

    #[test]
    fn test_display_ratio_clamped_at_200() {
        let status = BudgetStatus::evaluate(600_000.0, 100_000.0).unwrap();

        assert_eq!(status.ratio_pct, 600.0);
        assert_eq!(status.display_ratio_pct(), 200.0);
        assert!(status.over_budget());
    }

    #[test]
    fn test_no_target_means_no_status() {
        assert_eq!(BudgetStatus::evaluate(100.0, 0.0), None);
        assert_eq!(BudgetStatus::evaluate(100.0, -5.0), None);
    }

    #[test]
    fn test_outlook() {
        let at = parse_timestamp("2025-06-10 12:00:00").unwrap();

        let outlook = CostOutlook::derive(100_000.0, at, 250_000.0);

        assert_eq!(outlook.projected_cost, 300_000.0);
        let budget = outlook.budget.unwrap();
        assert_eq!(budget.ratio_pct, 40.0);
        assert!(!budget.over_budget());
    }
}

use chrono::{DateTime, Local, NaiveDate};

use crate::core::reading::Reading;
use crate::core::unit::{KiloWattHours, Watt};

/// Aggregate of one calendar day. Cumulative counters only increase
/// within the day, so the running maximum tracks the latest valid
/// sample while shrugging off the occasional lower stray value.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub energy: Option<KiloWattHours>,
    pub cost: Option<f64>,
    pub peak_power: Option<Watt>,
    pub peak_at: Option<DateTime<Local>>,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            energy: None,
            cost: None,
            peak_power: None,
            peak_at: None,
        }
    }

    /// Folds one reading in. Absent fields stay out of the fold, and a
    /// later sample equal to the current maximum does not take over the
    /// peak slot (first maximum wins).
    pub fn absorb(&mut self, reading: &Reading) {
        if let Some(energy) = reading.energy_today
            && self.energy.is_none_or(|cur| energy > cur)
        {
            self.energy = Some(energy);
        }

        if let Some(cost) = reading.cost_today
            && self.cost.is_none_or(|cur| cost > cur)
        {
            self.cost = Some(cost);
        }

        if let Some(power) = reading.power
            && self.peak_power.is_none_or(|cur| power > cur)
        {
            self.peak_power = Some(power);
            self.peak_at = reading.timestamp;
        }
    }
}

/// Aggregate of one week-of-month. Energy and cost are sums of the
/// distinct per-day maxima, which recovers day-by-day deltas of the
/// cumulative counters into a week-level total. The peak is taken over
/// the week's raw readings, not over the day buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub index: u32,
    pub energy: Option<KiloWattHours>,
    pub cost: Option<f64>,
    pub peak_power: Option<Watt>,
    pub peak_at: Option<DateTime<Local>>,
}

impl WeekBucket {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            energy: None,
            cost: None,
            peak_power: None,
            peak_at: None,
        }
    }

    pub fn add_day(&mut self, day: &DayBucket) {
        if let Some(energy) = day.energy {
            self.energy = Some(match self.energy {
                Some(total) => total + energy,
                None => energy,
            });
        }

        if let Some(cost) = day.cost {
            self.cost = Some(self.cost.unwrap_or(0.0) + cost);
        }
    }

    pub fn absorb_peak(&mut self, reading: &Reading) {
        if let Some(power) = reading.power
            && self.peak_power.is_none_or(|cur| power > cur)
        {
            self.peak_power = Some(power);
            self.peak_at = reading.timestamp;
        }
    }
}

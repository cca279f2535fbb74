use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;

use crate::automation::{ActuatorIntent, Rule, RuleEngine, RuleSet};
use crate::core::aggregate::{self, MonthKey, MonthlyReport, WeeklyReport};
use crate::core::budget::CostOutlook;
use crate::core::reading::Reading;
use crate::core::store::ReadingStore;
use crate::core::time;
use crate::core::window::select_window;
use crate::port::{CommandSink, ConfigStore, ReadingFeed};

/// Bulk load covers the most recent 30 days.
pub const HISTORY_DAYS: u32 = 30;

const DEFAULT_RANGE_HOURS: u32 = 1;
const RANGE_HOURS: std::ops::RangeInclusive<u32> = 1..=6;

/// User-set view state, loaded once at session start with documented
/// fallbacks and persisted through the config store on every change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub range_hours: u32,
    pub month: Option<MonthKey>,
    pub budget_target: f64,
}

impl SessionConfig {
    /// Fallbacks: range 1 hour when absent or out of 1..=6, month the
    /// most recent one with data, budget target 0 (unset).
    pub fn load(store: &impl ConfigStore, available_months: &[MonthKey]) -> Self {
        let range_hours = store
            .range_hours()
            .filter(|h| RANGE_HOURS.contains(h))
            .unwrap_or(DEFAULT_RANGE_HOURS);

        let month = store
            .month()
            .filter(|m| m.is_valid())
            .or_else(|| available_months.last().copied());

        let budget_target = store.budget_target().filter(|t| t.is_finite() && *t >= 0.0).unwrap_or(0.0);

        Self {
            range_hours,
            month,
            budget_target,
        }
    }
}

/// One monitoring session for one device.
///
/// Owns the reading store and the rule engine; nothing else mutates
/// them. Aggregates are recomputed from a snapshot per call instead of
/// being maintained incrementally, which is cheap over the bounded
/// store.
pub struct Session<F, S, C> {
    device_id: String,
    feed: F,
    sink: S,
    config_store: C,
    store: ReadingStore,
    engine: RuleEngine,
    config: SessionConfig,
}

impl<F, S, C> Session<F, S, C>
where
    F: ReadingFeed,
    S: CommandSink,
    C: ConfigStore,
{
    pub fn new(device_id: impl Into<String>, feed: F, sink: S, config_store: C) -> Self {
        let config = SessionConfig::load(&config_store, &[]);

        Self {
            device_id: device_id.into(),
            feed,
            sink,
            config_store,
            store: ReadingStore::new(),
            engine: RuleEngine::new(),
            config,
        }
    }

    /// Bulk load, then the push loop. Returns when the token is
    /// cancelled or the feed closes. A bulk load still in flight at
    /// cancellation is abandoned, never applied.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut rx = self.feed.subscribe(&self.device_id);

        let loaded = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Session for {} cancelled during bulk load", self.device_id);
                return;
            }
            res = self.feed.bulk_load(&self.device_id, HISTORY_DAYS) => res,
        };

        match loaded {
            Ok(raw) => {
                self.store.ingest_initial(raw.into_iter().map(Reading::from).collect());
                tracing::debug!("Loaded {} readings for {}", self.store.len(), self.device_id);
            }
            //non-fatal: the session keeps running on an empty store
            Err(e) => tracing::error!("Error loading reading history for {}: {:?}", self.device_id, e),
        }

        self.config = SessionConfig::load(&self.config_store, &self.month_options());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Session for {} cancelled", self.device_id);
                    break;
                }
                msg = rx.recv() => match msg {
                    Some(raw) => self.handle_push(raw.into()).await,
                    None => {
                        tracing::error!("Reading feed for {} closed", self.device_id);
                        break;
                    }
                }
            }
        }
    }

    async fn handle_push(&mut self, reading: Reading) {
        let id = reading.id;

        //dedup is the only defense against reconnect replays
        if !self.store.ingest_one(reading.clone()) {
            tracing::debug!("Duplicate reading {} for {} ignored", id, self.device_id);
            return;
        }

        //re-read the persisted rules each cycle so the latest edit wins
        let rules = RuleSet::merged(self.config_store.rule_overrides());

        for intent in self.engine.evaluate(&rules, &reading) {
            if let Err(e) = self.sink.set_channel(&self.device_id, intent).await {
                //engine memory stays as commanded: at most one attempt per edge
                tracing::error!("Error sending actuator command {:?} for {}: {:?}", intent, self.device_id, e);
            }
        }
    }

    //---- on-demand views, recomputed from a snapshot per call

    pub fn live_window(&self) -> Vec<Reading> {
        let now = time::now();
        let from = now - chrono::Duration::hours(self.config.range_hours as i64);
        select_window(&self.store.snapshot(), from, now)
    }

    pub fn weekly(&self) -> Option<WeeklyReport> {
        aggregate::compute_weekly(&self.store.snapshot(), time::now())
    }

    pub fn monthly(&self) -> Option<MonthlyReport> {
        let month = self.config.month?;
        aggregate::compute_monthly(&self.store.snapshot(), month)
    }

    pub fn power_profile(&self, n: usize) -> Vec<Reading> {
        aggregate::last_n_samples(&self.store.snapshot(), n).to_vec()
    }

    pub fn cost_outlook(&self) -> Option<CostOutlook> {
        let latest = self.store.latest()?;
        let month_to_date = latest.cost_month?;
        let at = latest.timestamp.unwrap_or_else(time::now);

        Some(CostOutlook::derive(month_to_date, at, self.config.budget_target))
    }

    pub fn month_options(&self) -> Vec<MonthKey> {
        aggregate::month_options(&self.store.snapshot())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    //---- user edits, persisted through the config store

    pub fn select_range(&mut self, hours: u32) -> anyhow::Result<()> {
        anyhow::ensure!(RANGE_HOURS.contains(&hours), "range must be within {:?} hours", RANGE_HOURS);

        self.config_store.set_range_hours(hours)?;
        self.config.range_hours = hours;
        Ok(())
    }

    pub fn select_month(&mut self, month: MonthKey) -> anyhow::Result<()> {
        anyhow::ensure!(month.is_valid(), "invalid month key {:?}", month);

        self.config_store.set_month(month)?;
        self.config.month = Some(month);
        Ok(())
    }

    pub fn set_budget_target(&mut self, target: f64) -> anyhow::Result<()> {
        anyhow::ensure!(target.is_finite() && target >= 0.0, "budget target must be non-negative");

        self.config_store.set_budget_target(target)?;
        self.config.budget_target = target;
        Ok(())
    }

    pub fn update_rule(&self, channel: usize, rule: Rule) -> anyhow::Result<()> {
        self.config_store.set_rule(channel, rule)
    }

    //---- manual control, independent of the automation track

    /// Manual toggles bypass rule evaluation and leave the engine
    /// memory alone, so they never suppress the next automatic edge.
    pub async fn manual_toggle(&self, channel: usize, on: bool) -> anyhow::Result<()> {
        self.sink
            .set_channel(&self.device_id, ActuatorIntent::manual(channel, on))
            .await
    }

    pub async fn reset_energy(&self, reference_kwh: f64, reference_at: DateTime<Local>) -> anyhow::Result<()> {
        self.sink.reset_energy(&self.device_id, reference_kwh, reference_at).await
    }
}

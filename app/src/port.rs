#![allow(async_fn_in_trait)]

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::automation::{ActuatorIntent, Rule};
use crate::core::aggregate::MonthKey;
use crate::core::reading::RawReading;

/// Inbound data source: bulk history plus a live push feed. The
/// transport behind it is none of the core's business.
pub trait ReadingFeed {
    /// Most recent `days` days of readings, ascending by timestamp.
    async fn bulk_load(&self, device_id: &str, days: u32) -> Result<Vec<RawReading>>;

    /// Live feed of newly inserted readings. Ids arrive in
    /// non-decreasing order, timestamps make no such promise.
    fn subscribe(&self, device_id: &str) -> mpsc::Receiver<RawReading>;
}

/// Outbound command sink. Calls may fail; the core reports and moves on.
pub trait CommandSink {
    async fn set_channel(&self, device_id: &str, intent: ActuatorIntent) -> Result<()>;

    /// One-shot reset of the cumulative energy counter.
    async fn reset_energy(&self, device_id: &str, reference_kwh: f64, reference_at: DateTime<Local>) -> Result<()>;
}

/// Key-value persistence for the session configuration. Reads swallow
/// corrupt values (the session falls back to defaults); writes report
/// their failure.
pub trait ConfigStore {
    fn range_hours(&self) -> Option<u32>;
    fn set_range_hours(&self, hours: u32) -> Result<()>;

    fn month(&self) -> Option<MonthKey>;
    fn set_month(&self, month: MonthKey) -> Result<()>;

    fn budget_target(&self) -> Option<f64>;
    fn set_budget_target(&self, target: f64) -> Result<()>;

    /// Persisted per-channel rule overrides. Channels without an
    /// override fall back to the built-in default.
    fn rule_overrides(&self) -> Vec<(usize, Rule)>;
    fn set_rule(&self, channel: usize, rule: Rule) -> Result<()>;
}

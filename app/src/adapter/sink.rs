use anyhow::Result;
use chrono::{DateTime, Local};

use crate::automation::ActuatorIntent;
use crate::port::CommandSink;

/// Command sink that only logs. The real command channel is an
/// external collaborator; this keeps the wiring honest in development.
#[derive(Debug, Clone)]
pub struct LoggingCommandSink;

impl CommandSink for LoggingCommandSink {
    async fn set_channel(&self, device_id: &str, intent: ActuatorIntent) -> Result<()> {
        tracing::info!(
            "Channel {} of {} -> {} ({})",
            intent.channel,
            device_id,
            if intent.on { "ON" } else { "OFF" },
            intent.reason
        );
        Ok(())
    }

    async fn reset_energy(&self, device_id: &str, reference_kwh: f64, reference_at: DateTime<Local>) -> Result<()> {
        tracing::info!(
            "Resetting energy counter of {} to {} kWh as of {}",
            device_id,
            reference_kwh,
            reference_at
        );
        Ok(())
    }
}

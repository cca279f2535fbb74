use super::{ActuatorIntent, CHANNEL_COUNT, RuleOperator, RuleSet};
use crate::core::reading::Reading;

/// Edge-triggered evaluation of the channel rules against the latest
/// reading.
///
/// Per channel the engine remembers the last commanded state and emits
/// an intent only on a transition, so a value that stays above the
/// threshold produces exactly one command. The memory is in-process
/// only; after a restart the worst case is one redundant command.
#[derive(Debug, Default)]
pub struct RuleEngine {
    last_commanded: [Option<bool>; CHANNEL_COUNT],
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one evaluation cycle. The caller passes the rule set as
    /// persisted right now, so concurrent edits take effect on the next
    /// cycle at the latest.
    ///
    /// The memory is updated when the intent is handed out, not when
    /// the sink confirms it: a failed emission is not retried until the
    /// sensor crosses the threshold in the opposite direction and back
    /// (at most one attempt per edge).
    pub fn evaluate(&mut self, rules: &RuleSet, reading: &Reading) -> Vec<ActuatorIntent> {
        let mut intents = vec![];

        for (channel, rule) in rules.iter() {
            if !rule.enabled {
                continue;
            }

            //a missing sensor value skips the channel without touching its state
            let Some(value) = rule.source.value_of(reading) else {
                continue;
            };

            let desired_on = match rule.operator {
                RuleOperator::GreaterThan => value > rule.threshold,
                RuleOperator::LessThan => value < rule.threshold,
            };

            if self.last_commanded[channel] == Some(desired_on) {
                continue;
            }

            self.last_commanded[channel] = Some(desired_on);
            intents.push(ActuatorIntent {
                channel,
                on: desired_on,
                reason: rule.source.reason(),
            });
        }

        intents
    }
}

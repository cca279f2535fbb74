mod engine;

pub use engine::RuleEngine;

use serde::{Deserialize, Serialize};

use crate::core::reading::Reading;

/// Actuator channels are a fixed hardware property of the device.
pub const CHANNEL_COUNT: usize = 4;

/// Sensor the rule reads. Closed enum: adding a source means extending
/// the match in [`RuleSource::value_of`], not an open string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Temperature,
    Humidity,
    Illuminance,
}

impl RuleSource {
    pub fn value_of(&self, reading: &Reading) -> Option<f64> {
        match self {
            RuleSource::Temperature => reading.temperature.map(|v| v.0),
            RuleSource::Humidity => reading.humidity.map(|v| v.0),
            RuleSource::Illuminance => reading.illuminance.map(|v| v.0),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RuleSource::Temperature => "auto_temperature",
            RuleSource::Humidity => "auto_humidity",
            RuleSource::Illuminance => "auto_illuminance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    GreaterThan,
    LessThan,
}

/// Threshold rule of one actuator channel. Rules always exist for all
/// channels; persisted overrides replace the built-in default wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub enabled: bool,
    pub source: RuleSource,
    pub operator: RuleOperator,
    pub threshold: f64,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            enabled: false,
            source: RuleSource::Temperature,
            operator: RuleOperator::GreaterThan,
            threshold: 30.0,
        }
    }
}

/// The full rule configuration, one rule per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: [Rule; CHANNEL_COUNT],
}

impl RuleSet {
    pub fn defaults() -> Self {
        Self {
            rules: [Rule::default(); CHANNEL_COUNT],
        }
    }

    /// Defaults with persisted per-channel overrides merged on top.
    /// Overrides for channels outside 0..4 are ignored.
    pub fn merged(overrides: impl IntoIterator<Item = (usize, Rule)>) -> Self {
        let mut set = Self::defaults();
        for (channel, rule) in overrides {
            if channel < CHANNEL_COUNT {
                set.rules[channel] = rule;
            }
        }
        set
    }

    pub fn get(&self, channel: usize) -> Option<&Rule> {
        self.rules.get(channel)
    }

    pub fn set(&mut self, channel: usize, rule: Rule) {
        if channel < CHANNEL_COUNT {
            self.rules[channel] = rule;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules.iter().enumerate()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Binary command for one actuator channel, ready for the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuatorIntent {
    pub channel: usize,
    pub on: bool,
    pub reason: &'static str,
}

impl ActuatorIntent {
    pub fn manual(channel: usize, on: bool) -> Self {
        Self {
            channel,
            on,
            reason: "web_manual",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_ignores_out_of_range_channel() {
        let rule = Rule {
            enabled: true,
            source: RuleSource::Humidity,
            operator: RuleOperator::LessThan,
            threshold: 40.0,
        };

        let set = RuleSet::merged(vec![(1, rule), (7, rule)]);

        assert_eq!(set.get(1), Some(&rule));
        assert_eq!(set.get(0), Some(&Rule::default()));
        assert_eq!(set.get(7), None);
    }

    #[test]
    fn test_rule_serde_round_trip() {
        let rule = Rule {
            enabled: true,
            source: RuleSource::Illuminance,
            operator: RuleOperator::LessThan,
            threshold: 120.5,
        };

        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"illuminance\""));
        assert!(json.contains("\"less_than\""));

        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}

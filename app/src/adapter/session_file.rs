use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::automation::Rule;
use crate::core::aggregate::MonthKey;
use crate::port::ConfigStore;

/// Session configuration persisted as a small JSON file.
///
/// Reads go back to the file every time, so an edit from elsewhere is
/// visible on the next evaluation cycle. A missing or corrupt file
/// degrades to the defaults instead of failing the session.
pub struct FileConfigStore {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedConfig {
    #[serde(default)]
    range_hours: Option<u32>,
    #[serde(default)]
    month: Option<MonthKey>,
    #[serde(default)]
    budget_target: Option<f64>,
    #[serde(default)]
    rules: Vec<(usize, Rule)>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> PersistedConfig {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            //missing file is the normal first run
            Err(_) => return PersistedConfig::default(),
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Corrupt session config at {:?}, using defaults: {}", self.path, e);
                PersistedConfig::default()
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut PersistedConfig)) -> Result<()> {
        let mut config = self.read();
        apply(&mut config);

        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(&self.path, json).with_context(|| format!("Error writing session config to {:?}", self.path))
    }
}

impl ConfigStore for FileConfigStore {
    fn range_hours(&self) -> Option<u32> {
        self.read().range_hours
    }

    fn set_range_hours(&self, hours: u32) -> Result<()> {
        self.update(|c| c.range_hours = Some(hours))
    }

    fn month(&self) -> Option<MonthKey> {
        self.read().month
    }

    fn set_month(&self, month: MonthKey) -> Result<()> {
        self.update(|c| c.month = Some(month))
    }

    fn budget_target(&self) -> Option<f64> {
        self.read().budget_target
    }

    fn set_budget_target(&self, target: f64) -> Result<()> {
        self.update(|c| c.budget_target = Some(target))
    }

    fn rule_overrides(&self) -> Vec<(usize, Rule)> {
        self.read().rules
    }

    fn set_rule(&self, channel: usize, rule: Rule) -> Result<()> {
        self.update(|c| {
            c.rules.retain(|(existing, _)| *existing != channel);
            c.rules.push((channel, rule));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{RuleOperator, RuleSource};

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = FileConfigStore::new(temp_path("missing"));

        assert_eq!(store.range_hours(), None);
        assert_eq!(store.month(), None);
        assert!(store.rule_overrides().is_empty());
    }

    #[test]
    fn test_write_then_read_back() {
        let path = temp_path("roundtrip");
        let store = FileConfigStore::new(path.clone());

        store.set_range_hours(3).unwrap();
        store.set_budget_target(250_000.0).unwrap();
        let rule = Rule {
            enabled: true,
            source: RuleSource::Humidity,
            operator: RuleOperator::LessThan,
            threshold: 40.0,
        };
        store.set_rule(2, rule).unwrap();
        store.set_rule(2, rule).unwrap(); //idempotent, no duplicate entry

        assert_eq!(store.range_hours(), Some(3));
        assert_eq!(store.budget_target(), Some(250_000.0));
        assert_eq!(store.rule_overrides(), vec![(2, rule)]);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_degrades_to_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileConfigStore::new(path.clone());
        assert_eq!(store.range_hours(), None);

        let _ = std::fs::remove_file(path);
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("session-config-{}-{}.json", tag, std::process::id()))
    }
}

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub device: DeviceSettings,
    pub feed: FeedSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().separator("_").list_separator(","));

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub state_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub default_level: String,
}

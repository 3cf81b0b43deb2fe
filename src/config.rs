use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tickfan_stream::SourceConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    pub interval_ms: u64,
    pub symbols: Vec<String>,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub filter: String,
    pub json: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default values
            .set_default("source.interval_ms", 1000)?
            .set_default("source.symbols", vec!["GBP", "USD"])?
            .set_default("source.queue_capacity", 1000)?
            .set_default("logging.filter", "tickfan=info")?
            .set_default("logging.json", false)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // TICKFAN__SOURCE__SYMBOLS=GBP,USD,EUR
            .add_source(
                Environment::with_prefix("TICKFAN")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("source.symbols")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl SourceSettings {
    /// Unvalidated; the source rejects bad values when it is built.
    pub fn to_source_config(&self) -> SourceConfig {
        SourceConfig {
            interval: Duration::from_millis(self.interval_ms),
            symbols: self.symbols.clone(),
            queue_capacity: self.queue_capacity,
        }
    }
}

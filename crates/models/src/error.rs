use std::time::Duration;

use thiserror::Error;

/// Rejected construction-time configuration. Raised before any task starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("symbol set must not be empty")]
    EmptySymbols,

    #[error("queue capacity must be positive")]
    ZeroQueueCapacity,

    #[error("tick interval must be non-zero, got {interval:?}")]
    ZeroInterval { interval: Duration },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("event source was already started")]
    AlreadyStarted,

    #[error("invalid source configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A single event a consumer could not process. Reported and absorbed by the
/// consumer's own loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("consumer {consumer} failed on {symbol}: {reason}")]
pub struct ConsumerError {
    pub consumer: String,
    pub symbol: String,
    pub reason: String,
}

impl ConsumerError {
    pub fn new(consumer: impl Into<String>, symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsumerError>;

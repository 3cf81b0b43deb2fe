use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format tag stamped on generated trades.
pub const DEFAULT_FORMAT: &str = "16";

/// One trade tick. Plain value: cloned per consumer on delivery, no identity
/// beyond its fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub format: String,
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(symbol: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self::at(symbol, quantity, price, Utc::now())
    }

    pub fn at(symbol: impl Into<String>, quantity: i64, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            symbol: symbol.into(),
            quantity,
            price,
            timestamp,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} {} {} {} {}}}",
            self.format,
            self.symbol,
            self.quantity,
            self.price,
            self.timestamp.to_rfc3339()
        )
    }
}

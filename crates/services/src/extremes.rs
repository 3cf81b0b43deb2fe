// Running per-symbol price extremes

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tickfan_models::{ConsumerError, Event, Result};
use tickfan_stream::{Consumer, Inbox};

use crate::emitter::{Emitter, TracingEmitter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub min: f64,
    pub max: f64,
}

impl Extremes {
    fn first(price: f64) -> Self {
        Self { min: price, max: price }
    }

    fn observe(&mut self, price: f64) {
        if price > self.max {
            self.max = price;
        }
        if price < self.min {
            self.min = price;
        }
    }
}

/// Tracks the lowest and highest price seen per symbol for the whole run.
///
/// Per symbol, `max` never decreases and `min` never increases. Emits a `MAX`
/// and a `MIN` line after every event.
pub struct ExtremesConsumer {
    inbox: Inbox,
    emitter: Arc<dyn Emitter>,
    extremes: HashMap<String, Extremes>,
}

impl ExtremesConsumer {
    pub fn new() -> Self {
        Self::with_emitter(Arc::new(TracingEmitter))
    }

    pub fn with_emitter(emitter: Arc<dyn Emitter>) -> Self {
        Self {
            inbox: Inbox::new(),
            emitter,
            extremes: HashMap::new(),
        }
    }

    pub fn extremes(&self, symbol: &str) -> Option<Extremes> {
        self.extremes.get(symbol).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, Extremes> {
        self.extremes.clone()
    }

    /// Folds `event` into its symbol's bounds and returns them.
    ///
    /// A NaN price is rejected and leaves the bounds untouched; accepted it
    /// would pin both bounds for the rest of the run.
    pub fn record(&mut self, event: &Event) -> Result<Extremes> {
        if event.price.is_nan() {
            return Err(ConsumerError::new(self.name(), &event.symbol, "price is NaN"));
        }

        Ok(*self
            .extremes
            .entry(event.symbol.clone())
            .and_modify(|e| e.observe(event.price))
            .or_insert_with(|| Extremes::first(event.price)))
    }
}

impl Default for ExtremesConsumer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Consumer for ExtremesConsumer {
    fn name(&self) -> &str {
        "extremes"
    }

    async fn process(&mut self, event: &Event) -> Result<()> {
        let current = self.record(event)?;

        self.emitter.emit(format!("MAX: {} {}", event.symbol, current.max));
        self.emitter.emit(format!("MIN: {} {}", event.symbol, current.min));
        Ok(())
    }

    fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }
}

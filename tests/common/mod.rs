// Shared helpers for pipeline tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tickfan_models::{Event, Result};
use tickfan_stream::{Consumer, Inbox};

pub type Log = Arc<Mutex<Vec<Event>>>;

/// Records every event it processes, optionally waiting `delay` after each.
pub struct RecordingConsumer {
    name: String,
    inbox: Inbox,
    log: Log,
    delay: Option<Duration>,
}

impl RecordingConsumer {
    pub fn new(name: &str) -> (Self, Log) {
        let log = Log::default();
        let consumer = Self {
            name: name.to_string(),
            inbox: Inbox::new(),
            log: Arc::clone(&log),
            delay: None,
        };
        (consumer, log)
    }

    pub fn slow(name: &str, delay: Duration) -> (Self, Log) {
        let (mut consumer, log) = Self::new(name);
        consumer.delay = Some(delay);
        (consumer, log)
    }
}

#[async_trait]
impl Consumer for RecordingConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&mut self, event: &Event) -> Result<()> {
        self.log.lock().push(event.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }
}

/// Deterministic trade sequence with distinct quantities.
pub fn fixed_trades(count: usize) -> Vec<Event> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    (0..count)
        .map(|i| {
            let symbol = ["GBP", "USD", "EUR"][i % 3];
            let price = ((i * 37) % 101) as f64 / 10.0;
            Event::at(symbol, i as i64, price, base + chrono::Duration::milliseconds(i as i64))
        })
        .collect()
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

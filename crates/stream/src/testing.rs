// Test consumer that records what it sees

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tickfan_models::{ConsumerError, Event, Result};

use crate::consumer::Consumer;
use crate::inbox::Inbox;

pub(crate) struct RecordingConsumer {
    name: String,
    inbox: Inbox,
    seen: Arc<Mutex<Vec<Event>>>,
    failed: Arc<Mutex<Vec<Event>>>,
    fail_on: Option<String>,
    delay: Option<Duration>,
}

impl RecordingConsumer {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inbox: Inbox::new(),
            seen: Arc::new(Mutex::new(Vec::new())),
            failed: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            delay: None,
        }
    }

    pub(crate) fn failing_on(mut self, symbol: &str) -> Self {
        self.fail_on = Some(symbol.to_string());
        self
    }

    /// Waits `delay` (asynchronously) before recording each event.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// A detached recorder sharing this one's logs, for reading after the
    /// original has moved into a loop.
    pub(crate) fn clone_view(&self) -> Self {
        Self {
            name: self.name.clone(),
            inbox: Inbox::new(),
            seen: Arc::clone(&self.seen),
            failed: Arc::clone(&self.failed),
            fail_on: None,
            delay: None,
        }
    }

    pub(crate) fn seen(&self) -> Vec<Event> {
        self.seen.lock().clone()
    }

    pub(crate) fn failed(&self) -> Vec<Event> {
        self.failed.lock().clone()
    }
}

#[async_trait]
impl Consumer for RecordingConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&mut self, event: &Event) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.seen.lock().push(event.clone());
        match &self.fail_on {
            Some(symbol) if *symbol == event.symbol => {
                self.failed.lock().push(event.clone());
                Err(ConsumerError::new(&self.name, &event.symbol, "rejected by test"))
            }
            _ => Ok(()),
        }
    }

    fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }
}

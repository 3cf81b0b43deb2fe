// Pass-through consumer that prints every trade

use std::sync::Arc;

use async_trait::async_trait;
use tickfan_models::{Event, Result};
use tickfan_stream::{Consumer, Inbox};

use crate::emitter::{Emitter, TracingEmitter};

pub struct LogConsumer {
    inbox: Inbox,
    emitter: Arc<dyn Emitter>,
}

impl LogConsumer {
    pub fn new() -> Self {
        Self::with_emitter(Arc::new(TracingEmitter))
    }

    pub fn with_emitter(emitter: Arc<dyn Emitter>) -> Self {
        Self {
            inbox: Inbox::new(),
            emitter,
        }
    }
}

impl Default for LogConsumer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Consumer for LogConsumer {
    fn name(&self) -> &str {
        "log"
    }

    async fn process(&mut self, event: &Event) -> Result<()> {
        self.emitter.emit(format!("GOT TRANS {event}"));
        Ok(())
    }

    fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::BufferEmitter;

    #[tokio::test]
    async fn test_one_line_per_event() {
        let buffer = BufferEmitter::new();
        let mut logger = LogConsumer::with_emitter(Arc::new(buffer.clone()));

        let first = Event::new("GBP", 5, 0.5);
        let second = Event::new("USD", 6, 0.75);
        logger.process(&first).await.unwrap();
        logger.process(&second).await.unwrap();

        assert_eq!(
            buffer.lines(),
            vec![format!("GOT TRANS {first}"), format!("GOT TRANS {second}")]
        );
    }
}

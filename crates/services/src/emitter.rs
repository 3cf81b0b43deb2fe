// Where consumers write their human-readable lines

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

pub trait Emitter: Send + Sync {
    fn emit(&self, line: String);
}

/// Emits each line as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl Emitter for TracingEmitter {
    fn emit(&self, line: String) {
        info!(target: "tickfan::output", "{line}");
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferEmitter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl Emitter for BufferEmitter {
    fn emit(&self, line: String) {
        self.lines.lock().push(line);
    }
}

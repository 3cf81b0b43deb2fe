// One processing loop per consumer

use tickfan_models::Event;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::consumer::Consumer;

/// Handles to the running consumer loops.
pub struct ConsumerGroup {
    handles: Vec<JoinHandle<Box<dyn Consumer>>>,
    detached: Vec<Box<dyn Consumer>>,
}

impl ConsumerGroup {
    /// Number of loops actually started.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every loop to exit and returns the consumers, started ones
    /// first. Loops exit only once the token passed to [`run`] is cancelled.
    pub async fn join(self) -> Vec<Box<dyn Consumer>> {
        let mut consumers = Vec::with_capacity(self.handles.len() + self.detached.len());
        for handle in self.handles {
            match handle.await {
                Ok(consumer) => consumers.push(consumer),
                Err(err) => error!(error = %err, "consumer loop aborted"),
            }
        }
        consumers.extend(self.detached);
        consumers
    }
}

/// Spawns one loop per consumer and returns without waiting on them.
///
/// A consumer whose inbox is already attached to another loop is not started
/// again; it is handed back untouched by [`ConsumerGroup::join`].
pub fn run(token: &CancellationToken, consumers: Vec<Box<dyn Consumer>>) -> ConsumerGroup {
    let mut handles = Vec::with_capacity(consumers.len());
    let mut detached = Vec::new();

    for mut consumer in consumers {
        let Some(inbox) = consumer.inbox_mut().take_receiver() else {
            warn!(consumer = consumer.name(), "inbox already attached, not starting loop");
            detached.push(consumer);
            continue;
        };
        debug!(consumer = consumer.name(), "starting consumer loop");
        handles.push(tokio::spawn(consume(consumer, inbox, token.clone())));
    }

    info!(consumers = handles.len(), "consumer loops started");
    ConsumerGroup { handles, detached }
}

async fn consume(
    mut consumer: Box<dyn Consumer>,
    mut inbox: mpsc::Receiver<Event>,
    token: CancellationToken,
) -> Box<dyn Consumer> {
    let mut processed: u64 = 0;
    let mut failed: u64 = 0;

    loop {
        let event = tokio::select! {
            biased;
            () = token.cancelled() => break,
            received = inbox.recv() => match received {
                Some(event) => event,
                None => break,
            },
        };

        processed += 1;
        if let Err(err) = consumer.process(&event).await {
            failed += 1;
            warn!(consumer = consumer.name(), error = %err, "failed to process event");
        }
    }

    info!(consumer = consumer.name(), processed, failed, "consumer done");
    consumer
}

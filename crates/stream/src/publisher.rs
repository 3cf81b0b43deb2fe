// Fan-out publisher: pulls from one source and hands every event to every consumer

use tickfan_models::{Event, SourceError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::consumer::Consumer;
use crate::inbox::InboxHandle;
use crate::source::{EventSource, RandomEventSource};

/// A registered consumer as the publisher sees it: a name and a slot.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub name: String,
    pub inbox: InboxHandle,
}

pub struct PublisherConfig {
    pub source: Box<dyn EventSource>,
    /// Delivery order is registration order.
    pub subscribers: Vec<Subscriber>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            source: Box::new(RandomEventSource::default()),
            subscribers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events offered to every subscriber in turn. A subscriber whose inbox
    /// is closed is skipped and does not stop the count.
    pub dispatched: u64,
    /// The source closed its stream before cancellation.
    pub exhausted: bool,
}

enum Delivery {
    Completed,
    Cancelled,
}

/// Sequential fan-out dispatcher.
///
/// Each event is delivered to subscriber 0, then 1, and so on, each handoff
/// waiting for that consumer's slot. The next event is pulled only after the
/// last subscriber took the current one, so one slow consumer throttles the
/// whole pipeline back to the source's queue.
pub struct Publisher {
    config: PublisherConfig,
}

impl Publisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> PublisherBuilder {
        PublisherBuilder::default()
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.config.subscribers
    }

    /// Runs until `token` is cancelled or the source runs dry.
    ///
    /// The source is started with a child of `token`, cancelled again when
    /// this returns so generation never outlives dispatch.
    pub async fn run(self, token: CancellationToken) -> Result<DispatchReport, SourceError> {
        let PublisherConfig {
            mut source,
            subscribers,
        } = self.config;

        let source_token = token.child_token();
        let mut stream = source.start(source_token.clone())?;
        let _stop_source = source_token.drop_guard();

        info!(subscribers = subscribers.len(), "publisher started");
        let mut report = DispatchReport::default();

        loop {
            let event = tokio::select! {
                biased;
                () = token.cancelled() => break,
                next = stream.recv() => match next {
                    Some(event) => event,
                    None => {
                        report.exhausted = true;
                        break;
                    }
                },
            };

            match publish(&subscribers, event, &token).await {
                Delivery::Completed => report.dispatched += 1,
                Delivery::Cancelled => break,
            }
        }

        info!(
            dispatched = report.dispatched,
            exhausted = report.exhausted,
            "publisher done"
        );
        Ok(report)
    }
}

async fn publish(subscribers: &[Subscriber], event: Event, token: &CancellationToken) -> Delivery {
    debug!(symbol = %event.symbol, price = event.price, "publishing event");

    for subscriber in subscribers {
        tokio::select! {
            biased;
            () = token.cancelled() => return Delivery::Cancelled,
            delivered = subscriber.inbox.deliver(event.clone()) => {
                if delivered.is_err() {
                    warn!(consumer = %subscriber.name, "inbox closed, skipping consumer");
                }
            }
        }
    }

    Delivery::Completed
}

#[derive(Default)]
pub struct PublisherBuilder {
    config: PublisherConfig,
}

impl PublisherBuilder {
    pub fn source(mut self, source: impl EventSource + 'static) -> Self {
        self.config.source = Box::new(source);
        self
    }

    /// Registers `consumer` after every consumer registered so far.
    pub fn consumer<C: Consumer + ?Sized>(mut self, consumer: &C) -> Self {
        self.config.subscribers.push(Subscriber {
            name: consumer.name().to_string(),
            inbox: consumer.inbox().handle(),
        });
        self
    }

    pub fn consumers<'a, I>(self, consumers: I) -> Self
    where
        I: IntoIterator<Item = &'a Box<dyn Consumer>>,
    {
        consumers
            .into_iter()
            .fold(self, |builder, consumer| builder.consumer(consumer.as_ref()))
    }

    pub fn build(self) -> Publisher {
        Publisher::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReplaySource;
    use crate::testing::RecordingConsumer;
    use std::time::Duration;

    fn trades() -> Vec<Event> {
        (0..20)
            .map(|i| Event::new(if i % 2 == 0 { "GBP" } else { "USD" }, i, f64::from(i as u32) / 20.0))
            .collect()
    }

    #[tokio::test]
    async fn test_every_consumer_receives_every_event_in_order() {
        let events = trades();
        let mut first = RecordingConsumer::new("first");
        let mut second = RecordingConsumer::new("second");
        let mut rx_first = first.inbox_mut().take_receiver().unwrap();
        let mut rx_second = second.inbox_mut().take_receiver().unwrap();

        let publisher = Publisher::builder()
            .source(ReplaySource::new(events.clone()))
            .consumer(&first)
            .consumer(&second)
            .build();
        assert_eq!(publisher.subscribers().len(), 2);

        let token = CancellationToken::new();
        let run = tokio::spawn(publisher.run(token.clone()));

        for expected in &events {
            assert_eq!(&rx_first.recv().await.unwrap(), expected);
            assert_eq!(&rx_second.recv().await.unwrap(), expected);
        }

        let report = run.await.unwrap().unwrap();
        assert_eq!(report.dispatched, events.len() as u64);
        assert!(report.exhausted);
    }

    #[tokio::test]
    async fn test_stalled_consumer_blocks_later_consumers() {
        let mut stalled = RecordingConsumer::new("stalled");
        let mut later = RecordingConsumer::new("later");
        let _rx_stalled = stalled.inbox_mut().take_receiver().unwrap();
        let mut rx_later = later.inbox_mut().take_receiver().unwrap();

        let publisher = Publisher::builder()
            .source(ReplaySource::new(trades()))
            .consumer(&stalled)
            .consumer(&later)
            .build();

        let token = CancellationToken::new();
        let run = tokio::spawn(publisher.run(token.clone()));

        // First event fills both slots; the second cannot pass "stalled".
        assert_eq!(rx_later.recv().await.unwrap().quantity, 0);
        let next = tokio::time::timeout(Duration::from_millis(50), rx_later.recv()).await;
        assert!(next.is_err(), "later consumer must not run ahead of a stalled one");

        token.cancel();
        let report = run.await.unwrap().unwrap();
        assert_eq!(report.dispatched, 1);
        assert!(!report.exhausted);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_delivers_nothing() {
        let mut consumer = RecordingConsumer::new("idle");
        let mut rx = consumer.inbox_mut().take_receiver().unwrap();
        let publisher = Publisher::builder()
            .source(ReplaySource::new(trades()))
            .consumer(&consumer)
            .build();

        let token = CancellationToken::new();
        token.cancel();
        let report = publisher.run(token).await.unwrap();

        assert_eq!(report, DispatchReport::default());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_inbox_is_skipped() {
        let mut gone = RecordingConsumer::new("gone");
        let mut alive = RecordingConsumer::new("alive");
        drop(gone.inbox_mut().take_receiver());
        let mut rx_alive = alive.inbox_mut().take_receiver().unwrap();

        let events = trades();
        let publisher = Publisher::builder()
            .source(ReplaySource::new(events.clone()))
            .consumer(&gone)
            .consumer(&alive)
            .build();
        let run = tokio::spawn(publisher.run(CancellationToken::new()));

        for expected in &events {
            assert_eq!(&rx_alive.recv().await.unwrap(), expected);
        }
        assert_eq!(run.await.unwrap().unwrap().dispatched, events.len() as u64);
    }
}

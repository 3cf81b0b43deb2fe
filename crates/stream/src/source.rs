// Event sources feeding the publisher

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tickfan_models::{ConfigError, Event, SourceError};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Consuming end of a source's internal queue.
pub type EventStream = mpsc::Receiver<Event>;

/// Produces events on its own task once started.
///
/// `start` must not block: it hands back the stream and returns. Production
/// stops for good once `token` is cancelled.
pub trait EventSource: Send {
    fn start(&mut self, token: CancellationToken) -> Result<EventStream, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Time between generated events.
    pub interval: Duration,
    /// Candidate symbols, picked uniformly per event.
    pub symbols: Vec<String>,
    /// Capacity of the queue between the source and the publisher.
    pub queue_capacity: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            symbols: vec!["GBP".to_string(), "USD".to_string()],
            queue_capacity: 1000,
        }
    }
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbols);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval { interval: self.interval });
        }
        Ok(())
    }
}

type Queue = (mpsc::Sender<Event>, mpsc::Receiver<Event>);

/// Synthesizes one random trade per tick.
///
/// A full queue suspends generation until the publisher drains a slot, so a
/// stalled pipeline throttles the source instead of losing events.
pub struct RandomEventSource {
    config: SourceConfig,
    queue: Option<Queue>,
    rng: Option<SmallRng>,
    produced: Arc<AtomicU64>,
}

impl RandomEventSource {
    pub fn new(config: SourceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, SmallRng::from_entropy()))
    }

    /// Same as [`RandomEventSource::new`] with a reproducible generator.
    pub fn with_seed(config: SourceConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, SmallRng::seed_from_u64(seed)))
    }

    fn build(config: SourceConfig, rng: SmallRng) -> Self {
        let queue = mpsc::channel(config.queue_capacity);
        Self {
            config,
            queue: Some(queue),
            rng: Some(rng),
            produced: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared counter of events enqueued so far. Stays readable after the
    /// source itself has been moved into a publisher.
    pub fn produced(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.produced)
    }
}

impl Default for RandomEventSource {
    fn default() -> Self {
        Self::build(SourceConfig::default(), SmallRng::from_entropy())
    }
}

impl EventSource for RandomEventSource {
    fn start(&mut self, token: CancellationToken) -> Result<EventStream, SourceError> {
        let (tx, rx) = self.queue.take().ok_or(SourceError::AlreadyStarted)?;
        let rng = self.rng.take().ok_or(SourceError::AlreadyStarted)?;

        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            symbols = ?self.config.symbols,
            queue_capacity = self.config.queue_capacity,
            "starting random event source"
        );

        tokio::spawn(generate_loop(
            tx,
            self.config.clone(),
            rng,
            Arc::clone(&self.produced),
            token,
        ));
        Ok(rx)
    }
}

async fn generate_loop(
    tx: mpsc::Sender<Event>,
    config: SourceConfig,
    mut rng: SmallRng,
    produced: Arc<AtomicU64>,
    token: CancellationToken,
) {
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(event) = generate_event(&mut rng, &config.symbols) else {
            break;
        };

        tokio::select! {
            biased;
            () = token.cancelled() => break,
            sent = tx.send(event) => {
                if sent.is_err() {
                    debug!("event stream dropped, stopping generation");
                    break;
                }
                produced.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    debug!(produced = produced.load(Ordering::Relaxed), "random event source stopped");
}

pub(crate) fn generate_event<R: Rng + ?Sized>(rng: &mut R, symbols: &[String]) -> Option<Event> {
    let symbol = symbols.choose(rng)?;
    Some(Event::new(
        symbol.clone(),
        rng.gen_range(0..=i64::MAX),
        rng.gen::<f64>(),
    ))
}

/// Emits a fixed sequence in order, then closes its stream.
pub struct ReplaySource {
    events: Vec<Event>,
    pace: Option<Duration>,
    queue_capacity: usize,
    started: bool,
}

impl ReplaySource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            pace: None,
            queue_capacity: 16,
            started: false,
        }
    }

    /// Wait `pace` between consecutive events.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

impl EventSource for ReplaySource {
    fn start(&mut self, token: CancellationToken) -> Result<EventStream, SourceError> {
        if self.started {
            return Err(SourceError::AlreadyStarted);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity.into());
        }
        self.started = true;

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let events = std::mem::take(&mut self.events);
        let pace = self.pace;

        tokio::spawn(async move {
            for (index, event) in events.into_iter().enumerate() {
                if index > 0 {
                    if let Some(pace) = pace {
                        tokio::select! {
                            biased;
                            () = token.cancelled() => return,
                            () = tokio::time::sleep(pace) => {}
                        }
                    }
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => return,
                    sent = tx.send(event) => if sent.is_err() { return },
                }
            }
            debug!("replay source exhausted");
        });

        Ok(rx)
    }
}

//! Demo wiring: one random source, a trade logger and an extremes tracker,
//! all stopped by a single cancellation token tied to process signals.

mod config;
mod shutdown;

use anyhow::Result;
use config::{AppConfig, LoggingSettings};
use tickfan_services::{ExtremesConsumer, LogConsumer};
use tickfan_stream::{supervisor, Consumer, Publisher, RandomEventSource};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::new()?;
    init_tracing(&config.logging);

    info!(
        interval_ms = config.source.interval_ms,
        symbols = ?config.source.symbols,
        queue_capacity = config.source.queue_capacity,
        "starting tickfan"
    );

    // Fails fast on an empty symbol set before anything is spawned.
    let source = RandomEventSource::new(config.source.to_source_config())?;

    let consumers: Vec<Box<dyn Consumer>> = vec![
        Box::new(LogConsumer::new()),
        Box::new(ExtremesConsumer::new()),
    ];
    let publisher = Publisher::builder()
        .source(source)
        .consumers(&consumers)
        .build();

    let token = CancellationToken::new();
    let group = supervisor::run(&token, consumers);

    let signals = tokio::spawn({
        let token = token.clone();
        async move {
            match shutdown::wait_for_shutdown_signal().await {
                Ok(()) => info!("shutdown signal received"),
                Err(err) => error!(error = %err, "failed to listen for shutdown signals"),
            }
            token.cancel();
        }
    });

    let report = publisher.run(token.clone()).await?;

    // An exhausted source ends dispatch without a signal; stop the loops too.
    token.cancel();
    let consumers = group.join().await;
    signals.abort();

    info!(
        dispatched = report.dispatched,
        consumers = consumers.len(),
        "shut down cleanly"
    );
    Ok(())
}

fn init_tracing(settings: &LoggingSettings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

//! Kanary - OAuth-authenticated Kafka console consumer
//!
//! Main entry point: resolves configuration, wires Ctrl-C to a cancellation
//! token, and runs the consume loop until it is cancelled or fails.

use anyhow::Result;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kanary::cli::Cli;
use kanary::config::ConsumerSettings;
use kanary::consumer::TopicConsumer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Resolve configuration: environment first, CLI flags override
    let settings = ConsumerSettings::from_env().with_overrides(&cli);
    tracing::info!(
        brokers = %settings.brokers,
        topic = %settings.topic,
        group = %settings.group_id,
        "starting Kafka consumer"
    );

    let consumer = TopicConsumer::new(&settings, Handle::current())?;

    // The first interrupt triggers graceful shutdown; the loop observes the
    // token at its next select point.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down consumer");
            signal_cancel.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    consumer.run(cancel, &mut stdout).await?;
    Ok(())
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kanary=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

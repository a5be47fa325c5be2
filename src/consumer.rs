//! Token-refreshing Kafka consumer loop.
//!
//! This module owns the long-lived subscription to the configured topic.
//! Authentication is SASL/OAUTHBEARER: whenever librdkafka needs a token
//! (initial handshake or pre-expiry renewal, on its own schedule), it calls
//! [`OAuthConsumerContext::generate_oauth_token`], which fetches a fresh
//! bearer token from the configured endpoint. A failed fetch is returned as
//! an error, which the client reports through its token-failure channel and
//! retries itself; no token is ever installed from a failed response.
//!
//! The consume loop itself pulls records, prints them to stdout, treats
//! record-level errors as non-fatal, and exits promptly when its
//! cancellation token fires.

use std::io::Write;
use std::thread;

use futures::{Stream, StreamExt};
use rdkafka::client::OAuthToken;
use rdkafka::consumer::{Consumer, ConsumerContext, Rebalance, StreamConsumer};
use rdkafka::error::{KafkaError, KafkaResult};
use rdkafka::TopicPartitionList;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ConsumerSettings;
use crate::error::{KanaryError, Result};
use crate::record::ConsumedRecord;
use crate::token::TokenSource;

/// Client context that refreshes OAUTHBEARER tokens on demand.
///
/// librdkafka invokes the refresh callback on one of its own threads, so
/// the async token fetch is bridged with a dedicated thread and
/// `Handle::block_on`; the fetch itself carries a bounded timeout.
pub struct OAuthConsumerContext {
    tokens: TokenSource,
    runtime: Handle,
}

impl OAuthConsumerContext {
    /// Creates a context that fetches tokens via `tokens` on the given
    /// runtime.
    pub fn new(tokens: TokenSource, runtime: Handle) -> Self {
        Self { tokens, runtime }
    }
}

impl rdkafka::ClientContext for OAuthConsumerContext {
    const ENABLE_REFRESH_OAUTH_TOKEN: bool = true;

    fn generate_oauth_token(
        &self,
        _oauthbearer_config: Option<&str>,
    ) -> std::result::Result<OAuthToken, Box<dyn std::error::Error>> {
        let source = self.tokens.clone();
        let handle = self.runtime.clone();

        // The callback may fire on a runtime worker thread; block_on there
        // would panic, so the fetch runs on a short-lived helper thread.
        let joined = thread::spawn(move || handle.block_on(source.fetch())).join();

        let token = match joined {
            Ok(Ok(token)) => token,
            Ok(Err(e)) => {
                warn!(error = %e, "bearer token refresh failed");
                return Err(e.into());
            }
            Err(_) => {
                error!("token fetch thread panicked");
                return Err("token fetch thread panicked".into());
            }
        };

        info!(expires_at = %token.expires_at, "bearer token refreshed");
        let lifetime_ms = token.lifetime_ms();
        Ok(OAuthToken {
            token: token.access_token,
            principal_name: self.tokens.client_id().to_string(),
            lifetime_ms,
        })
    }
}

impl ConsumerContext for OAuthConsumerContext {
    fn pre_rebalance(&self, rebalance: &Rebalance) {
        info!(?rebalance, "pre rebalance");
    }

    fn post_rebalance(&self, rebalance: &Rebalance) {
        info!(?rebalance, "post rebalance");
    }

    fn commit_callback(&self, result: KafkaResult<()>, _offsets: &TopicPartitionList) {
        debug!(?result, "offsets committed");
    }
}

/// Consumer bound to a single topic, printing records to a writer.
///
/// # Example
///
/// ```rust,no_run
/// use kanary::config::ConsumerSettings;
/// use kanary::consumer::TopicConsumer;
/// use tokio::runtime::Handle;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> anyhow::Result<()> {
/// let settings = ConsumerSettings::from_env();
/// let consumer = TopicConsumer::new(&settings, Handle::current())?;
/// let mut stdout = std::io::stdout();
/// consumer.run(CancellationToken::new(), &mut stdout).await?;
/// # Ok(())
/// # }
/// ```
pub struct TopicConsumer {
    consumer: StreamConsumer<OAuthConsumerContext>,
    topic: String,
}

impl TopicConsumer {
    /// Creates the underlying Kafka client with the OAuth refresh context.
    ///
    /// # Errors
    ///
    /// Fails if the token source's HTTP client or the Kafka client cannot
    /// be created.
    pub fn new(settings: &ConsumerSettings, runtime: Handle) -> Result<Self> {
        let tokens = TokenSource::new(settings.oauth.clone()).map_err(KanaryError::Token)?;
        let context = OAuthConsumerContext::new(tokens, runtime);
        let consumer: StreamConsumer<OAuthConsumerContext> = settings
            .client_config()
            .create_with_context(context)
            .map_err(KanaryError::Kafka)?;

        Ok(Self {
            consumer,
            topic: settings.topic.clone(),
        })
    }

    /// Subscribes to the topic and consumes until cancelled.
    ///
    /// Records are printed to `out` in the fixed block format; records
    /// without a payload are skipped, and consume-level errors are printed
    /// without stopping the loop. The subscription is released exactly once
    /// on the way out.
    ///
    /// # Errors
    ///
    /// Fails if the subscription cannot be established or the writer
    /// rejects output.
    pub async fn run<W: Write>(&self, cancel: CancellationToken, out: &mut W) -> Result<()> {
        self.consumer
            .subscribe(&[self.topic.as_str()])
            .map_err(KanaryError::Kafka)?;
        info!(topic = %self.topic, "consumer subscribed");

        let events = Box::pin(
            self.consumer
                .stream()
                .map(|result| result.map(|message| ConsumedRecord::from_borrowed(&message))),
        );
        consume_loop(events, &cancel, out).await.map_err(KanaryError::Io)?;

        self.consumer.unsubscribe();
        info!("consumer stopped");
        Ok(())
    }
}

/// Pulls events until the stream ends or cancellation is requested.
///
/// Separated from the Kafka transport so the loop's behavior (continue on
/// error, skip empty payloads, prompt cancellation) is testable with
/// scripted streams.
async fn consume_loop<S, W>(
    mut events: S,
    cancel: &CancellationToken,
    out: &mut W,
) -> std::io::Result<()>
where
    S: Stream<Item = std::result::Result<ConsumedRecord, KafkaError>> + Unpin,
    W: Write,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cancellation requested, stopping consume loop");
                break;
            }
            event = events.next() => match event {
                Some(Ok(record)) => match record.render() {
                    Some(block) => writeln!(out, "{block}")?,
                    None => debug!(
                        topic = %record.topic,
                        offset = record.offset,
                        "skipping record without payload"
                    ),
                },
                Some(Err(e)) => {
                    warn!(error = %e, "consume-level error, continuing");
                    writeln!(out, "[CONSUME ERROR] {e}")?;
                }
                None => break,
            }
        }
    }
    Ok(())
}

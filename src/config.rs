//! Configuration for the Kanary consumer.
//!
//! All settings come from environment variables with documented defaults;
//! an absent or empty variable falls back to its default, so loading never
//! fails. Malformed values (an unreachable broker, a bad endpoint URL) are
//! only detected when first used.
//!
//! # Environment Variables
//!
//! * `BOOTSTRAP` - Kafka broker addresses (default: localhost:9092)
//! * `TOPIC_NAME` - Topic to consume (default: onprem.utv.doc-examples.data.add.v1)
//! * `SASL_CLIENT_ID` - OAuth client id (default: team-2s)
//! * `SASL_CLIENT_SECRET` - OAuth client secret (default: 1234)
//! * `SASL_TOKEN_ENDPOINT_URL` - Token endpoint URL
//!   (default: http://localhost:8080/realms/master/protocol/openid-connect/token)
//! * `SASL_AUDIENCE` - Audience claim for token requests (default: kafka)
//! * `CONSUMER_GROUP` - Consumer group id (default: team-2s-canary)

use rdkafka::ClientConfig;

use crate::cli::Cli;

const DEFAULT_BROKERS: &str = "localhost:9092";
const DEFAULT_TOPIC: &str = "onprem.utv.doc-examples.data.add.v1";
const DEFAULT_CLIENT_ID: &str = "team-2s";
const DEFAULT_CLIENT_SECRET: &str = "1234";
const DEFAULT_TOKEN_ENDPOINT: &str =
    "http://localhost:8080/realms/master/protocol/openid-connect/token";
const DEFAULT_AUDIENCE: &str = "kafka";
const DEFAULT_GROUP_ID: &str = "team-2s-canary";

/// OAuth client credentials and token endpoint settings.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    /// Client id presented to the token endpoint and used as the
    /// principal name for the Kafka session.
    pub client_id: String,
    /// Client secret presented to the token endpoint.
    pub client_secret: String,
    /// Token endpoint URL (OpenID-Connect style).
    pub token_endpoint: String,
    /// Audience claim sent with every token request.
    pub audience: String,
}

/// Resolved consumer configuration.
///
/// Populated once at startup from the environment (plus optional CLI
/// overrides) and immutable for the process lifetime.
///
/// # Example
///
/// ```rust
/// use kanary::config::ConsumerSettings;
///
/// let settings = ConsumerSettings::from_env();
/// assert!(!settings.brokers.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// Kafka broker addresses (comma-separated).
    pub brokers: String,
    /// Topic to consume from.
    pub topic: String,
    /// Consumer group id.
    pub group_id: String,
    /// OAuth credentials for the OAUTHBEARER handshake.
    pub oauth: OAuthSettings,
}

/// Reads an environment variable, treating empty or whitespace-only
/// values the same as absent ones.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ConsumerSettings {
    /// Loads settings from the environment.
    ///
    /// Never fails: every variable has a default, and absent or empty
    /// values fall back to it.
    pub fn from_env() -> Self {
        Self {
            brokers: env_or("BOOTSTRAP", DEFAULT_BROKERS),
            topic: env_or("TOPIC_NAME", DEFAULT_TOPIC),
            group_id: env_or("CONSUMER_GROUP", DEFAULT_GROUP_ID),
            oauth: OAuthSettings {
                client_id: env_or("SASL_CLIENT_ID", DEFAULT_CLIENT_ID),
                client_secret: env_or("SASL_CLIENT_SECRET", DEFAULT_CLIENT_SECRET),
                token_endpoint: env_or("SASL_TOKEN_ENDPOINT_URL", DEFAULT_TOKEN_ENDPOINT),
                audience: env_or("SASL_AUDIENCE", DEFAULT_AUDIENCE),
            },
        }
    }

    /// Applies CLI flag overrides on top of the environment values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(brokers) = &cli.brokers {
            self.brokers = brokers.clone();
        }
        if let Some(topic) = &cli.topic {
            self.topic = topic.clone();
        }
        if let Some(group) = &cli.group {
            self.group_id = group.clone();
        }
        self
    }

    /// Builds the rdkafka client configuration for this consumer.
    ///
    /// Offsets are auto-committed and reading starts from the earliest
    /// available offset; authentication is SASL/OAUTHBEARER over
    /// plaintext, with the bearer token supplied by the refresh callback.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .set("security.protocol", "SASL_PLAINTEXT")
            .set("sasl.mechanism", "OAUTHBEARER");
        config
    }
}

//! Bearer token acquisition for the OAUTHBEARER handshake.
//!
//! A [`TokenSource`] performs one HTTP POST against the configured OAuth
//! token endpoint per refresh, using the UMA ticket grant, and converts the
//! relative `expires_in` of the response into an absolute expiry with a
//! small safety margin. Failed or malformed responses never yield a token;
//! the caller forwards the error to the Kafka client, which owns the retry
//! schedule.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::OAuthSettings;
use crate::error::TokenError;

/// UMA ticket grant type sent on every token request.
const UMA_TICKET_GRANT: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

/// Seconds subtracted from `expires_in` so the client refreshes before the
/// token actually lapses.
const EXPIRY_SAFETY_MARGIN_SECS: u64 = 5;

/// Bound on a single token request, so the refresh callback can never
/// block the Kafka client's internal lock indefinitely.
pub const TOKEN_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw JSON response from the token endpoint.
///
/// Both fields are required; a response missing either is rejected as
/// malformed before any token is produced.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// A fetched access token with its absolute expiry.
#[derive(Debug, Clone)]
pub struct BearerToken {
    /// Opaque access-token string presented to the broker.
    pub access_token: String,
    /// Absolute UTC instant after which the token is no longer used.
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    /// Expiry as wall-clock milliseconds since the Unix epoch, the shape
    /// librdkafka expects for `lifetime_ms`.
    pub fn lifetime_ms(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }
}

/// Computes the absolute expiry for a token valid for `expires_in` seconds.
///
/// The safety margin is subtracted and the result floored at one second of
/// validity, so even a nearly-expired grant yields a usable token.
fn expiry_from(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let validity = expires_in
        .saturating_sub(EXPIRY_SAFETY_MARGIN_SECS)
        .max(1);
    now + chrono::Duration::seconds(validity as i64)
}

/// Fetches bearer tokens from the OAuth token endpoint.
///
/// Cloneable; all clones share the underlying HTTP connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use kanary::config::ConsumerSettings;
/// use kanary::token::TokenSource;
///
/// # async fn example() -> anyhow::Result<()> {
/// let settings = ConsumerSettings::from_env();
/// let source = TokenSource::new(settings.oauth)?;
/// let token = source.fetch().await?;
/// println!("token expires at {}", token.expires_at);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenSource {
    http: reqwest::Client,
    settings: OAuthSettings,
}

impl TokenSource {
    /// Creates a token source with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Request`] if the HTTP client cannot be built.
    pub fn new(settings: OAuthSettings) -> Result<Self, TokenError> {
        let http = reqwest::Client::builder()
            .timeout(TOKEN_FETCH_TIMEOUT)
            .build()?;
        Ok(Self { http, settings })
    }

    /// Requests a fresh bearer token.
    ///
    /// POSTs a form-encoded body with the UMA ticket grant, client
    /// credentials, and audience, then parses `access_token` and
    /// `expires_in` out of the JSON response.
    ///
    /// # Errors
    ///
    /// * [`TokenError::Request`] for network or timeout failures.
    /// * [`TokenError::Endpoint`] for non-success HTTP statuses; carries
    ///   the status code and raw body.
    /// * [`TokenError::Malformed`] when a required field is missing or of
    ///   the wrong type.
    pub async fn fetch(&self) -> Result<BearerToken, TokenError> {
        let params = [
            ("grant_type", UMA_TICKET_GRANT),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("audience", self.settings.audience.as_str()),
        ];

        let response = self
            .http
            .post(&self.settings.token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Endpoint { status, body });
        }

        let body = response.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| TokenError::Malformed(e.to_string()))?;

        let expires_at = expiry_from(Utc::now(), parsed.expires_in);
        debug!(
            client_id = %self.settings.client_id,
            expires_at = %expires_at,
            "fetched bearer token"
        );

        Ok(BearerToken {
            access_token: parsed.access_token,
            expires_at,
        })
    }

    /// The client id these tokens are issued for.
    pub fn client_id(&self) -> &str {
        &self.settings.client_id
    }
}

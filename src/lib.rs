//! Kanary - OAuth-authenticated Kafka console consumer library
//!
//! This library provides the pieces behind the `kanary` binary: environment
//! configuration, bearer token acquisition, and the token-refreshing
//! consume loop.
//!
//! # Architecture
//!
//! - `config`: environment-variable configuration with documented defaults
//! - `token`: OAuth token fetch and absolute-expiry bookkeeping
//! - `consumer`: OAUTHBEARER refresh context and the consume loop
//! - `record`: consumed record values and their stdout rendering
//! - `error`: error types and result alias
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use kanary::config::ConsumerSettings;
//! use kanary::consumer::TopicConsumer;
//! use tokio::runtime::Handle;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ConsumerSettings::from_env();
//!     let consumer = TopicConsumer::new(&settings, Handle::current())?;
//!     let mut stdout = std::io::stdout();
//!     consumer.run(CancellationToken::new(), &mut stdout).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod consumer;
pub mod error;
pub mod record;
pub mod token;

// Re-export commonly used types
pub use config::ConsumerSettings;
pub use consumer::TopicConsumer;
pub use error::{KanaryError, Result, TokenError};
pub use record::ConsumedRecord;
pub use token::{BearerToken, TokenSource};

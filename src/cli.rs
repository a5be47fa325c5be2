//! Command-line interface definition for Kanary
//!
//! This module defines the CLI structure using clap's derive API. The
//! consumer is configured through environment variables; the flags here
//! are optional overrides for the most commonly changed values.

use clap::Parser;

/// Kanary - OAuth-authenticated Kafka console consumer
///
/// Subscribes to one topic and prints every received record to stdout,
/// refreshing its bearer token from the configured OAuth endpoint on
/// demand. Press Ctrl-C to shut down gracefully.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "kanary")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Kafka broker addresses, comma-separated (overrides BOOTSTRAP)
    #[arg(short, long)]
    pub brokers: Option<String>,

    /// Topic to consume from (overrides TOPIC_NAME)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Consumer group id (overrides CONSUMER_GROUP)
    #[arg(short, long)]
    pub group: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_has_no_overrides() {
        let cli = Cli::default();
        assert!(cli.brokers.is_none());
        assert!(cli.topic.is_none());
        assert!(cli.group.is_none());
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "kanary",
            "--brokers",
            "broker:9092",
            "--topic",
            "demo.topic",
            "--group",
            "demo-group",
        ]);
        assert_eq!(cli.brokers.as_deref(), Some("broker:9092"));
        assert_eq!(cli.topic.as_deref(), Some("demo.topic"));
        assert_eq!(cli.group.as_deref(), Some("demo-group"));
    }

    #[test]
    fn test_cli_parses_short_flags() {
        let cli = Cli::parse_from(["kanary", "-t", "demo.topic"]);
        assert_eq!(cli.topic.as_deref(), Some("demo.topic"));
        assert!(cli.brokers.is_none());
    }
}

use std::path::PathBuf;

use clap::Parser;

/// Kafka-compatible broker front-end (ApiVersions, DescribeTopicPartitions)
#[derive(Parser, Debug)]
#[command(name = "kafka-broker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a server.properties file
    pub config: Option<PathBuf>,

    /// Listen address, overrides `listeners` from the properties file
    #[arg(short, long, env = "KAFKA_BROKER_BIND")]
    pub bind: Option<String>,

    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(short, long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_config_and_bind() {
        let cli = Cli::try_parse_from([
            "kafka-broker",
            "/tmp/server.properties",
            "--bind",
            "127.0.0.1:19092",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/server.properties")));
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1:19092"));
    }

    #[test]
    fn test_config_path_is_optional() {
        let cli = Cli::try_parse_from(["kafka-broker"]).unwrap();
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

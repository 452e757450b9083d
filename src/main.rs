use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kafka_broker_rust::adapters::incoming::tcp_adapter::TcpAdapter;
use kafka_broker_rust::config::{AppConfig, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_cli(&cli).context("failed to load configuration")?;
    info!(
        listen_addr = %config.server.listen_addr,
        max_frame_size = config.server.max_frame_size,
        "starting broker"
    );

    let adapter = TcpAdapter::new(
        &config.server.listen_addr,
        config.broker,
        config.protocol_parser,
        config.server.max_frame_size,
    )
    .await
    .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;

    adapter.run().await?;

    Ok(())
}

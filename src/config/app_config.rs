use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::cli::Cli;
use crate::adapters::outgoing::memory_store::MemoryMetadataStore;
use crate::adapters::protocol::constants::{
    DEFAULT_MAX_FRAME_SIZE, DEFAULT_MAX_PARTITIONS_PER_RESPONSE,
};
use crate::adapters::protocol::KafkaProtocolParser;
use crate::application::broker::KafkaBroker;
use crate::application::error::{ApplicationError, Result};
use crate::ports::incoming::message_handler::MessageHandler;
use crate::ports::outgoing::metadata_store::MetadataStore;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9092";

const LISTENERS_KEY: &str = "listeners";
const MAX_FRAME_SIZE_KEY: &str = "socket.request.max.bytes";
const MAX_PARTITIONS_KEY: &str = "max.request.partition.size.limit";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub max_frame_size: usize, // 요청 프레임 최대 크기
    pub max_partitions_per_response: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_partitions_per_response: DEFAULT_MAX_PARTITIONS_PER_RESPONSE,
        }
    }
}

impl ServerConfig {
    /// server.properties 파일을 읽음. 파일이 없으면 기본값을 그대로 씀
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "properties file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_properties(&contents)?;
        info!(path = %path.display(), "loaded server properties");
        Ok(config)
    }

    /// `key=value` 줄만 해석함. `#`, `!` 주석과 모르는 키는 무시
    pub fn from_properties(contents: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                LISTENERS_KEY => config.listen_addr = parse_listeners(value)?,
                MAX_FRAME_SIZE_KEY => {
                    config.max_frame_size = parse_positive(MAX_FRAME_SIZE_KEY, value)?
                }
                MAX_PARTITIONS_KEY => {
                    config.max_partitions_per_response = parse_positive(MAX_PARTITIONS_KEY, value)?
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

/// 첫 번째 리스너만 사용. 호스트가 비어 있으면 모든 인터페이스
fn parse_listeners(value: &str) -> Result<String> {
    let first = value.split(',').next().unwrap_or_default().trim();
    let address = first
        .split_once("://")
        .map(|(_, address)| address)
        .unwrap_or(first);

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| ApplicationError::Config(format!("{}: missing port in {:?}", LISTENERS_KEY, first)))?;
    let port: u16 = port
        .parse()
        .map_err(|_| ApplicationError::Config(format!("{}: invalid port {:?}", LISTENERS_KEY, port)))?;
    let host = if host.is_empty() { "0.0.0.0" } else { host };

    Ok(format!("{}:{}", host, port))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ApplicationError::Config(format!(
            "{}: expected a positive number, got {:?}",
            key, value
        ))),
    }
}

pub struct AppConfig {
    pub server: ServerConfig,
    pub broker: Arc<dyn MessageHandler>,
    pub protocol_parser: KafkaProtocolParser,
}

impl AppConfig {
    pub fn new(server: ServerConfig, metadata_store: Box<dyn MetadataStore>) -> Self {
        let broker = Arc::new(
            KafkaBroker::new(metadata_store).with_partition_limit(server.max_partitions_per_response),
        );

        Self {
            server,
            broker,
            protocol_parser: KafkaProtocolParser::new(),
        }
    }

    /// properties 파일을 먼저 읽고 `--bind`로 덮어씀. 토픽 메타데이터는 불러오지
    /// 않으므로 조회한 토픽은 모두 unknown으로 응답함
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut server = match &cli.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = &cli.bind {
            server.listen_addr = bind.clone();
        }

        Ok(Self::new(server, Box::new(MemoryMetadataStore::new())))
    }
}

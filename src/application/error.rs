use crate::domain::error::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("malformed request header: {0}")]
    MalformedHeader(ProtocolError),
    #[error("malformed body for api key {api_key} (correlation id {correlation_id}): {source}")]
    MalformedBody {
        api_key: i16,
        correlation_id: i32,
        #[source]
        source: ProtocolError,
    },
    #[error("frame of {size} bytes exceeds limit of {max}")]
    FrameTooLarge { size: usize, max: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApplicationError>;

use thiserror::Error;

/// 커넥션과 무관한 와이어 코덱 자체의 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("truncated input: need {needed} bytes but {remaining} remain")]
    TruncatedInput { needed: usize, remaining: usize },
    #[error("malformed varint")]
    MalformedVarint,
    #[error("invalid length: {0}")]
    InvalidLength(i64),
    #[error("invalid UTF-8 in {0}")]
    InvalidString(&'static str),
    #[error("unknown header version: {0}")]
    UnknownHeaderVersion(i16),
    #[error("unrecognized api key: {0}")]
    UnrecognizedApi(i16),
    #[error("payload for api key {api_key} is not a {expected} body")]
    TypeMismatch { api_key: i16, expected: &'static str },
    #[error("{field} too large to encode ({len})")]
    FieldTooLarge { field: &'static str, len: usize },
}

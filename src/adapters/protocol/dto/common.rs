use std::ops::RangeInclusive;

use super::tagged_fields::TaggedFields;
use crate::adapters::protocol::constants::{
    API_VERSIONS_KEY, API_VERSIONS_MAX_VERSION, API_VERSIONS_MIN_VERSION,
    DESCRIBE_TOPIC_PARTITIONS_KEY, DESCRIBE_TOPIC_PARTITIONS_MAX_VERSION,
    DESCRIBE_TOPIC_PARTITIONS_MIN_VERSION, NONE, UNKNOWN_TOPIC_OR_PARTITION,
    UNSUPPORTED_VERSION,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i16)]
pub enum ErrorCode {
    None = NONE,
    UnknownTopicOrPartition = UNKNOWN_TOPIC_OR_PARTITION,
    UnsupportedVersion = UNSUPPORTED_VERSION,
}

impl From<ErrorCode> for i16 {
    fn from(error_code: ErrorCode) -> Self {
        error_code as i16
    }
}

/// 이 브로커가 이해하는 API 목록 (닫힌 집합)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiKey {
    ApiVersions,
    DescribeTopicPartitions,
}

/// ApiVersions가 광고하는 순서대로 나열한 지원 API
pub const SUPPORTED_APIS: [ApiKey; 2] = [ApiKey::ApiVersions, ApiKey::DescribeTopicPartitions];

impl ApiKey {
    pub fn from_code(code: i16) -> Option<Self> {
        SUPPORTED_APIS.into_iter().find(|api| api.code() == code)
    }

    pub fn code(self) -> i16 {
        match self {
            ApiKey::ApiVersions => API_VERSIONS_KEY,
            ApiKey::DescribeTopicPartitions => DESCRIBE_TOPIC_PARTITIONS_KEY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ApiKey::ApiVersions => "ApiVersions",
            ApiKey::DescribeTopicPartitions => "DescribeTopicPartitions",
        }
    }

    pub fn versions(self) -> RangeInclusive<i16> {
        match self {
            ApiKey::ApiVersions => API_VERSIONS_MIN_VERSION..=API_VERSIONS_MAX_VERSION,
            ApiKey::DescribeTopicPartitions => {
                DESCRIBE_TOPIC_PARTITIONS_MIN_VERSION..=DESCRIBE_TOPIC_PARTITIONS_MAX_VERSION
            }
        }
    }

    pub fn supports(self, version: i16) -> bool {
        self.versions().contains(&version)
    }

    /// ApiVersions는 어느 버전의 클라이언트든 읽을 수 있게 헤더 v0로 응답함
    pub fn response_header_version(self) -> i16 {
        match self {
            ApiKey::ApiVersions => 0,
            ApiKey::DescribeTopicPartitions => 1,
        }
    }
}

/// DescribeTopicPartitions 요청과 응답이 공유하는 페이지 위치
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pub topic_name: String,
    pub partition_index: i32,
    pub tagged_fields: TaggedFields,
}

impl Cursor {
    pub fn new(topic_name: impl Into<String>, partition_index: i32) -> Self {
        Self {
            topic_name: topic_name.into(),
            partition_index,
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_lookup() {
        assert_eq!(ApiKey::from_code(18), Some(ApiKey::ApiVersions));
        assert_eq!(ApiKey::from_code(75), Some(ApiKey::DescribeTopicPartitions));
        assert_eq!(ApiKey::from_code(1), None);
    }

    #[test]
    fn test_api_key_versions() {
        assert!(ApiKey::ApiVersions.supports(0));
        assert!(ApiKey::ApiVersions.supports(4));
        assert!(!ApiKey::ApiVersions.supports(5));
        assert!(!ApiKey::ApiVersions.supports(-1));
        assert!(ApiKey::DescribeTopicPartitions.supports(0));
        assert!(!ApiKey::DescribeTopicPartitions.supports(1));
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(i16::from(ErrorCode::None), 0);
        assert_eq!(i16::from(ErrorCode::UnknownTopicOrPartition), 3);
        assert_eq!(i16::from(ErrorCode::UnsupportedVersion), 35);
    }
}

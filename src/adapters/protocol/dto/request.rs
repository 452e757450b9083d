use super::common::Cursor;
use super::tagged_fields::TaggedFields;

/// 요청 헤더 v2
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHeader {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
    pub tagged_fields: TaggedFields,
}

impl RequestHeader {
    pub fn new(api_key: i16, api_version: i16, correlation_id: i32) -> Self {
        Self {
            api_key,
            api_version,
            correlation_id,
            client_id: None,
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiVersionsRequest {
    pub client_software_name: String,
    pub client_software_version: String,
    pub tagged_fields: TaggedFields,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicRequest {
    pub topic_name: String,
    pub tagged_fields: TaggedFields,
}

impl TopicRequest {
    pub fn new(topic_name: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescribeTopicPartitionsRequest {
    pub topics: Vec<TopicRequest>,
    pub response_partition_limit: i32,
    pub cursor: Option<Cursor>,
    pub tagged_fields: TaggedFields,
}

/// 헤더의 api key로 결정되는 요청 바디
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    ApiVersions(ApiVersionsRequest),
    DescribeTopicPartitions(DescribeTopicPartitionsRequest),
    /// 바디 파서가 없는 api key나 버전. 바디 바이트는 건너뜀
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KafkaRequest {
    /// 와이어에서 읽은 크기 필드. 메모리에서 만든 요청은 0
    pub message_size: i32,
    pub header: RequestHeader,
    pub payload: RequestPayload,
}

impl KafkaRequest {
    pub fn new(header: RequestHeader, payload: RequestPayload) -> Self {
        Self {
            message_size: 0,
            header,
            payload,
        }
    }
}

use super::common::{ApiKey, Cursor, ErrorCode, SUPPORTED_APIS};
use super::tagged_fields::TaggedFields;
use crate::domain::topic::{Partition, TopicMetadata};

/// 응답 헤더. 응답하는 API가 variant를 결정함
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseHeader {
    V0 {
        correlation_id: i32,
    },
    V1 {
        correlation_id: i32,
        tagged_fields: TaggedFields,
    },
}

impl ResponseHeader {
    pub fn for_api(api: ApiKey, correlation_id: i32) -> Self {
        match api.response_header_version() {
            0 => ResponseHeader::V0 { correlation_id },
            _ => ResponseHeader::V1 {
                correlation_id,
                tagged_fields: TaggedFields::default(),
            },
        }
    }

    pub fn correlation_id(&self) -> i32 {
        match self {
            ResponseHeader::V0 { correlation_id } | ResponseHeader::V1 { correlation_id, .. } => {
                *correlation_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiVersion {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
    pub tagged_fields: TaggedFields,
}

impl From<ApiKey> for ApiVersion {
    fn from(api: ApiKey) -> Self {
        Self {
            api_key: api.code(),
            min_version: *api.versions().start(),
            max_version: *api.versions().end(),
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiVersionsResponse {
    pub error_code: i16,
    pub api_versions: Vec<ApiVersion>,
    pub throttle_time_ms: i32,
    pub tagged_fields: TaggedFields,
}

impl ApiVersionsResponse {
    pub fn new(error_code: ErrorCode, api_versions: Vec<ApiVersion>) -> Self {
        Self {
            error_code: error_code.into(),
            api_versions,
            throttle_time_ms: 0,
            tagged_fields: TaggedFields::default(),
        }
    }

    /// 에러 코드와 관계없이 지원 API 전체를 광고함
    pub fn supported(error_code: ErrorCode) -> Self {
        Self::new(error_code, SUPPORTED_APIS.into_iter().map(ApiVersion::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartitionResponse {
    pub error_code: i16,
    pub partition_index: i32,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub replica_nodes: Vec<i32>,
    pub isr_nodes: Vec<i32>,
    pub eligible_leader_replicas: Vec<i32>,
    pub last_known_elrs: Vec<i32>,
    pub offline_replicas: Vec<i32>,
    pub tagged_fields: TaggedFields,
}

impl From<&Partition> for PartitionResponse {
    fn from(partition: &Partition) -> Self {
        Self {
            error_code: ErrorCode::None.into(),
            partition_index: partition.partition_index,
            leader_id: partition.leader_id,
            leader_epoch: partition.leader_epoch,
            replica_nodes: partition.replicas.clone(),
            isr_nodes: partition.in_sync_replicas.clone(),
            eligible_leader_replicas: partition.eligible_leader_replicas.clone(),
            last_known_elrs: partition.last_known_eligible_leader_replicas.clone(),
            offline_replicas: partition.offline_replicas.clone(),
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicResponse {
    pub error_code: i16,
    pub topic_name: String,
    pub topic_id: [u8; 16],
    pub is_internal: bool,
    pub partitions: Vec<PartitionResponse>,
    pub topic_authorized_operations: i32,
    pub tagged_fields: TaggedFields,
}

impl TopicResponse {
    pub fn unknown(topic_name: impl Into<String>) -> Self {
        Self {
            error_code: ErrorCode::UnknownTopicOrPartition.into(),
            topic_name: topic_name.into(),
            topic_id: [0; 16],
            is_internal: false,
            partitions: vec![],
            topic_authorized_operations: 0,
            tagged_fields: TaggedFields::default(),
        }
    }

    pub fn known(metadata: &TopicMetadata, partitions: &[Partition]) -> Self {
        Self {
            error_code: ErrorCode::None.into(),
            topic_name: metadata.name.clone(),
            topic_id: *metadata.topic_id.as_bytes(),
            is_internal: metadata.is_internal,
            partitions: partitions.iter().map(PartitionResponse::from).collect(),
            topic_authorized_operations: metadata.topic_authorized_operations,
            tagged_fields: TaggedFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescribeTopicPartitionsResponse {
    pub throttle_time_ms: i32,
    pub topics: Vec<TopicResponse>,
    /// `None`이면 다음 페이지 없음
    pub next_cursor: Option<Cursor>,
    pub tagged_fields: TaggedFields,
}

impl DescribeTopicPartitionsResponse {
    pub fn new(topics: Vec<TopicResponse>, next_cursor: Option<Cursor>) -> Self {
        Self {
            topics,
            next_cursor,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    ApiVersions(ApiVersionsResponse),
    DescribeTopicPartitions(DescribeTopicPartitionsResponse),
}

#[derive(Debug, Clone, PartialEq)]
pub struct KafkaResponse {
    pub header: ResponseHeader,
    /// 쓸 바디 레이아웃 버전
    pub api_version: i16,
    pub payload: ResponsePayload,
}

impl KafkaResponse {
    pub fn new(header: ResponseHeader, api_version: i16, payload: ResponsePayload) -> Self {
        Self {
            header,
            api_version,
            payload,
        }
    }

    pub fn correlation_id(&self) -> i32 {
        self.header.correlation_id()
    }

    pub fn api_key(&self) -> ApiKey {
        match self.payload {
            ResponsePayload::ApiVersions(_) => ApiKey::ApiVersions,
            ResponsePayload::DescribeTopicPartitions(_) => ApiKey::DescribeTopicPartitions,
        }
    }
}

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::protocol::constants::DEFAULT_MAX_PARTITIONS_PER_RESPONSE;
use crate::adapters::protocol::dto::{
    ApiKey, ApiVersionsResponse, Cursor, DescribeTopicPartitionsRequest,
    DescribeTopicPartitionsResponse, ErrorCode, KafkaRequest, KafkaResponse, RequestPayload,
    ResponseHeader, ResponsePayload, TopicResponse,
};
use crate::domain::error::ProtocolError;
use crate::ports::incoming::message_handler::MessageHandler;
use crate::ports::outgoing::metadata_store::MetadataStore;
use crate::Result;

/// 에러 응답은 모든 클라이언트가 읽을 수 있는 v0 레이아웃으로 씀
const FALLBACK_BODY_VERSION: i16 = 0;

pub struct KafkaBroker {
    metadata_store: Box<dyn MetadataStore>,
    max_partitions_per_response: i32,
}

impl KafkaBroker {
    pub fn new(metadata_store: Box<dyn MetadataStore>) -> Self {
        Self {
            metadata_store,
            max_partitions_per_response: DEFAULT_MAX_PARTITIONS_PER_RESPONSE,
        }
    }

    pub fn with_partition_limit(mut self, max_partitions_per_response: i32) -> Self {
        self.max_partitions_per_response = max_partitions_per_response;
        self
    }

    fn handle_api_versions(&self, request: &KafkaRequest) -> KafkaResponse {
        let header = &request.header;
        let (error_code, body_version) = if ApiKey::ApiVersions.supports(header.api_version) {
            (ErrorCode::None, header.api_version)
        } else {
            debug!(
                api_version = header.api_version,
                correlation_id = header.correlation_id,
                "unsupported ApiVersions version"
            );
            (ErrorCode::UnsupportedVersion, FALLBACK_BODY_VERSION)
        };

        KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::ApiVersions, header.correlation_id),
            body_version,
            ResponsePayload::ApiVersions(ApiVersionsResponse::supported(error_code)),
        )
    }

    /// 모르는 api key나 지원하지 않는 버전은 UNSUPPORTED_VERSION과 지원 목록을
    /// 담은 ApiVersions v0 바디로 응답함
    fn handle_unsupported(&self, request: &KafkaRequest) -> KafkaResponse {
        let header = &request.header;
        match ApiKey::from_code(header.api_key) {
            Some(api) => debug!(
                api = api.name(),
                api_version = header.api_version,
                correlation_id = header.correlation_id,
                "answering unsupported version"
            ),
            None => debug!(
                error = %ProtocolError::UnrecognizedApi(header.api_key),
                correlation_id = header.correlation_id,
                "answering unrecognized api"
            ),
        }

        KafkaResponse::new(
            ResponseHeader::V0 {
                correlation_id: header.correlation_id,
            },
            FALLBACK_BODY_VERSION,
            ResponsePayload::ApiVersions(ApiVersionsResponse::supported(
                ErrorCode::UnsupportedVersion,
            )),
        )
    }

    fn partition_budget(&self, requested: i32) -> usize {
        let limit = if requested <= 0 {
            self.max_partitions_per_response
        } else {
            requested.min(self.max_partitions_per_response)
        };
        usize::try_from(limit).unwrap_or(0)
    }

    async fn handle_describe_topic_partitions(
        &self,
        request: &KafkaRequest,
    ) -> Result<KafkaResponse> {
        let RequestPayload::DescribeTopicPartitions(req) = &request.payload else {
            return Err(ProtocolError::TypeMismatch {
                api_key: request.header.api_key,
                expected: ApiKey::DescribeTopicPartitions.name(),
            }
            .into());
        };

        let response = self.describe_topics(req).await?;
        debug!(
            correlation_id = request.header.correlation_id,
            topics = response.topics.len(),
            paginated = response.next_cursor.is_some(),
            "described topic partitions"
        );

        Ok(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::DescribeTopicPartitions, request.header.correlation_id),
            request.header.api_version,
            ResponsePayload::DescribeTopicPartitions(response),
        ))
    }

    /// 요청 순서대로 토픽을 채우다가 파티션 한도를 넘으면 next_cursor를 남김.
    /// 요청에 있는 토픽을 가리키는 cursor면 그 위치부터 재개하고 아니면 무시함
    async fn describe_topics(
        &self,
        req: &DescribeTopicPartitionsRequest,
    ) -> Result<DescribeTopicPartitionsResponse> {
        let mut budget = self.partition_budget(req.response_partition_limit);

        let (first_topic, first_partition) = req
            .cursor
            .as_ref()
            .and_then(|cursor| {
                req.topics
                    .iter()
                    .position(|topic| topic.topic_name == cursor.topic_name)
                    .map(|index| (index, cursor.partition_index))
            })
            .unwrap_or((0, i32::MIN));

        let mut topics = Vec::with_capacity(req.topics.len() - first_topic);
        let mut next_cursor = None;

        for (index, topic) in req.topics.iter().enumerate().skip(first_topic) {
            let Some(metadata) = self.metadata_store.get_topic_metadata(&topic.topic_name).await?
            else {
                topics.push(TopicResponse::unknown(&topic.topic_name));
                continue;
            };

            let min_partition = if index == first_topic { first_partition } else { i32::MIN };
            // partitions는 인덱스 순으로 정렬되어 있음
            let from = metadata
                .partitions
                .iter()
                .position(|p| p.partition_index >= min_partition)
                .unwrap_or(metadata.partitions.len());
            let pending = &metadata.partitions[from..];

            if pending.len() > budget {
                let (page, rest) = pending.split_at(budget);
                if !page.is_empty() {
                    topics.push(TopicResponse::known(&metadata, page));
                }
                next_cursor = rest
                    .first()
                    .map(|p| Cursor::new(metadata.name.clone(), p.partition_index));
                break;
            }

            budget -= pending.len();
            topics.push(TopicResponse::known(&metadata, pending));
        }

        Ok(DescribeTopicPartitionsResponse::new(topics, next_cursor))
    }
}

#[async_trait]
impl MessageHandler for KafkaBroker {
    async fn handle_request(&self, request: KafkaRequest) -> Result<KafkaResponse> {
        match ApiKey::from_code(request.header.api_key) {
            Some(ApiKey::ApiVersions) => Ok(self.handle_api_versions(&request)),
            Some(api @ ApiKey::DescribeTopicPartitions) if api.supports(request.header.api_version) => {
                self.handle_describe_topic_partitions(&request).await
            }
            _ => Ok(self.handle_unsupported(&request)),
        }
    }
}

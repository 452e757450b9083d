use bytes::{Buf, Bytes};
use tracing::debug;

use super::base_parser::BaseParser;
use super::cursor::parse_nullable_cursor;
use super::traits::*;
use crate::adapters::protocol::constants::API_VERSIONS_FLEXIBLE_VERSION;
use crate::adapters::protocol::dto::{
    ApiKey, ApiVersion, ApiVersionsResponse, DescribeTopicPartitionsResponse, KafkaResponse,
    PartitionResponse, ResponseHeader, ResponsePayload, TaggedFields, TopicResponse,
};
use crate::domain::error::ProtocolError;

impl Deserialize for ResponseHeader {
    /// `version`은 헤더 버전 (0 또는 1)
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        let correlation_id = parser.parse_i32(src)?;
        match version {
            0 => Ok(ResponseHeader::V0 { correlation_id }),
            1 => Ok(ResponseHeader::V1 {
                correlation_id,
                tagged_fields: parser.parse_tagged_fields(src)?,
            }),
            other => Err(ProtocolError::UnknownHeaderVersion(other)),
        }
    }
}

impl Deserialize for ApiVersion {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            api_key: parser.parse_i16(src)?,
            min_version: parser.parse_i16(src)?,
            max_version: parser.parse_i16(src)?,
            tagged_fields: if version >= API_VERSIONS_FLEXIBLE_VERSION {
                parser.parse_tagged_fields(src)?
            } else {
                TaggedFields::default()
            },
        })
    }
}

impl Deserialize for ApiVersionsResponse {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        let flexible = version >= API_VERSIONS_FLEXIBLE_VERSION;

        let error_code = parser.parse_i16(src)?;
        let api_versions = if flexible {
            parser.parse_compact_array(src, |buf| ApiVersion::deserialize(buf, version))?
        } else {
            parser.parse_array(src, |buf| ApiVersion::deserialize(buf, version))?
        };
        let throttle_time_ms = if version >= 1 { parser.parse_i32(src)? } else { 0 };
        let tagged_fields = if flexible {
            parser.parse_tagged_fields(src)?
        } else {
            TaggedFields::default()
        };

        Ok(Self {
            error_code,
            api_versions,
            throttle_time_ms,
            tagged_fields,
        })
    }
}

fn parse_node_list(src: &mut Bytes) -> Result<Vec<i32>, ProtocolError> {
    let parser = BaseParser;
    parser.parse_compact_array(src, |buf| parser.parse_i32(buf))
}

impl Deserialize for PartitionResponse {
    fn deserialize(src: &mut Bytes, _version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            error_code: parser.parse_i16(src)?,
            partition_index: parser.parse_i32(src)?,
            leader_id: parser.parse_i32(src)?,
            leader_epoch: parser.parse_i32(src)?,
            replica_nodes: parse_node_list(src)?,
            isr_nodes: parse_node_list(src)?,
            eligible_leader_replicas: parse_node_list(src)?,
            last_known_elrs: parse_node_list(src)?,
            offline_replicas: parse_node_list(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Deserialize for TopicResponse {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            error_code: parser.parse_i16(src)?,
            topic_name: parser.parse_compact_string(src)?,
            topic_id: parser.parse_uuid(src)?,
            is_internal: parser.parse_bool(src)?,
            partitions: parser
                .parse_compact_array(src, |buf| PartitionResponse::deserialize(buf, version))?,
            topic_authorized_operations: parser.parse_i32(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Deserialize for DescribeTopicPartitionsResponse {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            throttle_time_ms: parser.parse_i32(src)?,
            topics: parser.parse_compact_array(src, |buf| TopicResponse::deserialize(buf, version))?,
            next_cursor: parse_nullable_cursor(src, version)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

/// 클라이언트 쪽 코덱: 응답 프레임을 읽음
#[derive(Debug, Default, Clone)]
pub struct ResponseDecoder;

impl ResponseDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 길이 필드를 포함한 응답 프레임 전체를 파싱함. API와 바디 레이아웃 버전은
    /// 와이어에 없으므로 호출자가 알려줘야 함
    pub fn decode(
        &self,
        mut frame: Bytes,
        api_key: ApiKey,
        api_version: i16,
    ) -> Result<KafkaResponse, ProtocolError> {
        let parser = BaseParser;
        let message_size = parser.parse_i32(&mut frame)?;
        let size = usize::try_from(message_size)
            .map_err(|_| ProtocolError::InvalidLength(i64::from(message_size)))?;
        parser.ensure_remaining(&frame, size)?;
        let mut buf = frame.split_to(size);

        let header = ResponseHeader::deserialize(&mut buf, api_key.response_header_version())?;
        let payload = match api_key {
            ApiKey::ApiVersions => {
                ResponsePayload::ApiVersions(ApiVersionsResponse::deserialize(&mut buf, api_version)?)
            }
            ApiKey::DescribeTopicPartitions => ResponsePayload::DescribeTopicPartitions(
                DescribeTopicPartitionsResponse::deserialize(&mut buf, api_version)?,
            ),
        };

        if buf.has_remaining() {
            debug!(trailing = buf.remaining(), "ignoring trailing bytes in response frame");
        }

        Ok(KafkaResponse::new(header, api_version, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::dto::{Cursor, ErrorCode};
    use crate::adapters::protocol::parser::response_encoder::ResponseEncoder;
    use crate::domain::topic::{Partition, TopicMetadata};

    fn reencode(response: KafkaResponse) -> KafkaResponse {
        let api_key = response.api_key();
        let frame = ResponseEncoder::new().encode(&response).unwrap();
        ResponseDecoder::new()
            .decode(frame, api_key, response.api_version)
            .unwrap()
    }

    #[test]
    fn test_decode_api_versions_every_layout() {
        for version in 0..=4 {
            let response = KafkaResponse::new(
                ResponseHeader::for_api(ApiKey::ApiVersions, 11),
                version,
                ResponsePayload::ApiVersions(ApiVersionsResponse::supported(ErrorCode::None)),
            );
            assert_eq!(reencode(response.clone()), response, "version {}", version);
        }
    }

    #[test]
    fn test_decode_describe_topic_partitions() {
        let mut partition = Partition::single_replica(0, 1);
        partition.eligible_leader_replicas = vec![1, 2];
        let metadata = TopicMetadata::new("orders", vec![partition]);
        let mut topic = TopicResponse::known(&metadata, &metadata.partitions);
        topic.tagged_fields.insert(9, &b"x"[..]);

        let response = KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::DescribeTopicPartitions, 5),
            0,
            ResponsePayload::DescribeTopicPartitions(DescribeTopicPartitionsResponse::new(
                vec![topic, TopicResponse::unknown("missing")],
                Some(Cursor::new("orders", 1)),
            )),
        );
        assert_eq!(reencode(response.clone()), response);
    }

    #[test]
    fn test_decode_truncated_frame() {
        let frame = Bytes::from_static(&[0, 0, 0, 10, 0, 0, 0, 1]);
        assert!(matches!(
            ResponseDecoder::new().decode(frame, ApiKey::ApiVersions, 0),
            Err(ProtocolError::TruncatedInput { .. })
        ));
    }
}

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::cursor::put_nullable_cursor;
use super::traits::{Serialize, WireWriter};
use crate::adapters::protocol::constants::API_VERSIONS_FLEXIBLE_VERSION;
use crate::adapters::protocol::dto::{
    ApiVersion, ApiVersionsResponse, DescribeTopicPartitionsResponse, KafkaResponse,
    PartitionResponse, ResponseHeader, ResponsePayload, TopicResponse,
};
use crate::adapters::protocol::framer::{begin_frame, finish_frame};
use crate::domain::error::ProtocolError;

impl Serialize for ResponseHeader {
    fn serialize(&self, dst: &mut BytesMut, _version: i16) -> Result<(), ProtocolError> {
        match self {
            ResponseHeader::V0 { correlation_id } => dst.put_i32(*correlation_id),
            ResponseHeader::V1 {
                correlation_id,
                tagged_fields,
            } => {
                dst.put_i32(*correlation_id);
                dst.put_tagged_fields(tagged_fields);
            }
        }
        Ok(())
    }
}

impl Serialize for ApiVersion {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        dst.put_i16(self.api_key);
        dst.put_i16(self.min_version);
        dst.put_i16(self.max_version);
        if version >= API_VERSIONS_FLEXIBLE_VERSION {
            dst.put_tagged_fields(&self.tagged_fields);
        }
        Ok(())
    }
}

impl Serialize for ApiVersionsResponse {
    /// v0: 에러 코드 + int32 개수 배열
    /// v1~2: throttle_time_ms 추가
    /// v3+: compact 배열과 tagged fields
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        let flexible = version >= API_VERSIONS_FLEXIBLE_VERSION;

        dst.put_i16(self.error_code);
        if flexible {
            dst.put_compact_array_len(self.api_versions.len());
        } else {
            dst.put_array_len(self.api_versions.len())?;
        }
        for api_version in &self.api_versions {
            api_version.serialize(dst, version)?;
        }
        if version >= 1 {
            dst.put_i32(self.throttle_time_ms);
        }
        if flexible {
            dst.put_tagged_fields(&self.tagged_fields);
        }
        Ok(())
    }
}

impl Serialize for PartitionResponse {
    fn serialize(&self, dst: &mut BytesMut, _version: i16) -> Result<(), ProtocolError> {
        dst.put_i16(self.error_code);
        dst.put_i32(self.partition_index);
        dst.put_i32(self.leader_id);
        dst.put_i32(self.leader_epoch);
        dst.put_compact_i32_array(&self.replica_nodes);
        dst.put_compact_i32_array(&self.isr_nodes);
        dst.put_compact_i32_array(&self.eligible_leader_replicas);
        dst.put_compact_i32_array(&self.last_known_elrs);
        dst.put_compact_i32_array(&self.offline_replicas);
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

impl Serialize for TopicResponse {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        dst.put_i16(self.error_code);
        dst.put_compact_string(&self.topic_name);
        dst.put_slice(&self.topic_id);
        dst.put_u8(u8::from(self.is_internal));
        dst.put_compact_array_len(self.partitions.len());
        for partition in &self.partitions {
            partition.serialize(dst, version)?;
        }
        dst.put_i32(self.topic_authorized_operations);
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

impl Serialize for DescribeTopicPartitionsResponse {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        dst.put_i32(self.throttle_time_ms);
        dst.put_compact_array_len(self.topics.len());
        for topic in &self.topics {
            topic.serialize(dst, version)?;
        }
        put_nullable_cursor(dst, self.next_cursor.as_ref(), version)?;
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// 프레임 전체를 씀. 크기 필드는 바디를 쓴 뒤에 채움
    pub fn encode(&self, response: &KafkaResponse) -> Result<Bytes, ProtocolError> {
        let mut buf = BytesMut::new();
        let start = begin_frame(&mut buf);

        response.header.serialize(&mut buf, response.api_version)?;
        match &response.payload {
            ResponsePayload::ApiVersions(body) => body.serialize(&mut buf, response.api_version)?,
            ResponsePayload::DescribeTopicPartitions(body) => {
                body.serialize(&mut buf, response.api_version)?
            }
        }

        finish_frame(&mut buf, start)?;
        trace!(
            correlation_id = response.correlation_id(),
            bytes = %hex::encode(&buf),
            "encoded response frame"
        );
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::dto::{ApiKey, Cursor, ErrorCode, TaggedFields};
    use crate::domain::topic::{Partition, TopicId, TopicMetadata};

    fn encode(response: KafkaResponse) -> Bytes {
        ResponseEncoder::new().encode(&response).unwrap()
    }

    fn assert_size_prefix(frame: &[u8]) {
        let size = i32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        assert_eq!(size as usize, frame.len() - 4);
    }

    #[test]
    fn test_encode_api_versions_v4() {
        let frame = encode(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::ApiVersions, 7),
            4,
            ResponsePayload::ApiVersions(ApiVersionsResponse::supported(ErrorCode::None)),
        ));

        let expected: Vec<u8> = vec![
            0, 0, 0, 26, // message size
            0, 0, 0, 7, // correlation id
            0, 0, // error code
            3, // api key 2개
            0, 18, 0, 0, 0, 4, 0, // ApiVersions 0..=4
            0, 75, 0, 0, 0, 0, 0, // DescribeTopicPartitions 0..=0
            0, 0, 0, 0, // throttle time
            0, // tag buffer
        ];
        assert_eq!(&frame[..], &expected[..]);
    }

    #[test]
    fn test_encode_api_versions_v0_uses_int32_count() {
        let frame = encode(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::ApiVersions, 1),
            0,
            ResponsePayload::ApiVersions(ApiVersionsResponse::supported(ErrorCode::UnsupportedVersion)),
        ));

        let expected: Vec<u8> = vec![
            0, 0, 0, 22, // message size
            0, 0, 0, 1, // correlation id
            0, 35, // UNSUPPORTED_VERSION
            0, 0, 0, 2, // int32 count
            0, 18, 0, 0, 0, 4, //
            0, 75, 0, 0, 0, 0,
        ];
        assert_eq!(&frame[..], &expected[..]);
    }

    #[test]
    fn test_encode_api_versions_v1_adds_throttle_time() {
        let mut body = ApiVersionsResponse::supported(ErrorCode::None);
        body.throttle_time_ms = 0x0102;
        let frame = encode(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::ApiVersions, 1),
            1,
            ResponsePayload::ApiVersions(body),
        ));
        assert_size_prefix(&frame);
        assert_eq!(&frame[frame.len() - 4..], &[0, 0, 1, 2]);
    }

    #[test]
    fn test_encode_unknown_topic() {
        let frame = encode(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::DescribeTopicPartitions, 9),
            0,
            ResponsePayload::DescribeTopicPartitions(DescribeTopicPartitionsResponse::new(
                vec![TopicResponse::unknown("foo")],
                None,
            )),
        ));

        let mut expected: Vec<u8> = vec![
            0, 0, 0, 0, // 아래에서 채움
            0, 0, 0, 9, // correlation id
            0, // header tag buffer
            0, 0, 0, 0, // throttle time
            2, // 토픽 1개
            0, 3, // UNKNOWN_TOPIC_OR_PARTITION
            4, b'f', b'o', b'o',
        ];
        expected.extend_from_slice(&[0; 16]); // topic id
        expected.extend_from_slice(&[
            0, // is internal
            1, // 파티션 없음
            0, 0, 0, 0, // authorized operations
            0, // topic tag buffer
            0xFF, // next cursor 없음
            0, // tag buffer
        ]);
        let size = (expected.len() - 4) as i32;
        expected[..4].copy_from_slice(&size.to_be_bytes());

        assert_eq!(&frame[..], &expected[..]);
    }

    #[test]
    fn test_encode_partitions_and_cursor() {
        let mut partition = Partition::single_replica(2, 1);
        partition.offline_replicas = vec![3];
        let mut metadata = TopicMetadata::new("bar", vec![partition]);
        metadata.topic_id = TopicId::new([0xAB; 16]);
        let response = DescribeTopicPartitionsResponse::new(
            vec![TopicResponse::known(&metadata, &metadata.partitions)],
            Some(Cursor::new("bar", 3)),
        );

        let mut buf = BytesMut::new();
        response.serialize(&mut buf, 0).unwrap();

        let mut expected: Vec<u8> = vec![0, 0, 0, 0, 2, 0, 0, 4, b'b', b'a', b'r'];
        expected.extend_from_slice(&[0xAB; 16]);
        expected.extend_from_slice(&[
            0, // is internal
            2, // 파티션 1개
            0, 0, // error code
            0, 0, 0, 2, // partition index
            0, 0, 0, 1, // leader id
            0, 0, 0, 0, // leader epoch
            2, 0, 0, 0, 1, // replicas
            2, 0, 0, 0, 1, // isr
            1, // eligible leader replicas
            1, // last known elr
            2, 0, 0, 0, 3, // offline
            0, // partition tag buffer
        ]);
        expected.extend_from_slice(&metadata.topic_authorized_operations.to_be_bytes());
        expected.extend_from_slice(&[
            0, // topic tag buffer
            1, 4, b'b', b'a', b'r', 0, 0, 0, 3, 0, // next cursor
            0, // tag buffer
        ]);
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn test_encode_header_tagged_fields() {
        let header = ResponseHeader::V1 {
            correlation_id: 1,
            tagged_fields: TaggedFields::from_iter([(0u64, vec![0x01u8])]),
        };
        let mut buf = BytesMut::new();
        header.serialize(&mut buf, 0).unwrap();
        assert_eq!(&buf[..], &[0, 0, 0, 1, 1, 0, 1, 0x01]);
    }

    #[test]
    fn test_frame_size_matches_body() {
        let topics = (0..40)
            .map(|i| TopicResponse::unknown(format!("topic-{}", i)))
            .collect();
        let frame = encode(KafkaResponse::new(
            ResponseHeader::for_api(ApiKey::DescribeTopicPartitions, 3),
            0,
            ResponsePayload::DescribeTopicPartitions(DescribeTopicPartitionsResponse::new(topics, None)),
        ));
        assert_size_prefix(&frame);
    }
}

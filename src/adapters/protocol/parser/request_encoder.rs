use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::cursor::put_nullable_cursor;
use super::traits::{Serialize, WireWriter};
use crate::adapters::protocol::constants::API_VERSIONS_FLEXIBLE_VERSION;
use crate::adapters::protocol::dto::{
    ApiVersionsRequest, DescribeTopicPartitionsRequest, KafkaRequest, RequestHeader,
    RequestPayload, TopicRequest,
};
use crate::adapters::protocol::framer::{begin_frame, finish_frame};
use crate::domain::error::ProtocolError;

impl Serialize for RequestHeader {
    fn serialize(&self, dst: &mut BytesMut, _version: i16) -> Result<(), ProtocolError> {
        dst.put_i16(self.api_key);
        dst.put_i16(self.api_version);
        dst.put_i32(self.correlation_id);
        dst.put_nullable_string(self.client_id.as_deref())?;
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

impl Serialize for ApiVersionsRequest {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        if version >= API_VERSIONS_FLEXIBLE_VERSION {
            dst.put_compact_string(&self.client_software_name);
            dst.put_compact_string(&self.client_software_version);
            dst.put_tagged_fields(&self.tagged_fields);
        }
        Ok(())
    }
}

impl Serialize for TopicRequest {
    fn serialize(&self, dst: &mut BytesMut, _version: i16) -> Result<(), ProtocolError> {
        dst.put_compact_string(&self.topic_name);
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

impl Serialize for DescribeTopicPartitionsRequest {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError> {
        dst.put_compact_array_len(self.topics.len());
        for topic in &self.topics {
            topic.serialize(dst, version)?;
        }
        dst.put_i32(self.response_partition_limit);
        put_nullable_cursor(dst, self.cursor.as_ref(), version)?;
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

/// 클라이언트 쪽 코덱: 요청 프레임을 씀
#[derive(Debug, Default, Clone)]
pub struct RequestEncoder;

impl RequestEncoder {
    pub fn new() -> Self {
        Self
    }

    /// `Unsupported` 페이로드는 헤더만 씀
    pub fn encode(&self, request: &KafkaRequest) -> Result<Bytes, ProtocolError> {
        let version = request.header.api_version;
        let mut buf = BytesMut::new();
        let start = begin_frame(&mut buf);

        request.header.serialize(&mut buf, version)?;
        match &request.payload {
            RequestPayload::ApiVersions(body) => body.serialize(&mut buf, version)?,
            RequestPayload::DescribeTopicPartitions(body) => body.serialize(&mut buf, version)?,
            RequestPayload::Unsupported => {}
        }

        finish_frame(&mut buf, start)?;
        trace!(
            correlation_id = request.header.correlation_id,
            bytes = %hex::encode(&buf),
            "encoded request frame"
        );
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::dto::Cursor;
    use crate::adapters::protocol::parser::request_parser::RequestParser;

    #[test]
    fn test_encode_api_versions_request() {
        let mut header = RequestHeader::new(18, 4, 7);
        header.client_id = Some("cli".to_string());
        let request = KafkaRequest::new(
            header,
            RequestPayload::ApiVersions(ApiVersionsRequest {
                client_software_name: "kafka".to_string(),
                client_software_version: "1".to_string(),
                ..Default::default()
            }),
        );

        let frame = RequestEncoder::new().encode(&request).unwrap();
        let expected: Vec<u8> = vec![
            0, 0, 0, 23, // message size
            0, 18, 0, 4, 0, 0, 0, 7, // key, version, correlation id
            0, 3, b'c', b'l', b'i', // client id
            0, // header tag buffer
            6, b'k', b'a', b'f', b'k', b'a', // software name
            2, b'1', // software version
            0, // tag buffer
        ];
        assert_eq!(&frame[..], &expected[..]);
    }

    #[test]
    fn test_encode_legacy_api_versions_request_has_no_body() {
        let request = KafkaRequest::new(
            RequestHeader::new(18, 0, 1),
            RequestPayload::ApiVersions(ApiVersionsRequest::default()),
        );
        let frame = RequestEncoder::new().encode(&request).unwrap();
        assert_eq!(&frame[..], &[0, 0, 0, 11, 0, 18, 0, 0, 0, 0, 0, 1, 0xFF, 0xFF, 0]);
    }

    #[test]
    fn test_encoded_request_parses_back() {
        let request = KafkaRequest::new(
            RequestHeader::new(75, 0, 42),
            RequestPayload::DescribeTopicPartitions(DescribeTopicPartitionsRequest {
                topics: vec![TopicRequest::new("a"), TopicRequest::new("b")],
                response_partition_limit: 10,
                cursor: Some(Cursor::new("b", 4)),
                ..Default::default()
            }),
        );

        let frame = RequestEncoder::new().encode(&request).unwrap();
        let parsed = RequestParser::new().parse(frame.clone()).unwrap();

        assert_eq!(parsed.message_size as usize, frame.len() - 4);
        assert_eq!(parsed.header, request.header);
        assert_eq!(parsed.payload, request.payload);
    }
}

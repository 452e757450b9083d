use bytes::{Buf, Bytes};
use tracing::{debug, trace};

use super::base_parser::BaseParser;
use super::cursor::parse_nullable_cursor;
use super::traits::*;
use crate::adapters::protocol::constants::{
    API_VERSIONS_FLEXIBLE_VERSION, REQUEST_HEADER_VERSION,
};
use crate::adapters::protocol::dto::{
    ApiKey, ApiVersionsRequest, DescribeTopicPartitionsRequest, KafkaRequest,
    RequestHeader, RequestPayload, TopicRequest,
};
use crate::application::error::ApplicationError;
use crate::domain::error::ProtocolError;

impl Deserialize for RequestHeader {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        if version != REQUEST_HEADER_VERSION {
            return Err(ProtocolError::UnknownHeaderVersion(version));
        }
        let parser = BaseParser;
        Ok(Self {
            api_key: parser.parse_i16(src)?,
            api_version: parser.parse_i16(src)?,
            correlation_id: parser.parse_i32(src)?,
            client_id: parser.parse_nullable_string(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Deserialize for ApiVersionsRequest {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        // v0~v2 바디는 비어 있음
        if version < API_VERSIONS_FLEXIBLE_VERSION {
            return Ok(Self::default());
        }
        let parser = BaseParser;
        Ok(Self {
            client_software_name: parser.parse_compact_string(src)?,
            client_software_version: parser.parse_compact_string(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Deserialize for TopicRequest {
    fn deserialize(src: &mut Bytes, _version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            topic_name: parser.parse_compact_string(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Deserialize for DescribeTopicPartitionsRequest {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        let topics = parser.parse_compact_array(src, |buf| TopicRequest::deserialize(buf, version))?;
        Ok(Self {
            topics,
            response_partition_limit: parser.parse_i32(src)?,
            cursor: parse_nullable_cursor(src, version)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct RequestParser;

impl RequestParser {
    pub fn new() -> Self {
        Self
    }

    /// 길이 필드를 포함한 프레임 하나를 파싱함
    ///
    /// 헤더 실패는 `MalformedHeader`. correlation id가 없으면 응답할 수 없음.
    /// 바디 실패는 `MalformedBody`이고 프레임 경계는 이미 알고 있으므로 호출자가
    /// 프레임을 버리고 계속 진행할 수 있음
    pub fn parse(&self, mut frame: Bytes) -> Result<KafkaRequest, ApplicationError> {
        trace!(bytes = %hex::encode(&frame), "parsing request frame");
        let parser = BaseParser;

        let message_size = parser
            .parse_i32(&mut frame)
            .map_err(ApplicationError::MalformedHeader)?;
        let size = usize::try_from(message_size).map_err(|_| {
            ApplicationError::MalformedHeader(ProtocolError::InvalidLength(i64::from(message_size)))
        })?;
        parser
            .ensure_remaining(&frame, size)
            .map_err(ApplicationError::MalformedHeader)?;
        // 선언된 크기 이후의 바이트는 이 요청에 속하지 않음
        let mut buf = frame.split_to(size);

        let header = RequestHeader::deserialize(&mut buf, REQUEST_HEADER_VERSION)
            .map_err(ApplicationError::MalformedHeader)?;
        debug!(
            api_key = header.api_key,
            api_version = header.api_version,
            correlation_id = header.correlation_id,
            client_id = header.client_id.as_deref().unwrap_or("-"),
            "parsed request header"
        );

        let payload =
            self.parse_payload(&mut buf, &header)
                .map_err(|source| ApplicationError::MalformedBody {
                    api_key: header.api_key,
                    correlation_id: header.correlation_id,
                    source,
                })?;

        if buf.has_remaining() {
            debug!(
                trailing = buf.remaining(),
                correlation_id = header.correlation_id,
                "ignoring trailing bytes in request frame"
            );
        }

        Ok(KafkaRequest {
            message_size,
            header,
            payload,
        })
    }

    fn parse_payload(
        &self,
        buf: &mut Bytes,
        header: &RequestHeader,
    ) -> Result<RequestPayload, ProtocolError> {
        let version = header.api_version;
        match ApiKey::from_code(header.api_key) {
            // 지원하지 않는 버전은 레이아웃을 모름. 바디 없이 dispatcher가 응답함
            Some(ApiKey::ApiVersions) if ApiKey::ApiVersions.supports(version) => {
                ApiVersionsRequest::deserialize(buf, version).map(RequestPayload::ApiVersions)
            }
            Some(ApiKey::ApiVersions) => Ok(RequestPayload::ApiVersions(ApiVersionsRequest::default())),
            Some(api @ ApiKey::DescribeTopicPartitions) if api.supports(version) => {
                DescribeTopicPartitionsRequest::deserialize(buf, version)
                    .map(RequestPayload::DescribeTopicPartitions)
            }
            Some(ApiKey::DescribeTopicPartitions) | None => Ok(RequestPayload::Unsupported),
        }
    }
}

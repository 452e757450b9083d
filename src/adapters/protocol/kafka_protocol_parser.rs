use bytes::Bytes;

use super::dto::{ApiKey, KafkaRequest, KafkaResponse};
use super::parser::request_encoder::RequestEncoder;
use super::parser::request_parser::RequestParser;
use super::parser::response_decoder::ResponseDecoder;
use super::parser::response_encoder::ResponseEncoder;
use crate::application::error::ApplicationError;
use crate::domain::error::ProtocolError;

/// 서버/클라이언트 양방향 코덱을 묶는 facade
#[derive(Debug, Default, Clone)]
pub struct KafkaProtocolParser {
    request_parser: RequestParser,
    response_encoder: ResponseEncoder,
    request_encoder: RequestEncoder,
    response_decoder: ResponseDecoder,
}

impl KafkaProtocolParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 길이 필드를 포함한 프레임 전체를 받음
    pub fn parse_request(&self, frame: Bytes) -> Result<KafkaRequest, ApplicationError> {
        self.request_parser.parse(frame)
    }

    pub fn encode_response(&self, response: &KafkaResponse) -> Result<Bytes, ProtocolError> {
        self.response_encoder.encode(response)
    }

    pub fn encode_request(&self, request: &KafkaRequest) -> Result<Bytes, ProtocolError> {
        self.request_encoder.encode(request)
    }

    pub fn parse_response(
        &self,
        frame: Bytes,
        api_key: ApiKey,
        api_version: i16,
    ) -> Result<KafkaResponse, ProtocolError> {
        self.response_decoder.decode(frame, api_key, api_version)
    }
}

use async_trait::async_trait;

use crate::adapters::protocol::dto::{KafkaRequest, KafkaResponse};
use crate::Result;

/// 파싱된 요청 하나를 받아 응답 하나를 만드는 포트
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_request(&self, request: KafkaRequest) -> Result<KafkaResponse>;
}

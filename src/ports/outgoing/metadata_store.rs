use async_trait::async_trait;

use crate::domain::topic::TopicMetadata;
use crate::Result;

/// 토픽 메타데이터 조회 포트. 모르는 토픽이면 `None`
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_topic_metadata(&self, topic_name: &str) -> Result<Option<TopicMetadata>>;
}

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::topic::TopicMetadata;
use crate::ports::outgoing::metadata_store::MetadataStore;
use crate::Result;

/// 생성 시점에 고정되는 메모리 토픽 메타데이터
///
/// 빈 저장소는 아는 토픽이 없으므로 모든 조회가 unknown으로 응답됨
#[derive(Debug, Default, Clone)]
pub struct MemoryMetadataStore {
    topics: HashMap<String, TopicMetadata>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 이름이 여러 번 나오면 마지막 것이 남음
    pub fn with_topics(topics: impl IntoIterator<Item = TopicMetadata>) -> Self {
        Self {
            topics: topics
                .into_iter()
                .map(|topic| (topic.name.clone(), topic))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn get_topic_metadata(&self, topic_name: &str) -> Result<Option<TopicMetadata>> {
        Ok(self.topics.get(topic_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topic::Partition;

    #[tokio::test]
    async fn test_empty_store_knows_nothing() -> Result<()> {
        let store = MemoryMetadataStore::new();
        assert!(store.is_empty());
        assert!(store.get_topic_metadata("foo").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_name() -> Result<()> {
        let orders = TopicMetadata::new("orders", vec![Partition::single_replica(0, 1)]);
        let store = MemoryMetadataStore::with_topics(vec![
            orders.clone(),
            TopicMetadata::new("payments", vec![]),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_topic_metadata("orders").await?, Some(orders));
        assert!(store.get_topic_metadata("Orders").await?.is_none());
        Ok(())
    }
}

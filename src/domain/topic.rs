use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicId {
    id: Uuid,
}

impl TopicId {
    pub fn new(id: [u8; 16]) -> Self {
        Self {
            id: Uuid::from_bytes(id),
        }
    }

    pub fn random() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn zero() -> Self {
        Self { id: Uuid::nil() }
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.id.as_bytes()
    }
}

impl FromStr for TopicId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self {
            id: Uuid::parse_str(s)?,
        })
    }
}

/// 메타데이터 제공자가 토픽 하나에 대해 아는 정보
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMetadata {
    pub name: String,
    pub topic_id: TopicId,
    pub is_internal: bool,
    pub partitions: Vec<Partition>,
    pub topic_authorized_operations: i32,
}

impl TopicMetadata {
    /// 새 랜덤 id로 생성. 파티션은 인덱스 순으로 정렬해 둠
    pub fn new(name: impl Into<String>, mut partitions: Vec<Partition>) -> Self {
        partitions.sort_by_key(|p| p.partition_index);
        Self {
            name: name.into(),
            topic_id: TopicId::random(),
            is_internal: false,
            partitions,
            topic_authorized_operations: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    pub partition_index: i32,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub replicas: Vec<i32>,
    pub in_sync_replicas: Vec<i32>,
    pub eligible_leader_replicas: Vec<i32>,
    pub last_known_eligible_leader_replicas: Vec<i32>,
    pub offline_replicas: Vec<i32>,
}

impl Partition {
    /// `leader_id`가 유일한 replica이자 ISR 멤버인 파티션
    pub fn single_replica(partition_index: i32, leader_id: i32) -> Self {
        Self {
            partition_index,
            leader_id,
            leader_epoch: 0,
            replicas: vec![leader_id],
            in_sync_replicas: vec![leader_id],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_id_from_uuid_string() {
        let id: TopicId = "00000000-0000-4000-8000-000000000091".parse().unwrap();
        assert_eq!(id.as_bytes()[6], 0x40);
        assert_eq!(id.as_bytes()[15], 0x91);
        assert_eq!(TopicId::new(*id.as_bytes()), id);
        assert_eq!(TopicId::zero().as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn test_topic_metadata_sorts_partitions() {
        let metadata = TopicMetadata::new(
            "orders",
            vec![Partition::single_replica(2, 1), Partition::single_replica(0, 1)],
        );
        let indexes: Vec<i32> = metadata.partitions.iter().map(|p| p.partition_index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_ne!(metadata.topic_id, TopicId::zero());
    }
}

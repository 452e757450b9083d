use bytes::Bytes;
use std::collections::BTreeMap;

/// 하위 호환 확장 블록: tag id -> 해석하지 않는 페이로드
///
/// 태그는 항상 오름차순으로 다시 인코딩됨. 입력이 이미 오름차순이고 태그 중복이
/// 없을 때만 디코딩한 바이트와 똑같이 나옴. 그 외 입력은 정렬된 형태로 정규화되고
/// 중복 태그는 마지막 값이 남음
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedFields {
    fields: BTreeMap<u64, Bytes>,
}

impl TaggedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 태그의 이전 값이 있으면 덮어씀
    pub fn insert(&mut self, tag: u64, value: impl Into<Bytes>) -> Option<Bytes> {
        self.fields.insert(tag, value.into())
    }

    pub fn get(&self, tag: u64) -> Option<&Bytes> {
        self.fields.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Bytes)> {
        self.fields.iter().map(|(tag, value)| (*tag, value))
    }
}

impl<V: Into<Bytes>> FromIterator<(u64, V)> for TaggedFields {
    fn from_iter<I: IntoIterator<Item = (u64, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (tag, value) in iter {
            fields.insert(tag, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_insert_wins() {
        let mut fields = TaggedFields::new();
        assert!(fields.insert(7, &b"first"[..]).is_none());
        assert_eq!(fields.insert(7, &b"second"[..]), Some(Bytes::from_static(b"first")));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(7).map(|b| &b[..]), Some(&b"second"[..]));
    }

    #[test]
    fn test_iterates_in_tag_order() {
        let fields: TaggedFields = vec![(9u64, vec![1u8]), (2, vec![2]), (5, vec![3])]
            .into_iter()
            .collect();
        let tags: Vec<u64> = fields.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![2, 5, 9]);
    }
}

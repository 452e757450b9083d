use bytes::{BufMut, Bytes, BytesMut};

use super::base_parser::BaseParser;
use super::traits::*;
use crate::adapters::protocol::constants::{NULL_MARKER, PRESENT_MARKER};
use crate::adapters::protocol::dto::Cursor;
use crate::domain::error::ProtocolError;

// 요청의 cursor와 응답의 next_cursor가 같은 구조체를 공유함

impl Deserialize for Cursor {
    fn deserialize(src: &mut Bytes, _version: i16) -> Result<Self, ProtocolError> {
        let parser = BaseParser;
        Ok(Self {
            topic_name: parser.parse_compact_string(src)?,
            partition_index: parser.parse_i32(src)?,
            tagged_fields: parser.parse_tagged_fields(src)?,
        })
    }
}

impl Serialize for Cursor {
    fn serialize(&self, dst: &mut BytesMut, _version: i16) -> Result<(), ProtocolError> {
        dst.put_compact_string(&self.topic_name);
        dst.put_i32(self.partition_index);
        dst.put_tagged_fields(&self.tagged_fields);
        Ok(())
    }
}

/// nullable struct 마커를 읽음. 1일 때만 구조체가 뒤따르고 그 외 값은 모두 null
pub fn parse_nullable_cursor(src: &mut Bytes, version: i16) -> Result<Option<Cursor>, ProtocolError> {
    if BaseParser.parse_i8(src)? != PRESENT_MARKER {
        return Ok(None);
    }
    Cursor::deserialize(src, version).map(Some)
}

pub fn put_nullable_cursor(
    dst: &mut BytesMut,
    cursor: Option<&Cursor>,
    version: i16,
) -> Result<(), ProtocolError> {
    match cursor {
        Some(cursor) => {
            dst.put_i8(PRESENT_MARKER);
            cursor.serialize(dst, version)
        }
        None => {
            dst.put_i8(NULL_MARKER);
            Ok(())
        }
    }
}

use bytes::{Buf, Bytes};

use super::traits::*;
use super::varint::{decode_uvarint, decode_varint};
use crate::adapters::protocol::dto::TaggedFields;
use crate::domain::error::ProtocolError;

/// 기본 파서 구현을 제공하는 구조체
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseParser;

impl ByteParser for BaseParser {}

impl PrimitiveParser for BaseParser {
    fn parse_i8(&self, buf: &mut Bytes) -> Result<i8, ProtocolError> {
        self.ensure_remaining(buf, 1)?;
        Ok(buf.get_i8())
    }

    fn parse_i16(&self, buf: &mut Bytes) -> Result<i16, ProtocolError> {
        self.ensure_remaining(buf, 2)?;
        Ok(buf.get_i16())
    }

    fn parse_i32(&self, buf: &mut Bytes) -> Result<i32, ProtocolError> {
        self.ensure_remaining(buf, 4)?;
        Ok(buf.get_i32())
    }

    fn parse_i64(&self, buf: &mut Bytes) -> Result<i64, ProtocolError> {
        self.ensure_remaining(buf, 8)?;
        Ok(buf.get_i64())
    }

    fn parse_u8(&self, buf: &mut Bytes) -> Result<u8, ProtocolError> {
        self.ensure_remaining(buf, 1)?;
        Ok(buf.get_u8())
    }

    fn parse_u16(&self, buf: &mut Bytes) -> Result<u16, ProtocolError> {
        self.ensure_remaining(buf, 2)?;
        Ok(buf.get_u16())
    }

    fn parse_u32(&self, buf: &mut Bytes) -> Result<u32, ProtocolError> {
        self.ensure_remaining(buf, 4)?;
        Ok(buf.get_u32())
    }

    fn parse_u64(&self, buf: &mut Bytes) -> Result<u64, ProtocolError> {
        self.ensure_remaining(buf, 8)?;
        Ok(buf.get_u64())
    }

    fn parse_bool(&self, buf: &mut Bytes) -> Result<bool, ProtocolError> {
        Ok(self.parse_u8(buf)? != 0)
    }

    fn parse_uuid(&self, buf: &mut Bytes) -> Result<[u8; 16], ProtocolError> {
        self.ensure_remaining(buf, 16)?;
        let mut uuid = [0u8; 16];
        buf.copy_to_slice(&mut uuid);
        Ok(uuid)
    }
}

impl VarIntParser for BaseParser {
    fn parse_uvarint(&self, buf: &mut Bytes) -> Result<u64, ProtocolError> {
        decode_uvarint(buf)
    }

    fn parse_varint(&self, buf: &mut Bytes) -> Result<i64, ProtocolError> {
        decode_varint(buf)
    }
}

impl CompactStringParser for BaseParser {
    fn parse_compact_string(&self, buf: &mut Bytes) -> Result<String, ProtocolError> {
        let bytes = self.parse_compact_bytes(buf)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::InvalidString("compact string"))
    }

    fn parse_compact_bytes(&self, buf: &mut Bytes) -> Result<Bytes, ProtocolError> {
        match self.parse_uvarint(buf)? {
            // null sentinel. 뒤에 아무것도 없음
            0 => Ok(Bytes::new()),
            len => self.take_bytes(buf, len - 1),
        }
    }
}

impl NullableStringParser for BaseParser {
    fn parse_nullable_string(&self, buf: &mut Bytes) -> Result<Option<String>, ProtocolError> {
        let len = self.parse_i16(buf)?;
        if len == -1 {
            return Ok(None);
        }
        let len = u64::try_from(len).map_err(|_| ProtocolError::InvalidLength(i64::from(len)))?;
        let bytes = self.take_bytes(buf, len)?;
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|_| ProtocolError::InvalidString("nullable string"))
    }
}

impl CompactArrayParser for BaseParser {
    fn parse_compact_array<T, F>(&self, buf: &mut Bytes, parser: F) -> Result<Vec<T>, ProtocolError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ProtocolError>,
    {
        let len = self.parse_uvarint(buf)?;
        // 0은 null 배열
        let items_len = len.saturating_sub(1);
        parse_items(buf, items_len, parser)
    }

    fn parse_array<T, F>(&self, buf: &mut Bytes, parser: F) -> Result<Vec<T>, ProtocolError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ProtocolError>,
    {
        let len = self.parse_i32(buf)?;
        if len == -1 {
            return Ok(Vec::new());
        }
        let items_len = u64::try_from(len).map_err(|_| ProtocolError::InvalidLength(i64::from(len)))?;
        parse_items(buf, items_len, parser)
    }
}

impl TaggedFieldsParser for BaseParser {
    fn parse_tagged_fields(&self, buf: &mut Bytes) -> Result<TaggedFields, ProtocolError> {
        let count = self.parse_uvarint(buf)?;
        let mut fields = TaggedFields::new();
        for _ in 0..count {
            let tag = self.parse_uvarint(buf)?;
            let len = self.parse_uvarint(buf)?;
            let value = self.take_bytes(buf, len)?;
            fields.insert(tag, value);
        }
        Ok(fields)
    }
}

fn parse_items<T, F>(buf: &mut Bytes, items_len: u64, mut parser: F) -> Result<Vec<T>, ProtocolError>
where
    F: FnMut(&mut Bytes) -> Result<T, ProtocolError>,
{
    // 원소는 최소 1바이트이므로 남은 입력 길이로 할당 크기를 제한함
    let capacity = usize::try_from(items_len).unwrap_or(usize::MAX).min(buf.remaining());
    let mut items = Vec::with_capacity(capacity);
    for _ in 0..items_len {
        items.push(parser(buf)?);
    }
    Ok(items)
}

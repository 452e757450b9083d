use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::varint::PutVarint;
use crate::adapters::protocol::dto::TaggedFields;
use crate::domain::error::ProtocolError;

/// 바이트 스트림으로부터 데이터를 파싱하는 trait
pub trait ByteParser {
    /// 남은 바이트가 충분한지 확인
    fn ensure_remaining(&self, buf: &Bytes, required: usize) -> Result<(), ProtocolError> {
        if buf.remaining() < required {
            return Err(ProtocolError::TruncatedInput {
                needed: required,
                remaining: buf.remaining(),
            });
        }
        Ok(())
    }

    /// 길이만큼 잘라서 반환 (복사 없음)
    fn take_bytes(&self, buf: &mut Bytes, len: u64) -> Result<Bytes, ProtocolError> {
        let len = usize::try_from(len).map_err(|_| ProtocolError::TruncatedInput {
            needed: usize::MAX,
            remaining: buf.remaining(),
        })?;
        self.ensure_remaining(buf, len)?;
        Ok(buf.split_to(len))
    }
}

/// 특정 타입으로 역직렬화하는 trait. `version`은 바디 레이아웃 버전임
pub trait Deserialize: Sized {
    fn deserialize(src: &mut Bytes, version: i16) -> Result<Self, ProtocolError>;
}

/// 특정 타입을 바이트로 직렬화하는 trait
pub trait Serialize {
    fn serialize(&self, dst: &mut BytesMut, version: i16) -> Result<(), ProtocolError>;
}

/// 기본 타입들의 파싱을 위한 trait
pub trait PrimitiveParser: ByteParser {
    fn parse_i8(&self, buf: &mut Bytes) -> Result<i8, ProtocolError>;
    fn parse_i16(&self, buf: &mut Bytes) -> Result<i16, ProtocolError>;
    fn parse_i32(&self, buf: &mut Bytes) -> Result<i32, ProtocolError>;
    fn parse_i64(&self, buf: &mut Bytes) -> Result<i64, ProtocolError>;
    fn parse_u8(&self, buf: &mut Bytes) -> Result<u8, ProtocolError>;
    fn parse_u16(&self, buf: &mut Bytes) -> Result<u16, ProtocolError>;
    fn parse_u32(&self, buf: &mut Bytes) -> Result<u32, ProtocolError>;
    fn parse_u64(&self, buf: &mut Bytes) -> Result<u64, ProtocolError>;
    fn parse_bool(&self, buf: &mut Bytes) -> Result<bool, ProtocolError>;
    fn parse_uuid(&self, buf: &mut Bytes) -> Result<[u8; 16], ProtocolError>;
}

/// 가변 정수 타입 파싱을 위한 trait
pub trait VarIntParser: ByteParser {
    fn parse_uvarint(&self, buf: &mut Bytes) -> Result<u64, ProtocolError>;
    fn parse_varint(&self, buf: &mut Bytes) -> Result<i64, ProtocolError>;
}

/// 컴팩트 문자열 타입 파싱을 위한 trait
pub trait CompactStringParser: ByteParser {
    fn parse_compact_string(&self, buf: &mut Bytes) -> Result<String, ProtocolError>;
    fn parse_compact_bytes(&self, buf: &mut Bytes) -> Result<Bytes, ProtocolError>;
}

/// int16 길이 접두사 문자열 (-1 = null)
pub trait NullableStringParser: ByteParser {
    fn parse_nullable_string(&self, buf: &mut Bytes) -> Result<Option<String>, ProtocolError>;
}

/// 컴팩트 배열 타입 파싱을 위한 trait
pub trait CompactArrayParser: ByteParser {
    fn parse_compact_array<T, F>(&self, buf: &mut Bytes, parser: F) -> Result<Vec<T>, ProtocolError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ProtocolError>;

    /// int32 개수 접두사 배열 (non-flexible 버전)
    fn parse_array<T, F>(&self, buf: &mut Bytes, parser: F) -> Result<Vec<T>, ProtocolError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ProtocolError>;
}

/// tagged fields 블록 파싱을 위한 trait
pub trait TaggedFieldsParser: ByteParser {
    fn parse_tagged_fields(&self, buf: &mut Bytes) -> Result<TaggedFields, ProtocolError>;
}

/// 와이어 포맷으로 쓰기 위한 trait. BufMut 전체에 구현됨
pub trait WireWriter: BufMut + PutVarint {
    /// uvarint(len + 1) 다음 바이트
    fn put_compact_string(&mut self, value: &str) {
        self.put_compact_bytes(value.as_bytes());
    }

    fn put_compact_bytes(&mut self, value: &[u8]) {
        self.put_uvarint(value.len() as u64 + 1);
        self.put_slice(value);
    }

    /// int16 길이 다음 바이트, None이면 -1
    fn put_nullable_string(&mut self, value: Option<&str>) -> Result<(), ProtocolError> {
        match value {
            None => self.put_i16(-1),
            Some(value) => {
                let len = i16::try_from(value.len()).map_err(|_| ProtocolError::FieldTooLarge {
                    field: "nullable string",
                    len: value.len(),
                })?;
                self.put_i16(len);
                self.put_slice(value.as_bytes());
            }
        }
        Ok(())
    }

    /// 컴팩트 배열 길이는 실제 개수 + 1
    fn put_compact_array_len(&mut self, len: usize) {
        self.put_uvarint(len as u64 + 1);
    }

    fn put_array_len(&mut self, len: usize) -> Result<(), ProtocolError> {
        let len = i32::try_from(len).map_err(|_| ProtocolError::FieldTooLarge {
            field: "array",
            len,
        })?;
        self.put_i32(len);
        Ok(())
    }

    fn put_compact_i32_array(&mut self, values: &[i32]) {
        self.put_compact_array_len(values.len());
        for value in values {
            self.put_i32(*value);
        }
    }

    fn put_tagged_fields(&mut self, fields: &TaggedFields) {
        self.put_uvarint(fields.len() as u64);
        for (tag, value) in fields.iter() {
            self.put_uvarint(tag);
            self.put_uvarint(value.len() as u64);
            self.put_slice(value);
        }
    }
}

impl<B: BufMut> WireWriter for B {}

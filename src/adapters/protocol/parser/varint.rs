use bytes::{Buf, BufMut};

use crate::domain::error::ProtocolError;

/// u64는 7비트 그룹 10개를 넘지 않음
pub const MAX_VARINT_LEN: usize = 10;

pub trait PutVarint {
    /// LEB128: 하위 7비트부터. 마지막 바이트를 제외하고 최상위 비트를 켬
    fn put_uvarint(&mut self, num: u64);

    /// 부호 있는 zig-zag varint
    fn put_varint(&mut self, num: i64);
}

impl<B: BufMut> PutVarint for B {
    fn put_uvarint(&mut self, mut num: u64) {
        while num >= 0x80 {
            self.put_u8(((num & 0x7F) as u8) | 0x80);
            num >>= 7;
        }
        self.put_u8(num as u8);
    }

    fn put_varint(&mut self, num: i64) {
        self.put_uvarint(zigzag_encode(num));
    }
}

pub fn zigzag_encode(num: i64) -> u64 {
    ((num << 1) ^ (num >> 63)) as u64
}

pub fn zigzag_decode(num: u64) -> i64 {
    ((num >> 1) as i64) ^ -((num & 1) as i64)
}

pub fn decode_uvarint<B: Buf>(buf: &mut B) -> Result<u64, ProtocolError> {
    let mut result: u64 = 0;

    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(ProtocolError::MalformedVarint);
        }
        let byte = buf.get_u8();

        // 10번째 그룹에는 u64의 최상위 비트 하나만 들어갈 수 있음
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(ProtocolError::MalformedVarint);
        }

        result |= u64::from(byte & 0x7F) << (7 * i);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }

    Err(ProtocolError::MalformedVarint)
}

pub fn decode_varint<B: Buf>(buf: &mut B) -> Result<i64, ProtocolError> {
    decode_uvarint(buf).map(zigzag_decode)
}

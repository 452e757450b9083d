use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::error::{ApplicationError, Result};
use crate::domain::error::ProtocolError;

/// 프레임 길이 필드 크기 (자기 자신은 길이에 포함되지 않음)
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// 프레임 바디를 읽을 때 한 번에 늘리는 버퍼 크기
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// 길이 자리를 비워두고 시작 위치를 반환
pub fn begin_frame(dst: &mut BytesMut) -> usize {
    let start = dst.len();
    dst.put_i32(0);
    start
}

/// 시작 위치 이후에 쓴 바이트 수로 길이 필드를 채움
pub fn finish_frame(dst: &mut BytesMut, start: usize) -> std::result::Result<(), ProtocolError> {
    let body_len = dst.len() - start - LENGTH_PREFIX_SIZE;
    let size = i32::try_from(body_len).map_err(|_| ProtocolError::FieldTooLarge {
        field: "message size",
        len: body_len,
    })?;
    dst[start..start + LENGTH_PREFIX_SIZE].copy_from_slice(&size.to_be_bytes());
    Ok(())
}

/// 길이 필드를 포함한 프레임 하나를 정확히 읽음
///
/// 프레임 사이에서 상대가 스트림을 닫으면 `None`을 반환함. 프레임 중간에 끝나면
/// `UnexpectedEof` I/O 에러
pub async fn read_frame<R>(reader: &mut R, max_frame_size: usize) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    let mut filled = 0;
    while filled < LENGTH_PREFIX_SIZE {
        let n = reader.read(&mut prefix[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ApplicationError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        filled += n;
    }

    let size = i32::from_be_bytes(prefix);
    let size = usize::try_from(size)
        .map_err(|_| ProtocolError::InvalidLength(i64::from(size)))?;
    if size > max_frame_size {
        return Err(ApplicationError::FrameTooLarge {
            size,
            max: max_frame_size,
        });
    }

    // 선언된 길이를 믿고 미리 할당하지 않음. 실제로 도착한 만큼만 버퍼를 키움
    let total = LENGTH_PREFIX_SIZE + size;
    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + size.min(READ_CHUNK_SIZE));
    frame.put_slice(&prefix);
    let mut body = (&mut *reader).take(size as u64);
    while frame.len() < total {
        frame.reserve((total - frame.len()).min(READ_CHUNK_SIZE));
        if body.read_buf(&mut frame).await? == 0 {
            return Err(ApplicationError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
    }
    Ok(Some(frame.freeze()))
}

pub async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_frame_patches_length() {
        let mut buf = BytesMut::new();
        let start = begin_frame(&mut buf);
        buf.put_slice(b"hello");
        finish_frame(&mut buf, start).unwrap();
        assert_eq!(&buf[..4], &5i32.to_be_bytes());
        assert_eq!(&buf[4..], b"hello");
    }

    #[test]
    fn test_finish_frame_after_existing_data() {
        let mut buf = BytesMut::from(&b"xy"[..]);
        let start = begin_frame(&mut buf);
        buf.put_u8(1);
        finish_frame(&mut buf, start).unwrap();
        assert_eq!(&buf[..], &[b'x', b'y', 0, 0, 0, 1, 1]);
    }

    #[tokio::test]
    async fn test_read_frame_across_partial_writes() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let writer = tokio::spawn(async move {
            for chunk in [&[0u8, 0][..], &[0, 3, b'a'][..], &[b'b', b'c'][..]] {
                client.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        let frame = read_frame(&mut server, 1024).await.unwrap().unwrap();
        assert_eq!(&frame[..], &[0, 0, 0, 3, b'a', b'b', b'c']);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_frame_keeps_frames_apart() {
        let mut data: &[u8] = &[0, 0, 0, 1, 0xAA, 0, 0, 0, 2, 0xBB, 0xCC];
        let first = read_frame(&mut data, 1024).await.unwrap().unwrap();
        let second = read_frame(&mut data, 1024).await.unwrap().unwrap();
        assert_eq!(&first[..], &[0, 0, 0, 1, 0xAA]);
        assert_eq!(&second[..], &[0, 0, 0, 2, 0xBB, 0xCC]);
        assert!(read_frame(&mut data, 1024).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_frame_eof_inside_frame() {
        let mut data: &[u8] = &[0, 0, 0, 5, 1, 2];
        let err = read_frame(&mut data, 1024).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));

        let mut short_prefix: &[u8] = &[0, 0];
        assert!(matches!(
            read_frame(&mut short_prefix, 1024).await,
            Err(ApplicationError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_read_frame_large_declared_size_with_short_body() {
        // 64 MiB를 선언했지만 3바이트만 오고 스트림이 끝남
        let mut data: &[u8] = &[0x04, 0, 0, 0, 1, 2, 3];
        let err = read_frame(&mut data, 100 * 1024 * 1024).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn test_read_frame_body_larger_than_read_chunk() {
        let size = READ_CHUNK_SIZE * 2 + 5;
        let mut data = (size as i32).to_be_bytes().to_vec();
        data.extend((0..size).map(|i| i as u8));
        data.extend_from_slice(&[0, 0, 0, 1, 0xEE]);

        let mut reader: &[u8] = &data;
        let frame = read_frame(&mut reader, 1024 * 1024).await.unwrap().unwrap();
        assert_eq!(frame.len(), LENGTH_PREFIX_SIZE + size);
        assert_eq!(&frame[..], &data[..LENGTH_PREFIX_SIZE + size]);

        let next = read_frame(&mut reader, 1024 * 1024).await.unwrap().unwrap();
        assert_eq!(&next[..], &[0, 0, 0, 1, 0xEE]);
    }

    #[tokio::test]
    async fn test_read_frame_rejects_bad_lengths() {
        let mut negative: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFE];
        assert!(matches!(
            read_frame(&mut negative, 1024).await,
            Err(ApplicationError::Protocol(ProtocolError::InvalidLength(-2)))
        ));

        let mut huge: &[u8] = &[0, 0, 0x10, 0];
        assert!(matches!(
            read_frame(&mut huge, 1024).await,
            Err(ApplicationError::FrameTooLarge { size: 4096, max: 1024 })
        ));
    }

    #[tokio::test]
    async fn test_write_frame() {
        let mut out: Vec<u8> = Vec::new();
        write_frame(&mut out, &[0, 0, 0, 1, 7]).await.unwrap();
        assert_eq!(out, vec![0, 0, 0, 1, 7]);
    }
}

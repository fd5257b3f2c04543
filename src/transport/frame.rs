//! Length-prefixed text frames: a 4-byte big-endian length, then UTF-8.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub async fn write_frame<W>(writer: &mut W, text: &str, max_frame_size: u32) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let data = text.as_bytes();
    if data.is_empty() {
        return Err(anyhow::anyhow!("Invalid frame length: 0"));
    }
    if data.len() as u64 > max_frame_size as u64 {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max: {})",
            data.len(),
            max_frame_size
        ));
    }
    let len = (data.len() as u32).to_be_bytes();
    writer.write_all(&len).await.map_err(write_error)?;
    writer.write_all(data).await.map_err(write_error)?;
    writer.flush().await.map_err(write_error)?;
    Ok(())
}

pub async fn read_frame<R>(reader: &mut R, max_frame_size: u32) -> anyhow::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(read_error)?;
    let len = u32::from_be_bytes(len_buf);

    // Checked before allocating the body.
    if len > max_frame_size {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max: {})",
            len,
            max_frame_size
        ));
    }
    if len == 0 {
        return Err(anyhow::anyhow!("Invalid frame length: 0"));
    }

    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await.map_err(read_error)?;
    String::from_utf8(buf).map_err(|e| anyhow::anyhow!("Frame is not UTF-8: {}", e))
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    use std::io::ErrorKind;
    if matches!(e.kind(), ErrorKind::BrokenPipe | ErrorKind::ConnectionReset) {
        anyhow::anyhow!("Connection closed by peer")
    } else {
        anyhow::anyhow!("Write error: {}", e)
    }
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        anyhow::anyhow!("Connection closed by peer")
    } else if e.kind() == std::io::ErrorKind::ConnectionReset {
        anyhow::anyhow!("Connection reset by peer")
    } else {
        anyhow::anyhow!("Read error: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_round_trips_through_a_pipe() {
        let (mut a, mut b) = tokio::io::duplex(64);
        write_frame(&mut a, "{\"status\":\"JOIN\"}", 1024).await.unwrap();
        assert_eq!(read_frame(&mut b, 1024).await.unwrap(), "{\"status\":\"JOIN\"}");
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected_before_reading_body() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&100u32.to_be_bytes()).await.unwrap();
        assert!(read_frame(&mut b, 10).await.is_err());
    }
}

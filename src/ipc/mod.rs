//! IPC with the local playback engine process
//!
//! Length-prefixed JSON over a Unix domain socket: a u32 little-endian byte
//! count followed by the serialized message.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

mod messages;
pub use messages::{EngineEvent, EngineRequest};

use crate::constants::engine::{MAX_MESSAGE_SIZE, SOCKET_RELATIVE_PATH};

/// Get default engine socket path (XDG_RUNTIME_DIR with fallback to cache)
pub fn default_socket_path() -> Result<PathBuf> {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(runtime_dir).join(SOCKET_RELATIVE_PATH));
    }

    let cache = dirs::cache_dir()
        .context("Failed to determine cache directory (no XDG_RUNTIME_DIR or HOME)")?;
    Ok(cache.join(SOCKET_RELATIVE_PATH))
}

/// Write length-prefixed message to stream
pub async fn write_message<W, T>(stream: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let json = serde_json::to_vec(msg).context("Failed to serialize message to JSON")?;
    if json.len() > MAX_MESSAGE_SIZE {
        return Err(anyhow!("Message too large: {} bytes (max: {})", json.len(), MAX_MESSAGE_SIZE));
    }

    let len = json.len() as u32;
    stream
        .write_all(&len.to_le_bytes())
        .await
        .context("Failed to write message length")?;
    stream
        .write_all(&json)
        .await
        .context("Failed to write message payload")?;
    stream.flush().await.context("Failed to flush stream")?;

    Ok(())
}

/// Read length-prefixed message from stream
pub async fn read_message<R, T>(stream: &mut R) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: for<'de> Deserialize<'de>,
{
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .await
        .context("Failed to read message length")?;
    let len = u32::from_le_bytes(len_buf) as usize;

    // Reject before allocating
    if len > MAX_MESSAGE_SIZE {
        return Err(anyhow!("Message too large: {} bytes (max: {})", len, MAX_MESSAGE_SIZE));
    }

    let mut json_buf = vec![0u8; len];
    stream
        .read_exact(&mut json_buf)
        .await
        .context("Failed to read message payload")?;

    serde_json::from_slice(&json_buf).context("Failed to deserialize message from JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PlayerState, SessionConfig};

    #[tokio::test]
    async fn test_request_and_event_over_duplex() {
        let (mut receiver_side, mut engine_side) = tokio::io::duplex(4096);

        let config = SessionConfig::cast_receiver("cast-abc".into(), "http://h:8095".into());
        write_message(&mut receiver_side, &EngineRequest::Connect(config.clone()))
            .await
            .unwrap();
        let request: EngineRequest = read_message(&mut engine_side).await.unwrap();
        let EngineRequest::Connect(received) = request;
        assert_eq!(received, config);

        let state = PlayerState {
            is_playing: true,
            volume: 42,
            muted: false,
        };
        write_message(&mut engine_side, &EngineEvent::StateChanged(state))
            .await
            .unwrap();
        let event: EngineEvent = read_message(&mut receiver_side).await.unwrap();
        assert_eq!(event, EngineEvent::StateChanged(state));
    }

    #[tokio::test]
    async fn test_oversized_length_prefix_rejected() {
        let (mut a, mut b) = tokio::io::duplex(64);
        let len = (MAX_MESSAGE_SIZE as u32) + 1;
        a.write_all(&len.to_le_bytes()).await.unwrap();

        let err = read_message::<_, EngineEvent>(&mut b).await.unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn test_closed_stream_is_an_error() {
        let (a, mut b) = tokio::io::duplex(64);
        drop(a);
        assert!(read_message::<_, EngineEvent>(&mut b).await.is_err());
    }
}

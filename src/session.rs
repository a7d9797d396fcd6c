//! Contract with the external playback engine
//!
//! The engine owns synchronization, buffering and decoding. This crate only
//! constructs a session with a [`SessionConfig`], calls `connect`, reads the
//! sync/format state and receives playback state changes on a channel.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::constants;

/// Playback sub-state pushed by the engine on every change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub is_playing: bool,
    /// 0-100
    pub volume: u8,
    pub muted: bool,
}

/// Clock sync estimate. `offset` and `error` are only meaningful when `synced`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub synced: bool,
    /// Estimated clock skew to the server in milliseconds
    #[serde(default)]
    pub offset: f64,
    /// Uncertainty bound on `offset` in milliseconds
    #[serde(default)]
    pub error: f64,
}

impl SyncInfo {
    pub fn synced(offset: f64, error: f64) -> Self {
        Self {
            synced: true,
            offset,
            error,
        }
    }
}

/// Audio format descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub codec: String,
    /// Hz
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u8,
    /// Bits per sample; the engine may omit it for its current format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<u8>,
}

fn default_channels() -> u8 {
    constants::session::CHANNELS
}

impl AudioFormat {
    pub fn pcm(sample_rate: u32) -> Self {
        Self {
            codec: constants::session::PCM_CODEC.to_string(),
            sample_rate,
            channels: constants::session::CHANNELS,
            bit_depth: Some(constants::session::BIT_DEPTH),
        }
    }

    pub fn bit_depth_or_default(&self) -> u8 {
        self.bit_depth.unwrap_or(constants::DEFAULT_BIT_DEPTH)
    }
}

/// How the engine routes decoded audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Straight to the audio device, no intermediate element
    Direct,
    /// Through a media element owned by the host
    MediaElement,
}

/// Everything the engine needs to construct a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub player_id: String,
    pub base_url: String,
    pub audio_output_mode: OutputMode,
    pub client_name: String,
    /// Bytes
    pub buffer_capacity: usize,
    /// Acceptable formats, most preferred first
    pub supported_formats: Vec<AudioFormat>,
}

impl SessionConfig {
    /// Fixed capability profile for constrained cast hardware: direct output,
    /// a 1.5 MiB buffer, and stereo 16-bit PCM only at 48 kHz then 44.1 kHz.
    pub fn cast_receiver(player_id: String, base_url: String) -> Self {
        Self {
            player_id,
            base_url,
            audio_output_mode: OutputMode::Direct,
            client_name: constants::session::CLIENT_NAME.to_string(),
            buffer_capacity: constants::session::BUFFER_CAPACITY,
            supported_formats: constants::session::SAMPLE_RATES
                .iter()
                .map(|&rate| AudioFormat::pcm(rate))
                .collect(),
        }
    }
}

/// Channel the engine pushes playback state changes into
pub type StateSubscriber = mpsc::UnboundedSender<PlayerState>;

/// A remote player session provided by the playback engine
pub trait PlayerSession: Send + Sync + 'static {
    /// Connect to the server. Retry policy, if any, belongs to the engine.
    fn connect(&self) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Current clock sync estimate
    fn time_sync_info(&self) -> SyncInfo;

    /// Format of the stream currently playing, if any
    fn current_format(&self) -> Option<AudioFormat>;
}

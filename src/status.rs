//! Status projection: engine snapshot -> display strings
//!
//! Pure functions only. Callers decide where the strings go.

use crate::session::{AudioFormat, PlayerState, SyncInfo};

/// Point-in-time read of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub playback: PlayerState,
    pub sync: SyncInfo,
    pub format: Option<AudioFormat>,
}

/// Rendered status and debug lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub status: String,
    pub debug: String,
}

pub fn project(snapshot: &Snapshot) -> Rendered {
    Rendered {
        status: render_status(&snapshot.playback),
        debug: render_debug(&snapshot.sync, snapshot.format.as_ref()),
    }
}

/// `Playing · 42%`, `Playing · 10% (muted)` or `Stopped`
pub fn render_status(playback: &PlayerState) -> String {
    if !playback.is_playing {
        return "Stopped".to_string();
    }

    let muted = if playback.muted { " (muted)" } else { "" };
    format!("Playing · {}%{}", playback.volume, muted)
}

/// `sync: 5ms ±2ms · pcm 48kHz/16bit`
pub fn render_debug(sync: &SyncInfo, format: Option<&AudioFormat>) -> String {
    let mut text = if sync.synced {
        format!("sync: {}ms ±{}ms", sync.offset, sync.error)
    } else {
        "sync: waiting...".to_string()
    };

    if let Some(format) = format {
        // f64 Display drops a zero fraction: 48000 -> "48", 44100 -> "44.1"
        let khz = f64::from(format.sample_rate) / 1000.0;
        text.push_str(&format!(
            " · {} {}kHz/{}bit",
            format.codec,
            khz,
            format.bit_depth_or_default()
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(volume: u8, muted: bool) -> PlayerState {
        PlayerState {
            is_playing: true,
            volume,
            muted,
        }
    }

    #[test]
    fn test_status_playing() {
        assert_eq!(render_status(&playing(42, false)), "Playing · 42%");
    }

    #[test]
    fn test_status_playing_muted() {
        assert_eq!(render_status(&playing(10, true)), "Playing · 10% (muted)");
    }

    #[test]
    fn test_status_stopped_ignores_other_fields() {
        let state = PlayerState {
            is_playing: false,
            volume: 80,
            muted: true,
        };
        assert_eq!(render_status(&state), "Stopped");
    }

    #[test]
    fn test_debug_waiting_without_format() {
        assert_eq!(render_debug(&SyncInfo::default(), None), "sync: waiting...");
    }

    #[test]
    fn test_debug_synced_with_format() {
        let format = AudioFormat::pcm(48_000);
        assert_eq!(
            render_debug(&SyncInfo::synced(5.0, 2.0), Some(&format)),
            "sync: 5ms ±2ms · pcm 48kHz/16bit"
        );
    }

    #[test]
    fn test_debug_fractional_rate_and_default_bit_depth() {
        let format = AudioFormat {
            codec: "flac".to_string(),
            sample_rate: 44_100,
            channels: 2,
            bit_depth: None,
        };
        assert_eq!(
            render_debug(&SyncInfo::default(), Some(&format)),
            "sync: waiting... · flac 44.1kHz/16bit"
        );
    }

    #[test]
    fn test_debug_negative_fractional_offset() {
        assert_eq!(
            render_debug(&SyncInfo::synced(-3.5, 0.25), None),
            "sync: -3.5ms ±0.25ms"
        );
    }

    #[test]
    fn test_project_is_deterministic() {
        let snapshot = Snapshot {
            playback: playing(42, false),
            sync: SyncInfo::synced(5.0, 2.0),
            format: Some(AudioFormat::pcm(44_100)),
        };
        let first = project(&snapshot);
        assert_eq!(first, project(&snapshot));
        assert_eq!(first.status, "Playing · 42%");
        assert_eq!(first.debug, "sync: 5ms ±2ms · pcm 44.1kHz/16bit");
    }

    #[test]
    fn test_project_default_snapshot() {
        let rendered = project(&Snapshot::default());
        assert_eq!(rendered.status, "Stopped");
        assert_eq!(rendered.debug, "sync: waiting...");
    }
}

//! Application-wide constants
//!
//! Storage keys, launch parameter names and the fixed session profile live
//! here so there is a single source of truth for them.

use std::time::Duration;

/// Launch (query string) parameter names
pub mod launch {
    /// One-shot base URL override
    pub const SERVER: &str = "server";

    /// One-shot player identity override
    pub const PLAYER_ID: &str = "player_id";
}

/// Persistent key/value store keys and location
pub mod storage {
    /// Key holding the last resolved server base URL
    pub const SERVER_URL_KEY: &str = "resonate_server_url";

    /// Key holding the persisted player identity
    pub const PLAYER_ID_KEY: &str = "resonate_player_id";

    /// Directory under the platform config dir
    pub const APP_DIR: &str = "resonate-cast-receiver";

    /// Store file name
    pub const FILENAME: &str = "storage.json";
}

/// Generated player identity shape
pub mod identity {
    /// Namespace prefix for generated identifiers
    pub const PREFIX: &str = "cast-";

    /// Number of random characters after the prefix
    pub const SUFFIX_LEN: usize = 8;

    /// Suffix alphabet (base36, lowercase)
    pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
}

/// Fixed capability profile sent to the playback engine
pub mod session {
    /// Client name shown by the server for this receiver
    pub const CLIENT_NAME: &str = "Music Assistant Cast Receiver";

    /// Buffer ceiling in bytes (1.5 MiB, sized for Chromecast-class memory)
    pub const BUFFER_CAPACITY: usize = 1024 * 1024 * 3 / 2;

    /// Only codec the receiver hardware can decode without a software decoder
    pub const PCM_CODEC: &str = "pcm";

    /// Accepted sample rates in order of preference
    pub const SAMPLE_RATES: [u32; 2] = [48_000, 44_100];

    /// Stereo output only
    pub const CHANNELS: u8 = 2;

    /// Bits per sample of every advertised format
    pub const BIT_DEPTH: u8 = 16;
}

/// Display strings written by the bootstrap controller
pub mod display {
    /// Shown while configuration is resolved and the session connects
    pub const CONNECTING: &str = "Connecting...";

    /// Shown after connect succeeds, until the first playback state arrives
    pub const CONNECTED: &str = "Connected · Waiting for stream";

    /// Terminal status after the engine rejects connect
    pub const CONNECTION_FAILED: &str = "Connection failed";

    /// Terminal status when no server URL can be resolved
    pub const NO_SERVER: &str = "No server configured. Add ?server=http://your-server:8095";
}

/// Engine bridge socket and framing
pub mod engine {
    /// Socket path relative to XDG_RUNTIME_DIR (or the cache dir)
    pub const SOCKET_RELATIVE_PATH: &str = "resonate/engine.sock";

    /// Maximum frame size (10 MiB) to prevent memory exhaustion
    pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;
}

/// Refresh period for sync/format diagnostics once connected
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(1);

/// Bit depth assumed when the engine does not report one for the current
/// stream. Every format the receiver accepts is 16-bit, so an unreported
/// depth can only be that.
pub const DEFAULT_BIT_DEPTH: u8 = session::BIT_DEPTH;

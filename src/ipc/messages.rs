//! IPC message types for receiver ↔ engine communication

use serde::{Deserialize, Serialize};

use crate::session::{AudioFormat, PlayerState, SessionConfig, SyncInfo};

/// Requests sent from the receiver to the engine
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum EngineRequest {
    /// Construct a session with this profile and connect it to the server
    Connect(SessionConfig),
}

/// Events sent from the engine to the receiver
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Session connected to the server (reply to Connect)
    Connected,

    /// Session could not connect (reply to Connect)
    ConnectFailed(String),

    /// Playback state changed
    StateChanged(PlayerState),

    /// New clock sync estimate
    TimeSync(SyncInfo),

    /// Stream format changed or stream ended
    FormatChanged(Option<AudioFormat>),
}

//! Terminal bootstrap failures

use thiserror::Error;

/// Failures that stop the receiver from reaching the connected state.
///
/// Both are terminal: nothing in this crate retries them. Recovery is a
/// relaunch with corrected parameters.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No server endpoint in the launch parameters or the local store
    #[error("no server URL configured")]
    ConfigurationMissing,

    /// The playback engine rejected or failed the connect call
    #[error("connection to {base_url} failed: {reason}")]
    ConnectionFailure { base_url: String, reason: String },
}

impl BootstrapError {
    pub fn connection(base_url: &str, err: &anyhow::Error) -> Self {
        Self::ConnectionFailure {
            base_url: base_url.to_string(),
            reason: format!("{err:#}"),
        }
    }
}

//! Player session backed by a local playback engine process
//!
//! The engine listens on a Unix socket. `connect` hands it the session
//! profile and waits for its verdict; afterwards a background task applies
//! the engine's event stream to the readable sync/format state and forwards
//! playback state changes to the subscriber.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::UnixStream;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::ipc::{read_message, write_message, EngineEvent, EngineRequest};
use crate::session::{AudioFormat, PlayerSession, SessionConfig, StateSubscriber, SyncInfo};

/// State written by the event pump and read by the receiver
struct Shared {
    subscriber: StateSubscriber,
    sync: watch::Sender<SyncInfo>,
    format: watch::Sender<Option<AudioFormat>>,
}

impl Shared {
    fn apply(&self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged(state) => {
                debug!(state = ?state, "Engine playback state changed");
                if self.subscriber.send(state).is_err() {
                    debug!("State subscriber dropped, ignoring state change");
                }
            }
            EngineEvent::TimeSync(sync) => {
                self.sync.send_replace(sync);
            }
            EngineEvent::FormatChanged(format) => {
                info!(format = ?format, "Engine stream format changed");
                self.format.send_replace(format);
            }
            EngineEvent::Connected | EngineEvent::ConnectFailed(_) => {
                warn!(event = ?event, "Unexpected connect reply from engine, ignoring");
            }
        }
    }
}

pub struct EngineSession {
    config: SessionConfig,
    socket_path: PathBuf,
    shared: Arc<Shared>,
}

impl EngineSession {
    /// Construct the session. No I/O happens until [`PlayerSession::connect`].
    pub fn new(config: SessionConfig, subscriber: StateSubscriber, socket_path: PathBuf) -> Self {
        let (sync, _) = watch::channel(SyncInfo::default());
        let (format, _) = watch::channel(None);
        Self {
            config,
            socket_path,
            shared: Arc::new(Shared {
                subscriber,
                sync,
                format,
            }),
        }
    }
}

impl PlayerSession for EngineSession {
    async fn connect(&self) -> Result<()> {
        let mut stream = UnixStream::connect(&self.socket_path).await.with_context(|| {
            format!(
                "Failed to connect to playback engine at {}",
                self.socket_path.display()
            )
        })?;
        info!(socket = %self.socket_path.display(), "Connected to playback engine");

        write_message(&mut stream, &EngineRequest::Connect(self.config.clone()))
            .await
            .context("Failed to send session config to engine")?;

        loop {
            let event: EngineEvent = read_message(&mut stream)
                .await
                .context("Engine closed the connection before replying to connect")?;
            match event {
                EngineEvent::Connected => break,
                EngineEvent::ConnectFailed(reason) => bail!("Engine failed to connect: {reason}"),
                event => self.shared.apply(event),
            }
        }

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            loop {
                match read_message::<_, EngineEvent>(&mut stream).await {
                    Ok(event) => shared.apply(event),
                    Err(e) => {
                        warn!(error = ?e, "Engine connection closed");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    fn time_sync_info(&self) -> SyncInfo {
        *self.shared.sync.borrow()
    }

    fn current_format(&self) -> Option<AudioFormat> {
        self.shared.format.borrow().clone()
    }
}

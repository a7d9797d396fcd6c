//! Receiver startup sequence
//!
//! Idle -> Resolving -> Connecting -> Connected | Failed. Once connected the
//! receiver also enters a monitoring mode that refreshes the debug line every
//! second. Both failure paths are terminal: nothing here retries.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::config::{resolve_base_url, resolve_player_id};
use crate::constants::{self, display as text};
use crate::display::Display;
use crate::error::BootstrapError;
use crate::launch::LaunchParams;
use crate::session::{PlayerSession, PlayerState, SessionConfig, StateSubscriber};
use crate::status::{project, render_debug, Snapshot};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    Connecting,
    Connected,
    Failed,
}

/// Outcome of [`Bootstrap::start`]. Keeps the session around for inspection,
/// including after a failed connect.
pub struct Receiver<S> {
    phase: Phase,
    monitoring: bool,
    base_url: Option<String>,
    player_id: Option<String>,
    session: Option<Arc<S>>,
    failure: Option<BootstrapError>,
    tasks: Vec<JoinHandle<()>>,
}

impl<S> Receiver<S> {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            monitoring: false,
            base_url: None,
            player_id: None,
            session: None,
            failure: None,
            tasks: Vec::new(),
        }
    }

    fn transition(&mut self, next: Phase) {
        info!(from = ?self.phase, to = ?next, "Receiver phase changed");
        self.phase = next;
    }

    fn fail(&mut self, err: BootstrapError) {
        self.transition(Phase::Failed);
        self.failure = Some(err);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the periodic diagnostics refresh is running
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn session(&self) -> Option<&Arc<S>> {
        self.session.as_ref()
    }

    pub fn failure(&self) -> Option<&BootstrapError> {
        self.failure.as_ref()
    }

    /// Number of background tasks (notification handler, monitor) still alive
    pub fn running_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }
}

pub struct Bootstrap<'a> {
    params: &'a dyn LaunchParams,
    store: &'a mut dyn KeyValueStore,
    display: Display,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        params: &'a dyn LaunchParams,
        store: &'a mut dyn KeyValueStore,
        display: Display,
    ) -> Self {
        Self {
            params,
            store,
            display,
        }
    }

    /// Resolve configuration, build the session with `make_session` and
    /// connect it. Must run inside a tokio runtime.
    pub async fn start<S, F>(self, make_session: F) -> Receiver<S>
    where
        S: PlayerSession,
        F: FnOnce(SessionConfig, StateSubscriber) -> S,
    {
        let Bootstrap {
            params,
            store,
            display,
        } = self;
        let mut receiver = Receiver::new();

        receiver.transition(Phase::Resolving);
        display.set_status(text::CONNECTING);

        let base_url = match resolve_base_url(params, store) {
            Ok(url) => url,
            Err(err) => {
                display.set_status(text::NO_SERVER);
                receiver.fail(err);
                return receiver;
            }
        };
        let player_id = resolve_player_id(params, store);
        info!(base_url = %base_url, player_id = %player_id, "Connecting receiver");

        let (state_tx, state_rx) = mpsc::unbounded_channel();
        let config = SessionConfig::cast_receiver(player_id.clone(), base_url.clone());
        let session = Arc::new(make_session(config, state_tx));

        receiver.base_url = Some(base_url.clone());
        receiver.player_id = Some(player_id);
        receiver.session = Some(Arc::clone(&session));
        receiver
            .tasks
            .push(spawn_state_handler(Arc::clone(&session), state_rx, display.clone()));

        receiver.transition(Phase::Connecting);
        match session.connect().await {
            Ok(()) => {
                info!(base_url = %base_url, "Connected, waiting for stream");
                display.set_status(text::CONNECTED);
                receiver.transition(Phase::Connected);
                receiver.tasks.push(spawn_monitor(session, display));
                receiver.monitoring = true;
            }
            Err(e) => {
                error!(base_url = %base_url, error = ?e, "Connection failed");
                display.set_status(text::CONNECTION_FAILED);
                receiver.fail(BootstrapError::connection(&base_url, &e));
            }
        }

        receiver
    }
}

/// Render both lines on every playback state change
fn spawn_state_handler<S: PlayerSession>(
    session: Arc<S>,
    mut state_rx: mpsc::UnboundedReceiver<PlayerState>,
    display: Display,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(playback) = state_rx.recv().await {
            let snapshot = Snapshot {
                playback,
                sync: session.time_sync_info(),
                format: session.current_format(),
            };
            let rendered = project(&snapshot);
            display.set_status(&rendered.status);
            display.set_debug(&rendered.debug);
        }
        debug!("State subscriber closed");
    })
}

/// Refresh the debug line every second, independent of state changes
fn spawn_monitor<S: PlayerSession>(session: Arc<S>, display: Display) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = constants::MONITOR_INTERVAL;
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let format = session.current_format();
            display.set_debug(&render_debug(&session.time_sync_info(), format.as_ref()));
        }
    })
}

//! Display surface: optional status and debug sinks
//!
//! Either sink may be missing; writes to a missing sink are dropped.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct Display {
    status: Option<Sink>,
    debug: Option<Sink>,
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.status = Some(Arc::new(sink));
        self
    }

    pub fn with_debug(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.debug = Some(Arc::new(sink));
        self
    }

    pub fn set_status(&self, text: &str) {
        debug!(text = %text, "status");
        if let Some(sink) = &self.status {
            sink(text);
        }
    }

    pub fn set_debug(&self, text: &str) {
        if let Some(sink) = &self.debug {
            sink(text);
        }
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("status", &self.status.is_some())
            .field("debug", &self.debug.is_some())
            .finish()
    }
}

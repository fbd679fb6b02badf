//! Application state for the HTTP server.

use std::sync::Arc;
use tokio::sync::watch;

use crate::db::repository::MessageRepository;
use crate::db::SubmissionPolicy;
use crate::models::{AnniversaryClock, SystemTimeSource, TimeSource};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for message storage
    pub repository: Arc<dyn MessageRepository>,
    /// Anniversary being counted down to
    pub clock: AnniversaryClock,
    /// Display name for the anniversary
    pub label: Arc<str>,
    /// Source of "now" for countdown endpoints
    pub time_source: Arc<dyn TimeSource>,
    /// Enables bulk clear and relaxes the one-message-per-year rule
    pub dev_mode: bool,
    /// Flipped to `true` when the server is shutting down; ends open streams
    pub shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create a production state reading the system clock.
    pub fn new(repository: Arc<dyn MessageRepository>, clock: AnniversaryClock) -> Self {
        Self {
            repository,
            clock,
            label: Arc::from("Ducky"),
            time_source: Arc::new(SystemTimeSource),
            dev_mode: false,
            shutdown: Arc::new(watch::channel(false).0),
        }
    }

    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Ask open countdown streams to finish.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn submission_policy(&self) -> SubmissionPolicy {
        SubmissionPolicy::for_dev_mode(self.dev_mode)
    }
}

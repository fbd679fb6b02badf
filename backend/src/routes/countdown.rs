use serde::{Deserialize, Serialize};

use crate::models::{
    AnniversaryClock, CountdownPhase, CountdownSnapshot, EpochMillis, RemainingDuration,
};
use crate::services::PhaseTransition;

/// Countdown state with the anniversary it counts towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownView {
    pub label: String,
    /// Recurring date as `MM-DD`.
    pub anniversary: String,
    /// Civil offset as `+HH:MM`.
    pub utc_offset: String,
    pub now_epoch_millis: EpochMillis,
    pub target_epoch_millis: EpochMillis,
    /// Local start of the target occurrence (RFC 3339), when representable.
    pub target_local: Option<String>,
    pub civil_year: i32,
    pub remaining: RemainingDuration,
    pub phase: CountdownPhase,
}

impl CountdownView {
    pub fn new(label: &str, clock: &AnniversaryClock, snapshot: &CountdownSnapshot) -> Self {
        Self {
            label: label.to_string(),
            anniversary: clock.date().to_string(),
            utc_offset: clock.offset().to_string(),
            now_epoch_millis: snapshot.now_epoch_millis,
            target_epoch_millis: snapshot.target.epoch_millis,
            target_local: clock.local_start(&snapshot.target).map(|dt| dt.to_rfc3339()),
            civil_year: snapshot.target.civil_year,
            remaining: snapshot.remaining,
            phase: snapshot.phase,
        }
    }
}

/// Payload of the `phase` stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: CountdownPhase,
    pub to: CountdownPhase,
    pub at_epoch_millis: EpochMillis,
}

impl From<PhaseTransition> for PhaseChange {
    fn from(transition: PhaseTransition) -> Self {
        Self {
            from: transition.from,
            to: transition.to,
            at_epoch_millis: transition.at,
        }
    }
}

pub const GET_COUNTDOWN: &str = "get_countdown";
pub const STREAM_COUNTDOWN: &str = "stream_countdown";

/// SSE event names.
pub const TICK_EVENT: &str = "tick";
pub const PHASE_EVENT: &str = "phase";

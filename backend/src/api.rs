//! Public API surface for the countdown backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    CountdownPhase, CountdownSnapshot, EpochMillis, NewMessage, PastMessage, RemainingDuration,
    TargetOccurrence,
};
pub use crate::routes::countdown::CountdownView;
pub use crate::routes::countdown::PhaseChange;
pub use crate::routes::messages::ClearMessagesResponse;

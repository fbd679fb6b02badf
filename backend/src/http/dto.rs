//! Data Transfer Objects for the HTTP API.
//!
//! Countdown and message DTOs are re-exported from the routes module since
//! they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::api::{ClearMessagesResponse, CountdownView, NewMessage, PastMessage, PhaseChange};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Message store connection status
    pub store: String,
}

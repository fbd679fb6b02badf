use serde::{Deserialize, Serialize};

pub use crate::models::{NewMessage, PastMessage};

/// Reply to a bulk clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearMessagesResponse {
    pub message: String,
}

impl ClearMessagesResponse {
    pub fn for_count(cleared: usize) -> Self {
        let message = if cleared == 0 {
            "No messages found to clear.".to_string()
        } else {
            format!("Successfully cleared {} messages.", cleared)
        };
        Self { message }
    }
}

/// Returned when a bulk clear is attempted outside development.
pub const BULK_DELETE_FORBIDDEN: &str = "Operation not allowed in production for bulk delete.";

pub const LIST_MESSAGES: &str = "list_messages";
pub const POST_MESSAGE: &str = "create_message";
pub const CLEAR_MESSAGES: &str = "clear_messages";

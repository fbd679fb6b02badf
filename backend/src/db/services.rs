//! Service layer for message operations.
//!
//! These functions sit between the HTTP handlers and the repository trait.
//! They work with any [`MessageRepository`] implementation.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::repository::{ErrorContext, MessageRepository, RepositoryError, RepositoryResult};
use crate::models::{EpochMillis, NewMessage, PastMessage, MESSAGE_KEY_PREFIX};

/// Values fetched concurrently while listing.
const FETCH_CONCURRENCY: usize = 8;

/// Rules applied to new submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Reject a second message for a `yearWritten` that already has one.
    pub one_message_per_year: bool,
}

impl SubmissionPolicy {
    /// Production rules: one message per year.
    pub fn production() -> Self {
        Self {
            one_message_per_year: true,
        }
    }

    /// Development rules: anything goes.
    pub fn development() -> Self {
        Self {
            one_message_per_year: false,
        }
    }

    pub fn for_dev_mode(dev_mode: bool) -> Self {
        if dev_mode {
            Self::development()
        } else {
            Self::production()
        }
    }
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self::production()
    }
}

/// Check if the store is reachable.
pub async fn health_check(repo: &dyn MessageRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List every stored message, newest `yearWritten` first.
///
/// Values that fail to fetch, vanished between listing and fetching, or do not
/// decode as a [`PastMessage`] are skipped. Only a failed key listing fails the
/// call. Messages sharing a year keep key order.
pub async fn list_messages(repo: &dyn MessageRepository) -> RepositoryResult<Vec<PastMessage>> {
    let keys = repo.list_keys(MESSAGE_KEY_PREFIX).await?;
    debug!(count = keys.len(), "Fetching stored messages");

    let values: Vec<(String, Option<String>)> = stream::iter(keys)
        .map(|key| async move {
            match repo.get_value(&key).await {
                Ok(Some(value)) => (key, Some(value)),
                Ok(None) => {
                    warn!(key = %key, "Message disappeared before it could be read");
                    (key, None)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to fetch message, skipping");
                    (key, None)
                }
            }
        })
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut messages: Vec<PastMessage> = values
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value?;
            match PastMessage::from_json(&value) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping unreadable message");
                    None
                }
            }
        })
        .collect();

    messages.sort_by(|a, b| b.year_written.cmp(&a.year_written));
    Ok(messages)
}

/// Validate and store a new message submitted at `now`.
///
/// # Errors
/// * `ValidationError` - message or `yearWritten` missing, or message blank
/// * `ConflictError` - the policy allows one message per year and it is taken
pub async fn create_message(
    repo: &dyn MessageRepository,
    request: NewMessage,
    now: EpochMillis,
    policy: SubmissionPolicy,
) -> RepositoryResult<PastMessage> {
    let context = ErrorContext::new("create_message").with_entity("message");

    let (year_written, message) = match (request.year_written, request.message) {
        (Some(year), Some(message)) if !message.trim().is_empty() => (year, message),
        _ => {
            return Err(RepositoryError::validation_with_context(
                "Missing message or yearWritten",
                context,
            ))
        }
    };

    if policy.one_message_per_year {
        let existing = list_messages(repo).await?;
        if existing.iter().any(|m| m.year_written == year_written) {
            return Err(RepositoryError::conflict_with_context(
                format!("A message for {} has already been written.", year_written),
                context.with_details(format!("yearWritten={}", year_written)),
            ));
        }
    }

    let id = PastMessage::key_for(now);
    let record = PastMessage {
        id: id.clone(),
        year_written,
        message,
    };
    let json = record.to_json()?;
    repo.put_value(&id, &json)
        .await
        .map_err(|e| e.with_operation("create_message"))?;

    info!(key = %id, year_written, "Stored new message");
    Ok(record)
}

/// Delete every stored message.
///
/// # Returns
/// * `Ok(0)` - nothing to clear, no delete request was made
/// * `Ok(n)` - number of messages removed
pub async fn clear_messages(repo: &dyn MessageRepository) -> RepositoryResult<usize> {
    let keys = repo.list_keys(MESSAGE_KEY_PREFIX).await?;
    if keys.is_empty() {
        return Ok(0);
    }

    let deleted = repo
        .delete_keys(&keys)
        .await
        .map_err(|e| e.with_operation("clear_messages"))?;
    info!(deleted, "Cleared stored messages");
    Ok(deleted)
}

//! Repository trait definitions for the message store.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`message`]: Key-value operations backing the message feature
//!
//! Services take a `&dyn MessageRepository`, so both concrete repositories
//! and `Arc<dyn MessageRepository>` (via `as_ref()`) work:
//!
//! ```ignore
//! async fn count_messages(repo: &dyn MessageRepository) -> RepositoryResult<usize> {
//!     Ok(repo.list_keys("message:").await?.len())
//! }
//! ```

pub mod error;
pub mod message;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use message::MessageRepository;

//! Message storage module.
//!
//! This module provides abstractions for key-value store operations via the
//! Repository pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic            │
//! │  - Message validation and ids                            │
//! │  - One message per year                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────┐     ┌──────────▼──────────┐
//! │ Cloudflare KV    │     │  Local Repository   │
//! │ (REST API)       │     │  (in-memory)        │
//! └──────────────────┘     └─────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use birthday_countdown::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env()?;
//!     let messages = services::list_messages(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// ==================== Service Layer ====================

pub use services::{clear_messages, create_message, health_check, list_messages, SubmissionPolicy};

// ==================== Repository Pattern Exports ====================

pub use config::KvConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
#[cfg(feature = "kv-repo")]
pub use repositories::KvRepository;
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, MessageRepository, RepositoryError, RepositoryResult};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn MessageRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
///
/// Uses `repository.toml` when one is found in the standard locations,
/// otherwise the environment (see [`RepositoryFactory::from_env`]).
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = match RepositoryConfig::find_default() {
        Some(path) => RepositoryFactory::from_config_file(path),
        None => RepositoryFactory::from_env(),
    }
    .map_err(|e| anyhow::Error::msg(e.to_string()))
    .context("Failed to initialize message store")?;

    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn MessageRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Message store not initialized. Call init_repository() first.")
}

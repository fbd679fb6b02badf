//! Key-value store contract used to persist messages.

use async_trait::async_trait;

use super::error::RepositoryResult;

/// Repository trait for the remote key-value store.
///
/// Values are opaque text blobs; higher layers decide how to decode them.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every key starting with `prefix`, across all pages.
    async fn list_keys(&self, prefix: &str) -> RepositoryResult<Vec<String>>;

    /// Fetch the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(None)` - If no value is stored under the key
    async fn get_value(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Create or replace the value stored under `key`.
    async fn put_value(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// Delete `keys` in bulk.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of keys the request covered
    async fn delete_keys(&self, keys: &[String]) -> RepositoryResult<usize>;
}

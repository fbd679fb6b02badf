//! In-memory local repository implementation.
//!
//! Stores values in an ordered map so key listings come back sorted, the same
//! way the remote store returns them. Suitable for unit tests and local
//! development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::*;

/// In-memory local repository.
///
/// # Example
/// ```
/// use birthday_countdown::db::repositories::LocalRepository;
/// use birthday_countdown::db::repository::MessageRepository;
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// repo.put_value("message:1", "{}").await.unwrap();
/// assert_eq!(repo.list_keys("message:").await.unwrap(), vec!["message:1"]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    values: BTreeMap<String, String>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing store outages.
    ///
    /// While unhealthy every operation fails with a retryable connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.data.write().values.clear();
    }

    /// Get the number of stored values.
    pub fn len(&self) -> usize {
        self.data.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local store marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

#[async_trait]
impl MessageRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_keys(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_keys")?;
        Ok(data
            .values
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "get_value")?;
        Ok(data.values.get(key).cloned())
    }

    async fn put_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "put_value")?;
        data.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_keys(&self, keys: &[String]) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "delete_keys")?;
        for key in keys {
            data.values.remove(key);
        }
        Ok(keys.len())
    }
}

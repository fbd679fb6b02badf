//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::KvConfig;
use super::repo_config::RepositoryConfig;
#[cfg(feature = "kv-repo")]
use super::repositories::KvRepository;
use super::repositories::LocalRepository;
use super::repository::{MessageRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Cloudflare Workers KV over HTTPS
    Kv,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("kv", "cloudflare", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kv" | "cloudflare" => Ok(Self::Kv),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to KV when any Cloudflare
    /// credential variable is present, otherwise Local.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse();
        }

        if KvConfig::env_present() {
            Ok(Self::Kv)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use birthday_countdown::db::{KvConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = KvConfig::from_env()?;
///     let _kv = RepositoryFactory::create(RepositoryType::Kv, Some(&config))?;
///
///     let _local = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `kv_config` - KV connection settings (required for KV)
    pub fn create(
        repo_type: RepositoryType,
        kv_config: Option<&KvConfig>,
    ) -> RepositoryResult<Arc<dyn MessageRepository>> {
        match repo_type {
            RepositoryType::Kv => {
                let config = kv_config.ok_or_else(|| {
                    RepositoryError::configuration("KV repository requires KvConfig")
                })?;
                Self::create_kv_dyn(config)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Cloudflare KV repository.
    #[cfg(feature = "kv-repo")]
    pub fn create_kv(config: &KvConfig) -> RepositoryResult<Arc<KvRepository>> {
        let repo = KvRepository::new(config.clone())?;
        Ok(Arc::new(repo))
    }

    #[cfg(feature = "kv-repo")]
    fn create_kv_dyn(config: &KvConfig) -> RepositoryResult<Arc<dyn MessageRepository>> {
        Ok(Self::create_kv(config)? as Arc<dyn MessageRepository>)
    }

    #[cfg(not(feature = "kv-repo"))]
    fn create_kv_dyn(_config: &KvConfig) -> RepositoryResult<Arc<dyn MessageRepository>> {
        Err(RepositoryError::configuration(
            "KV repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn MessageRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryType::from_env`] and [`KvConfig::from_env`].
    pub fn from_env() -> RepositoryResult<Arc<dyn MessageRepository>> {
        let repo_type = RepositoryType::from_env().map_err(RepositoryError::configuration)?;

        match repo_type {
            RepositoryType::Kv => {
                let config = KvConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create(repo_type, Some(&config))
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the repository.toml configuration file
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn MessageRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn MessageRepository>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    /// Create repository from a RepositoryConfig instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn MessageRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        let kv_config = config.to_kv_config()?;
        Self::create(repo_type, kv_config.as_ref())
    }
}

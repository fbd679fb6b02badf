//! Repository configuration file support.
//!
//! Reads the `[repository]` and `[kv]` tables of a `repository.toml` file.
//! The API token may be left out of the file and supplied through
//! `CLOUDFLARE_API_TOKEN` instead.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::config::{KvConfig, DEFAULT_KV_API_BASE};
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub kv: KvSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Cloudflare KV settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvSettings {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub namespace_id: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KvSettings {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            namespace_id: String::new(),
            api_token: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_KV_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find `repository.toml` in the standard locations:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default() -> Option<PathBuf> {
        [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load repository configuration from the default location.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        match Self::find_default() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(
                "No repository.toml found in standard locations",
            )),
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to a [`KvConfig`] if this is a KV configuration.
    ///
    /// Returns `Ok(None)` for other repository types.
    pub fn to_kv_config(&self) -> Result<Option<KvConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Kv {
            return Ok(None);
        }

        let api_token = if self.kv.api_token.trim().is_empty() {
            std::env::var("CLOUDFLARE_API_TOKEN").unwrap_or_default()
        } else {
            self.kv.api_token.clone()
        };

        for (name, value) in [
            ("kv.account_id", &self.kv.account_id),
            ("kv.namespace_id", &self.kv.namespace_id),
            ("kv.api_token", &api_token),
        ] {
            if value.trim().is_empty() {
                return Err(RepositoryError::configuration(format!(
                    "KV repository requires '{}' setting",
                    name
                )));
            }
        }

        Ok(Some(
            KvConfig::new(
                self.kv.account_id.trim(),
                self.kv.namespace_id.trim(),
                api_token.trim(),
            )
            .with_api_base(self.kv.api_base.trim())
            .with_timeout(Duration::from_secs(self.kv.timeout_secs)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.to_kv_config().unwrap().is_none());
    }

    #[test]
    fn test_parse_kv_config() {
        let toml = r#"
[repository]
type = "kv"

[kv]
account_id = "acc"
namespace_id = "ns"
api_token = "tok"
api_base = "http://127.0.0.1:8787"
timeout_secs = 3
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Kv);

        let kv = config.to_kv_config().unwrap().unwrap();
        assert_eq!(kv.account_id, "acc");
        assert_eq!(kv.namespace_id, "ns");
        assert_eq!(kv.api_token, "tok");
        assert_eq!(kv.api_base, "http://127.0.0.1:8787");
        assert_eq!(kv.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_kv_defaults() {
        let toml = r#"
[repository]
type = "cloudflare"

[kv]
account_id = "acc"
namespace_id = "ns"
api_token = "tok"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        let kv = config.to_kv_config().unwrap().unwrap();
        assert_eq!(kv.api_base, DEFAULT_KV_API_BASE);
        assert_eq!(kv.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_kv_requires_namespace() {
        let toml = r#"
[repository]
type = "kv"

[kv]
account_id = "acc"
api_token = "tok"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        let err = config.to_kv_config().unwrap_err();
        assert!(err.to_string().contains("kv.namespace_id"));
    }

    #[test]
    fn test_invalid_type() {
        let toml = r#"
[repository]
type = "postgres"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.repository_type().is_err());
        assert!(config.to_kv_config().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repository.toml");
        fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

        let config = RepositoryConfig::from_file(&path).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_from_missing_file() {
        let err = RepositoryConfig::from_file("/nonexistent/repository.toml").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}

//! Key-value store configuration and environment variable handling.

use std::env;
use std::time::Duration;

/// Public Cloudflare API endpoint.
pub const DEFAULT_KV_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare Workers KV connection settings.
#[derive(Clone)]
pub struct KvConfig {
    /// Cloudflare account id
    pub account_id: String,
    /// KV namespace id holding the messages
    pub namespace_id: String,
    /// API token with KV read/write permission
    pub api_token: String,
    /// API root, overridable for tests and proxies
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for KvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvConfig")
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KvConfig {
    /// Create a configuration against the public Cloudflare API.
    pub fn new(
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
            api_token: api_token.into(),
            api_base: DEFAULT_KV_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a new KV configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CLOUDFLARE_ACCOUNT_ID` (required)
    /// - `CLOUDFLARE_API_TOKEN` (required)
    /// - `CLOUDFLARE_KV_NAMESPACE_ID` (required)
    /// - `CLOUDFLARE_API_BASE` (optional, default: public API)
    /// - `KV_TIMEOUT_SECS` (optional, default: 10)
    ///
    /// # Errors
    /// Returns an error naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, String> {
        let account_id = required("CLOUDFLARE_ACCOUNT_ID")?;
        let api_token = required("CLOUDFLARE_API_TOKEN")?;
        let namespace_id = required("CLOUDFLARE_KV_NAMESPACE_ID")?;

        let mut config = Self::new(account_id, namespace_id, api_token);

        if let Ok(base) = env::var("CLOUDFLARE_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base = base.trim().to_string();
            }
        }

        if let Ok(secs) = env::var("KV_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| "KV_TIMEOUT_SECS must be a whole number of seconds".to_string())?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Whether any of the credential variables are present.
    pub fn env_present() -> bool {
        ["CLOUDFLARE_ACCOUNT_ID", "CLOUDFLARE_API_TOKEN", "CLOUDFLARE_KV_NAMESPACE_ID"]
            .iter()
            .any(|k| env::var(k).is_ok())
    }

    /// Root URL of the namespace, e.g.
    /// `{api_base}/accounts/{account}/storage/kv/namespaces/{namespace}`.
    pub fn namespace_url(&self) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.namespace_id
        )
    }
}

fn required(key: &str) -> Result<String, String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(format!("{} is not configured.", key)),
    }
}

//! Cloudflare Workers KV repository implementation.
//!
//! Talks to the KV REST API of a single namespace:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list keys | `GET {namespace}/keys?prefix=…&cursor=…` |
//! | get value | `GET {namespace}/values/{key}` |
//! | put value | `PUT {namespace}/values/{key}` |
//! | delete    | `DELETE {namespace}/bulk` with a JSON array of keys |
//!
//! ## Configuration
//!
//! See [`KvConfig::from_env`] for the environment variables.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::db::config::KvConfig;
use crate::db::repository::{ErrorContext, MessageRepository, RepositoryError, RepositoryResult};

mod models;

use models::*;

/// Largest page the list endpoint returns.
const LIST_PAGE_LIMIT: &str = "1000";
/// Largest batch the bulk delete endpoint accepts.
const BULK_DELETE_LIMIT: usize = 10_000;

/// Repository backed by a Cloudflare KV namespace.
#[derive(Clone)]
pub struct KvRepository {
    client: Client,
    config: KvConfig,
    namespace_url: Url,
}

impl std::fmt::Debug for KvRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvRepository")
            .field("config", &self.config)
            .finish()
    }
}

impl KvRepository {
    /// Create a new repository; no request is made until the first call.
    pub fn new(config: KvConfig) -> RepositoryResult<Self> {
        let namespace_url = Url::parse(&config.namespace_url()).map_err(|e| {
            RepositoryError::configuration(format!("Invalid KV API base URL: {}", e))
        })?;
        if namespace_url.cannot_be_a_base() {
            return Err(RepositoryError::configuration(
                "KV API base URL cannot carry a path",
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                RepositoryError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            namespace_url,
        })
    }

    pub fn config(&self) -> &KvConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.namespace_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> RepositoryResult<Response> {
        request
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))
    }

    /// Decode a JSON envelope and require `success: true` on a 2xx reply.
    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
        context: ErrorContext,
    ) -> RepositoryResult<KvEnvelope<T>> {
        let status = response.status();
        let operation = context.operation.clone().unwrap_or_default();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        let context = if is_transient(status) {
            context.retryable()
        } else {
            context
        };

        let envelope: KvEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(RepositoryError::query_with_context(
                    format!("Unexpected response format: {}", e),
                    context,
                ))
            }
            Err(_) => {
                return Err(RepositoryError::query_with_context(
                    format!("KV request failed ({}): {}", status, body.trim()),
                    context,
                ))
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(RepositoryError::query_with_context(
                format!("KV request failed ({}): {}", status, envelope.error_summary()),
                context,
            ));
        }

        Ok(envelope)
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl MessageRepository for KvRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let mut url = self.url(&["keys"]);
        url.query_pairs_mut().append_pair("limit", "10");

        let response = self.send(self.client.get(url), "health_check").await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "KV health check failed");
        }
        Ok(status.is_success())
    }

    async fn list_keys(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = self.url(&["keys"]);
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("prefix", prefix);
                query.append_pair("limit", LIST_PAGE_LIMIT);
                if let Some(ref c) = cursor {
                    query.append_pair("cursor", c);
                }
            }

            let response = self.send(self.client.get(url), "list_keys").await?;
            let context = ErrorContext::new("list_keys").with_details(format!("prefix={}", prefix));
            let envelope: KvEnvelope<Vec<KvKey>> =
                Self::read_envelope(response, context.clone()).await?;

            let page = envelope.result.ok_or_else(|| {
                RepositoryError::query_with_context(
                    "Unexpected format when listing keys",
                    context,
                )
            })?;
            let info = envelope.result_info.unwrap_or_default();
            debug!(prefix, page_len = page.len(), reported = ?info.count, "Listed KV keys");
            keys.extend(page.into_iter().map(|k| k.name));

            cursor = info.cursor.filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(keys)
    }

    async fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let url = self.url(&["values", key]);
        let response = self.send(self.client.get(url), "get_value").await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(key, "KV key not found");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("get_value"))?;

        if !status.is_success() {
            let mut context = ErrorContext::new("get_value").with_key(key);
            if is_transient(status) {
                context = context.retryable();
            }
            return Err(RepositoryError::query_with_context(
                format!("KV request failed ({}): {}", status, body.trim()),
                context,
            ));
        }

        Ok(Some(body))
    }

    async fn put_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let url = self.url(&["values", key]);
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(value.to_string());
        let response = self.send(request, "put_value").await?;

        Self::read_envelope::<serde_json::Value>(
            response,
            ErrorContext::new("put_value").with_key(key),
        )
        .await?;
        debug!(key, bytes = value.len(), "Stored KV value");
        Ok(())
    }

    async fn delete_keys(&self, keys: &[String]) -> RepositoryResult<usize> {
        let mut deleted = 0;
        for chunk in keys.chunks(BULK_DELETE_LIMIT) {
            let url = self.url(&["bulk"]);
            let response = self
                .send(self.client.delete(url).json(chunk), "delete_keys")
                .await?;

            Self::read_envelope::<serde_json::Value>(
                response,
                ErrorContext::new("delete_keys").with_details(format!("batch={}", chunk.len())),
            )
            .await?;
            deleted += chunk.len();
        }
        debug!(deleted, "Bulk deleted KV keys");
        Ok(deleted)
    }
}

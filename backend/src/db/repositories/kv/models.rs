//! Response envelopes of the Cloudflare v4 API.

use serde::Deserialize;

/// Common wrapper around every JSON reply.
#[derive(Debug, Deserialize)]
pub struct KvEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<KvApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<KvResultInfo>,
}

impl<T> KvEnvelope<T> {
    /// Joined error messages, for logs and error details.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "operation reported not successful".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
pub struct KvApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Entry of a key listing.
#[derive(Debug, Deserialize)]
pub struct KvKey {
    pub name: String,
}

/// Pagination info of a key listing. An empty cursor marks the last page.
#[derive(Debug, Default, Deserialize)]
pub struct KvResultInfo {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

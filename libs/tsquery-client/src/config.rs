use std::time::Duration;

use serde::Deserialize;

use crate::error::ClientError;

/// Connection settings for [`QueryClient`](crate::QueryClient).
///
/// Deserialized from the `[client]` table of the runner config.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the query service, e.g. `http://127.0.0.1:9300`.
    pub endpoint: String,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries after the first attempt for transport errors, 429 and 5xx.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubled on every retry.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Upper bound for a single backoff delay.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Page size hint sent as `MaxRows`. Service default when unset.
    #[serde(default)]
    pub max_rows: Option<u32>,

    /// Sent as `Authorization: Bearer <key>` when set.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_request_timeout_ms() -> u64 {
    20_000
}
fn default_max_retries() -> u32 {
    10
}
fn default_retry_base_delay_ms() -> u64 {
    100
}
fn default_retry_max_delay_ms() -> u64 {
    5_000
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            max_rows: None,
            api_key: None,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ClientError::Config("endpoint is empty".into()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "endpoint '{endpoint}' must start with http:// or https://"
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ClientError::Config("request_timeout_ms must be > 0".into()));
        }
        if self.max_rows == Some(0) {
            return Err(ClientError::Config("max_rows must be > 0".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        let delay = self.retry_base_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.retry_max_delay_ms))
    }

    /// `{endpoint}/{path}` without doubled slashes.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim().trim_end_matches('/'))
    }
}

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use tsquery_api::{FetchError, FetchFuture, Page, PageFetcher};

use crate::config::ClientConfig;
use crate::error::ClientError;

// ═══════════════════════════════════════════════════════════════
//  Wire messages
// ═══════════════════════════════════════════════════════════════

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct QueryRequest<'a> {
    query_string: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_rows: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CancelRequest<'a> {
    query_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CancelResponse {
    #[serde(default)]
    cancellation_message: Option<String>,
}

/// Error body; both `{"code","message"}` and `{"__type","Message"}` spellings are accepted.
#[derive(Deserialize)]
struct ServiceErrorBody {
    #[serde(default, alias = "__type", alias = "Code")]
    code: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

struct Failure {
    error: FetchError,
    retryable: bool,
}

impl Failure {
    fn retry(error: FetchError) -> Self {
        Self { error, retryable: true }
    }

    fn fatal(error: FetchError) -> Self {
        Self { error, retryable: false }
    }
}

// ═══════════════════════════════════════════════════════════════
//  QueryClient
// ═══════════════════════════════════════════════════════════════

/// JSON-over-HTTP client for the query service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl QueryClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of `query`. `next_token` is `None` for the first page.
    pub async fn query(&self, query: &str, next_token: Option<&str>) -> Result<Page, FetchError> {
        let body = QueryRequest {
            query_string: query,
            next_token,
            max_rows: self.config.max_rows,
        };
        let page: Page = self.post("query", &body).await?;
        tracing::debug!(
            query_id = ?page.query_id,
            rows = page.rows.len(),
            more = !page.is_last(),
            "received page"
        );
        Ok(page)
    }

    /// Cancel a running query. Returns the service's cancellation message, if any.
    pub async fn cancel(&self, query_id: &str) -> Result<Option<String>, FetchError> {
        let resp: CancelResponse = self.post("cancel", &CancelRequest { query_id }).await?;
        tracing::info!(query_id, "query cancelled");
        Ok(resp.cancellation_message)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url(path);
        let mut attempt = 0u32;
        loop {
            match self.send_once(&url, body).await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.retryable && attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    attempt += 1;
                    tracing::warn!(
                        %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn send_once<B, T>(&self, url: &str, body: &B) -> Result<T, Failure>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Failure::retry(FetchError::transport(format!("HTTP request failed: {e}"))))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Failure::retry(FetchError::transport(format!("read response body: {e}"))))?;

        if !status.is_success() {
            return Err(Failure {
                error: service_error(status, &text),
                retryable: is_retryable(status),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| Failure::fatal(FetchError::transport(format!("parse response: {e}"))))
    }
}

impl PageFetcher for QueryClient {
    fn fetch<'a>(&'a self, query: &'a str, next_token: Option<&'a str>) -> FetchFuture<'a> {
        Box::pin(self.query(query, next_token))
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn service_error(status: StatusCode, body: &str) -> FetchError {
    let parsed = serde_json::from_str::<ServiceErrorBody>(body).ok();
    let (code, message) = match parsed {
        Some(b) => (b.code, b.message),
        None => (None, None),
    };
    let message = message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status.canonical_reason().unwrap_or("no response body").to_string()
        } else {
            trimmed.to_string()
        }
    });
    FetchError::service(code.unwrap_or_else(|| status.as_u16().to_string()), message)
}

//! Resource Graph HTTP client for query execution

use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

use crate::config::api;
use crate::error::{InventoryError, Result};
use crate::graph::models::{QueryPage, QueryRequest, QueryResult};
use crate::graph::retry::{with_retry, RetryPolicy};

/// Longest slice of an error body kept in an error message
const ERROR_BODY_LIMIT: usize = 500;

/// Azure Resource Graph API client
///
/// Owns one connection pool; meant to be driven from a single task.
pub struct ResourceGraphClient {
    client: Client,
    token: String,
    endpoint: String,
    retry_policy: RetryPolicy,
}

impl ResourceGraphClient {
    /// Create a client for the public-cloud endpoint with default timeouts and retry budget
    pub fn new(token: String) -> Self {
        Self {
            client: build_http_client(Duration::from_secs(api::REQUEST_TIMEOUT_SECS)),
            token,
            endpoint: api::ENDPOINT.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Point the client at another Resource Graph endpoint (sovereign cloud, mock server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replace the per-attempt request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    /// Full query URL including the API version
    pub(crate) fn query_url(&self) -> String {
        format!(
            "{}?api-version={}",
            self.endpoint.trim_end_matches('/'),
            api::API_VERSION
        )
    }

    /// Create a POST request builder with standard headers
    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
    }

    /// Single attempt, no retry
    async fn send_once(&self, request: &QueryRequest) -> Result<QueryPage> {
        let url = self.query_url();
        debug!(
            "POST {} (skip_token={})",
            url,
            request.options.skip_token.is_some()
        );

        let response = self.post(&url).json(request).send().await?;
        let status = response.status().as_u16();
        page_from_response(status, response.text().await)
    }

    /// Execute one query request, retrying transient failures
    ///
    /// Callers only ever see the final outcome: the page, a non-retryable
    /// error, or the last error once the retry budget is spent.
    pub async fn execute_query(&self, request: &QueryRequest) -> Result<QueryPage> {
        request.validate()?;
        with_retry(&self.retry_policy, "Resource Graph query", move || {
            self.send_once(request)
        })
        .await
    }

    /// Fetch every page of a query, following continuation tokens
    ///
    /// Stops when a page carries no continuation token or after `max_pages`
    /// fetches. Hitting the cap is not an error: the rows gathered so far are
    /// returned with `truncated` set. Any error aborts the whole aggregation
    /// and the rows collected by this call are dropped.
    pub async fn execute_query_all(
        &self,
        subscriptions: &[String],
        query: &str,
        max_pages: u32,
    ) -> Result<QueryResult> {
        let mut rows = Vec::new();
        let mut skip_token: Option<String> = None;
        let mut pages_fetched: u32 = 0;
        let mut exhausted = false;

        while pages_fetched < max_pages {
            let request = QueryRequest::new(subscriptions, query, skip_token.as_deref());
            let page = self.execute_query(&request).await?;

            let page_rows = page.rows.len();
            rows.extend(page.rows);
            debug!(
                "page={} rows={} total={} has_skip_token={}",
                pages_fetched,
                page_rows,
                rows.len(),
                page.skip_token.is_some()
            );
            pages_fetched += 1;

            match page.skip_token {
                Some(token) => skip_token = Some(token),
                None => {
                    exhausted = true;
                    break;
                }
            }
        }

        let truncated = !exhausted;
        if truncated {
            warn!(
                "Reached max_pages={}; results may be truncated ({} rows fetched)",
                max_pages,
                rows.len()
            );
        }

        Ok(QueryResult {
            rows,
            pages_fetched,
            truncated,
        })
    }
}

/// Classify a response; an error status wins over a failed body read
fn page_from_response<E>(status: u16, body: std::result::Result<String, E>) -> Result<QueryPage>
where
    E: Into<InventoryError>,
{
    if status >= 400 {
        return Err(InventoryError::Http {
            status,
            message: error_message(&body.unwrap_or_default()),
        });
    }

    match body {
        Ok(body) => QueryPage::from_body(&body),
        Err(e) => Err(e.into()),
    }
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(api::CONNECT_TIMEOUT_SECS))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Summarise an error body; prefers Azure's `{"error":{"code","message"}}` shape
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &value["error"];
        let code = error["code"].as_str();
        let message = error["message"].as_str();
        match (code, message) {
            (Some(code), Some(message)) => return format!("{}: {}", code, message),
            (Some(code), None) => return code.to_string(),
            (None, Some(message)) => return message.to_string(),
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
impl ResourceGraphClient {
    /// Test client against a mock server with millisecond backoff
    pub fn test_client(base_url: &str) -> Self {
        Self::new("test-token".to_string())
            .with_endpoint(format!(
                "{}/providers/Microsoft.ResourceGraph/resources",
                base_url
            ))
            .with_retry_policy(RetryPolicy::with_base_delay(Duration::from_millis(1)))
    }
}

// LangflowClient and its builder: connection configuration and HTTP plumbing.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use langflow_types::{ClientTimeout, Error};

use crate::files::Files;
use crate::flow::Flow;
use crate::logs::Logs;
use crate::util::http::{error_from_body, normalize_base_url};

/// Shared, read-only client state. Cheap to clone via `Arc`; safe for
/// concurrent use, since calls issued in parallel share only this
/// configuration.
#[derive(Debug)]
pub(crate) struct ClientInner {
    pub(crate) base_url: String,
    api_key: Option<SecretString>,
    pub(crate) http: reqwest::Client,
    /// Whole-call deadline for non-streaming requests.
    pub(crate) request_timeout: Duration,
    /// Per-chunk timeout for streaming responses.
    pub(crate) stream_read_timeout: Duration,
}

impl ClientInner {
    /// Build the headers carried on every request.
    pub(crate) fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            headers.insert(
                "x-api-key",
                key.expose_secret().parse().map_err(|_| {
                    Error::configuration(
                        "Invalid API key: contains non-ASCII or control characters",
                    )
                })?,
            );
        }
        Ok(headers)
    }
}

/// Client for a Langflow server.
///
/// Holds the base URL, optional API key, and the HTTP client. Cloning is
/// cheap (shared `Arc`); a failed call never poisons the client, which stays
/// fully usable for subsequent requests.
#[derive(Clone, Debug)]
pub struct LangflowClient {
    inner: Arc<ClientInner>,
}

/// Builder for constructing a [`LangflowClient`].
pub struct LangflowClientBuilder {
    base_url: Option<String>,
    api_key: Option<SecretString>,
    timeout: Option<ClientTimeout>,
    default_headers: Option<HeaderMap>,
}

impl LangflowClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            default_headers: None,
        }
    }

    /// Set the server base URL (required). A trailing slash is stripped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key, sent as the `x-api-key` header on every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set custom timeout configuration.
    pub fn timeout(mut self, timeout: ClientTimeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set default HTTP headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client. Returns a `Configuration` error if `base_url` is
    /// unset.
    pub fn build(self) -> Result<LangflowClient, Error> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("base_url is required"))?;
        let timeout = self.timeout.unwrap_or_default();
        let http = build_http_client(&timeout, self.default_headers);
        Ok(LangflowClient {
            inner: Arc::new(ClientInner {
                base_url: normalize_base_url(&base_url),
                api_key: self.api_key,
                http,
                request_timeout: Duration::from_secs_f64(timeout.request),
                stream_read_timeout: Duration::from_secs_f64(timeout.stream_read),
            }),
        })
    }
}

impl Default for LangflowClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an HTTP client wiring `connect` → `connect_timeout()`. The
/// `request` timeout is applied per call on non-streaming requests only, so
/// a long-running stream is bounded by `stream_read` per chunk rather than
/// by a whole-response deadline.
fn build_http_client(timeout: &ClientTimeout, default_headers: Option<HeaderMap>) -> reqwest::Client {
    let mut builder =
        reqwest::Client::builder().connect_timeout(Duration::from_secs_f64(timeout.connect));
    if let Some(headers) = default_headers {
        builder = builder.default_headers(headers);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        // Fall back to a default client rather than panicking in a library
        reqwest::Client::new()
    })
}

impl LangflowClient {
    /// Create a new builder.
    pub fn builder() -> LangflowClientBuilder {
        LangflowClientBuilder::new()
    }

    /// Create from environment variables.
    ///
    /// - `LANGFLOW_SERVER_URL` (fallback: `LANGFLOW_BASE_URL`), required
    /// - `LANGFLOW_API_KEY`, optional
    /// - `LANGFLOW_CONNECT_TIMEOUT` / `LANGFLOW_REQUEST_TIMEOUT` /
    ///   `LANGFLOW_STREAM_READ_TIMEOUT`, optional, in seconds
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("LANGFLOW_SERVER_URL")
            .or_else(|_| std::env::var("LANGFLOW_BASE_URL"))
            .map_err(|_| {
                Error::configuration("LANGFLOW_SERVER_URL (or LANGFLOW_BASE_URL) not set")
            })?;
        let mut builder = Self::builder()
            .base_url(base_url)
            .timeout(Self::timeout_from_env());
        if let Ok(key) = std::env::var("LANGFLOW_API_KEY") {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    /// Parse timeout configuration from environment variables, falling back
    /// to `ClientTimeout::default()` for unset or unparseable values.
    fn timeout_from_env() -> ClientTimeout {
        let defaults = ClientTimeout::default();
        ClientTimeout {
            connect: std::env::var("LANGFLOW_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(defaults.connect),
            request: std::env::var("LANGFLOW_REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(defaults.request),
            stream_read: std::env::var("LANGFLOW_STREAM_READ_TIMEOUT")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(defaults.stream_read),
        }
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Bind a flow id for running, streaming, and tweaking.
    pub fn flow(&self, id: impl Into<String>) -> Flow {
        Flow::new(self.clone(), id.into())
    }

    /// File operations (`/v2/files`).
    pub fn files(&self) -> Files {
        Files::new(self.clone())
    }

    /// Log operations (`/logs`, `/logs-stream`).
    pub fn logs(&self) -> Logs {
        Logs::new(self.clone())
    }

    pub(crate) fn inner(&self) -> Arc<ClientInner> {
        Arc::clone(&self.inner)
    }

    // --- HTTP plumbing shared by Flow, Files, and Logs ---

    pub(crate) async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .http
            .get(&url)
            .query(query)
            .timeout(self.inner.request_timeout)
            .headers(self.inner.headers()?)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {e}"), e))?;
        Self::json_or_error(response).await
    }

    pub(crate) async fn post_json(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .http
            .post(&url)
            .timeout(self.inner.request_timeout)
            .headers(self.inner.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {e}"), e))?;
        Self::json_or_error(response).await
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!(%url, "POST multipart");
        let response = self
            .inner
            .http
            .post(&url)
            .timeout(self.inner.request_timeout)
            .headers(self.inner.headers()?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {e}"), e))?;
        Self::json_or_error(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!(%url, "DELETE");
        let response = self
            .inner
            .http
            .delete(&url)
            .timeout(self.inner.request_timeout)
            .headers(self.inner.headers()?)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {e}"), e))?;
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        Ok(())
    }

    async fn json_or_error(response: reqwest::Response) -> Result<Value, Error> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| Error::decode(format!("failed to parse response body: {e}")))
    }
}

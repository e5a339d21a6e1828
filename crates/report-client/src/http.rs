use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::TransportError;
use crate::http_utils::join_base_path;
use crate::transport::{ReportTransport, TransportResponse};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Generation runs an LLM on the service side, so the default is generous.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

static HTTP_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// reqwest-backed transport talking to the report service over HTTP.
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        join_base_path(&config.base_url, "/")?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("report-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| TransportError::Request(format!("http client build failed: {err}")))?;
        Ok(Self { config, client })
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<TransportResponse, TransportError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let url = join_base_path(&self.config.base_url, path)?;
        let body_len = body.as_ref().map(|value| value.len()).unwrap_or(0);
        tracing::debug!(
            request_id,
            method = %method,
            url = %url,
            body_len,
            "report http request start"
        );

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    request_id,
                    method = %method,
                    url = %url,
                    timeout = err.is_timeout(),
                    connect = err.is_connect(),
                    error = %err,
                    "report http request failed"
                );
                return Err(TransportError::from_reqwest(err));
            }
        };
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = response.bytes().await.map_err(|err| {
            tracing::warn!(request_id, error = %err, "report http body read failed");
            TransportError::from_reqwest(err)
        })?;
        tracing::info!(
            request_id,
            method = %method,
            url = %url,
            status,
            content_type = %content_type,
            body_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report http request finished"
        );
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl ReportTransport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<TransportResponse, TransportError> {
        self.execute(Method::POST, path, Some(payload.to_string()))
            .await
    }

    async fn get(&self, path_and_query: &str) -> Result<TransportResponse, TransportError> {
        self.execute(Method::GET, path_and_query, None).await
    }
}

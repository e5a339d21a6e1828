use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

/// Raw reply from the report service; status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status / 100 == 2
    }
}

#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<TransportResponse, TransportError>;

    async fn get(&self, path_and_query: &str) -> Result<TransportResponse, TransportError>;
}

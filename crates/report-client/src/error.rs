use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("form {form} has no field named {field}")]
    UnknownField { form: String, field: String },
    #[error("form {form} has no generated report to download")]
    NoArtifact { form: String },
    #[error("download failed with status {status}: {message}")]
    DownloadStatus { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

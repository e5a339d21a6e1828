//! Client side of the report generation workflow.

pub mod controller;
pub mod error;
pub mod events;
pub mod form;
pub mod forms;
pub mod http;
pub mod http_utils;
pub mod params;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    ControllerOptions, ControllerSnapshot, Phase, ReportController, ReportResult, Submission,
    DEFAULT_FAILURE_MESSAGE,
};
pub use error::{ControllerError, TransportError};
pub use events::ControllerEvent;
pub use form::{FormSpec, ResponseMapper};
pub use forms::ReportForms;
pub use http::{HttpTransport, HttpTransportConfig};
pub use params::RequestParameters;
pub use transport::{ReportTransport, TransportResponse};

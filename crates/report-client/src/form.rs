use report_protocol::schema::{self, FieldSpec};
use report_protocol::{ReportKind, ReportResponse};

use crate::controller::ReportResult;

/// Maps a 2xx response body onto the stored result.
pub type ResponseMapper = fn(&[u8]) -> Result<ReportResult, serde_json::Error>;

/// Everything that distinguishes one report form from another.
#[derive(Debug, Clone)]
pub struct FormSpec {
    pub name: String,
    pub endpoint: String,
    pub fields: Vec<FieldSpec>,
    pub map_response: ResponseMapper,
}

impl FormSpec {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            fields,
            map_response: decode_report_response,
        }
    }

    pub fn for_kind(kind: ReportKind) -> Self {
        Self::new(kind.as_str(), kind.endpoint(), schema::fields(kind).to_vec())
    }

    pub fn with_mapper(mut self, map_response: ResponseMapper) -> Self {
        self.map_response = map_response;
        self
    }
}

pub fn decode_report_response(body: &[u8]) -> Result<ReportResult, serde_json::Error> {
    let response: ReportResponse = serde_json::from_slice(body)?;
    Ok(ReportResult {
        report_text: response.report,
        artifact_path: response.file_path,
    })
}

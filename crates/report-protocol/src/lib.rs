use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod download;
pub mod schema;

pub const DEFAULT_MODEL_NAME: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    #[default]
    Openai,
    Ollama,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Openai => "openai",
            ModelType::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "openai" => Ok(ModelType::Openai),
            "ollama" => Ok(ModelType::Ollama),
            other => Err(format!(
                "unsupported model type {other:?} (expected openai or ollama)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Github,
    HnTopic,
    HnDaily,
    BidderList,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Github,
        ReportKind::HnTopic,
        ReportKind::HnDaily,
        ReportKind::BidderList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Github => "github",
            ReportKind::HnTopic => "hn_topic",
            ReportKind::HnDaily => "hn_daily",
            ReportKind::BidderList => "bidder_list",
        }
    }

    /// Generation endpoint path on the report service.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReportKind::Github => "/generate_github_report",
            ReportKind::HnTopic => "/generate_hn_topic_report",
            ReportKind::HnDaily => "/generate_hn_daily_report",
            ReportKind::BidderList => "/generate_bidder_list_report",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Github => "GitHub activity report",
            ReportKind::HnTopic => "Hacker News topic report",
            ReportKind::HnDaily => "Hacker News daily report",
            ReportKind::BidderList => "Bidder list report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form value as it goes over the wire.
///
/// Input widgets hand back text even for numeric fields, so both shapes are
/// carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(i64::from(value))
    }
}

impl From<ModelType> for FieldValue {
    fn from(value: ModelType) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

/// Successful body of every generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportResponse {
    pub report: String,
    pub file_path: String,
}

/// Failure body returned with a non-2xx status.
///
/// `error` is kept as raw JSON since the service does not promise a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The user-facing message, if the service sent a non-empty string.
    pub fn message(&self) -> Option<&str> {
        match self.error.as_ref()? {
            serde_json::Value::String(message) if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_kinds_map_to_distinct_endpoints() {
        let endpoints: Vec<&str> = ReportKind::ALL.iter().map(|kind| kind.endpoint()).collect();
        assert_eq!(
            endpoints,
            vec![
                "/generate_github_report",
                "/generate_hn_topic_report",
                "/generate_hn_daily_report",
                "/generate_bidder_list_report",
            ]
        );
    }

    #[test]
    fn model_type_parses_known_values_only() {
        assert_eq!("openai".parse::<ModelType>(), Ok(ModelType::Openai));
        assert_eq!(" ollama ".parse::<ModelType>(), Ok(ModelType::Ollama));
        let err = "anthropic".parse::<ModelType>().unwrap_err();
        assert!(err.contains("anthropic"));
    }

    #[test]
    fn field_values_serialize_without_tags() {
        let number = serde_json::to_value(FieldValue::Number(7)).expect("serialize");
        let text = serde_json::to_value(FieldValue::text("25")).expect("serialize");
        assert_eq!(number, serde_json::json!(7));
        assert_eq!(text, serde_json::json!("25"));
    }

    #[test]
    fn error_body_message_requires_non_empty_string() {
        let body = ErrorBody::parse(br#"{"error":"model unavailable"}"#).expect("parse");
        assert_eq!(body.message(), Some("model unavailable"));

        let empty = ErrorBody::parse(br#"{"error":""}"#).expect("parse");
        assert_eq!(empty.message(), None);

        let numeric = ErrorBody::parse(br#"{"error":42}"#).expect("parse");
        assert_eq!(numeric.message(), None);

        let missing = ErrorBody::parse(br#"{"detail":"nope"}"#).expect("parse");
        assert_eq!(missing.message(), None);

        assert!(ErrorBody::parse(b"<html>502</html>").is_none());
    }

    #[test]
    fn report_response_decodes_service_body() {
        let body = r##"{"report":"# Daily","file_path":"/tmp/r1.txt"}"##;
        let decoded: ReportResponse = serde_json::from_str(body).expect("deserialize");
        assert_eq!(decoded.report, "# Daily");
        assert_eq!(decoded.file_path, "/tmp/r1.txt");
    }
}

//! Per-report field schemas.
//!
//! Widget kinds describe how a front end should collect the value; they are
//! never used to reject one.

use crate::{FieldValue, ReportKind, DEFAULT_MODEL_NAME};

pub const MODEL_TYPE_FIELD: &str = "model_type";
pub const MODEL_NAME_FIELD: &str = "model_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Number { min: Option<i64>, max: Option<i64> },
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initial {
    Text(&'static str),
    Number(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub initial: Initial,
}

impl FieldSpec {
    pub fn initial_value(&self) -> FieldValue {
        match self.initial {
            Initial::Text(value) => FieldValue::Text(value.to_string()),
            Initial::Number(value) => FieldValue::Number(value),
        }
    }
}

const MODEL_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: MODEL_TYPE_FIELD,
        label: "Model type",
        kind: FieldKind::Choice(&["openai", "ollama"]),
        initial: Initial::Text("openai"),
    },
    FieldSpec {
        name: MODEL_NAME_FIELD,
        label: "Model name",
        kind: FieldKind::Text,
        initial: Initial::Text(DEFAULT_MODEL_NAME),
    },
];

const GITHUB_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        name: "repo",
        label: "Repository (owner/name)",
        kind: FieldKind::Text,
        initial: Initial::Text(""),
    },
    FieldSpec {
        name: "days",
        label: "Past days",
        kind: FieldKind::Number {
            min: Some(1),
            max: None,
        },
        initial: Initial::Number(1),
    },
    MODEL_FIELDS[0],
    MODEL_FIELDS[1],
];

const HN_TOPIC_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        name: "date",
        label: "Date",
        kind: FieldKind::Date,
        initial: Initial::Text(""),
    },
    FieldSpec {
        name: "hour",
        label: "Hour",
        kind: FieldKind::Number {
            min: Some(0),
            max: Some(23),
        },
        initial: Initial::Text(""),
    },
    MODEL_FIELDS[0],
    MODEL_FIELDS[1],
];

const HN_DAILY_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: "date",
        label: "Date",
        kind: FieldKind::Date,
        initial: Initial::Text(""),
    },
    MODEL_FIELDS[0],
    MODEL_FIELDS[1],
];

const BIDDER_LIST_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "start_date",
        label: "Start date",
        kind: FieldKind::Date,
        initial: Initial::Text(""),
    },
    FieldSpec {
        name: "end_date",
        label: "End date",
        kind: FieldKind::Date,
        initial: Initial::Text(""),
    },
    FieldSpec {
        name: "keywords",
        label: "Keywords",
        kind: FieldKind::Text,
        initial: Initial::Text(""),
    },
    MODEL_FIELDS[0],
    MODEL_FIELDS[1],
];

/// Fields submitted by a report form, in display order.
pub fn fields(kind: ReportKind) -> &'static [FieldSpec] {
    match kind {
        ReportKind::Github => &GITHUB_FIELDS,
        ReportKind::HnTopic => &HN_TOPIC_FIELDS,
        ReportKind::HnDaily => &HN_DAILY_FIELDS,
        ReportKind::BidderList => &BIDDER_LIST_FIELDS,
    }
}

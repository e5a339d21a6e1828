use crate::cli::{Command, FormArgs};
use crate::config::Settings;
use report_client::{ControllerError, ReportController};
use report_protocol::schema::{MODEL_NAME_FIELD, MODEL_TYPE_FIELD};
use report_protocol::{FieldValue, ReportKind};
use std::path::PathBuf;

/// One form submission assembled from the command line.
#[derive(Debug)]
pub(crate) struct FormRequest {
    pub(crate) kind: ReportKind,
    pub(crate) assignments: Vec<(String, FieldValue)>,
    pub(crate) download: Option<PathBuf>,
    pub(crate) json: bool,
}

impl FormRequest {
    /// `None` for commands that do not submit a form.
    ///
    /// Later assignments win: config model defaults, then the typed flags,
    /// then `--model-*`, then `--set`.
    pub(crate) fn from_command(command: Command, settings: &Settings) -> Option<Self> {
        let (kind, flags, form) = match command {
            Command::Github { repo, days, form } => (
                ReportKind::Github,
                vec![("repo", repo), ("days", days)],
                form,
            ),
            Command::HnTopic { date, hour, form } => (
                ReportKind::HnTopic,
                vec![("date", date), ("hour", hour)],
                form,
            ),
            Command::HnDaily { date, form } => (ReportKind::HnDaily, vec![("date", date)], form),
            Command::BidderList {
                start_date,
                end_date,
                keywords,
                form,
            } => (
                ReportKind::BidderList,
                vec![
                    ("start_date", start_date),
                    ("end_date", end_date),
                    ("keywords", keywords),
                ],
                form,
            ),
            Command::Forms => return None,
        };

        let FormArgs {
            model_type,
            model_name,
            set,
            download,
            json,
        } = form;

        let mut assignments = Vec::new();
        if let Some(model_type) = settings.model_type {
            assignments.push((MODEL_TYPE_FIELD.to_string(), FieldValue::from(model_type)));
        }
        if let Some(model_name) = settings.model_name.clone() {
            assignments.push((MODEL_NAME_FIELD.to_string(), FieldValue::Text(model_name)));
        }
        for (name, value) in flags {
            if let Some(value) = value {
                assignments.push((name.to_string(), FieldValue::Text(value)));
            }
        }
        if let Some(model_type) = model_type {
            assignments.push((MODEL_TYPE_FIELD.to_string(), FieldValue::from(model_type)));
        }
        if let Some(model_name) = model_name {
            assignments.push((MODEL_NAME_FIELD.to_string(), FieldValue::Text(model_name)));
        }
        for (name, value) in set {
            assignments.push((name, FieldValue::Text(value)));
        }

        Some(Self {
            kind,
            assignments,
            download,
            json,
        })
    }

    pub(crate) async fn apply(&self, controller: &ReportController) -> Result<(), ControllerError> {
        for (name, value) in &self.assignments {
            controller.update_field(name, value.clone()).await?;
        }
        Ok(())
    }
}

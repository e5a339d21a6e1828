use anyhow::Context;
use report_client::http_utils::join_base_path;
use report_client::{ControllerEvent, ControllerSnapshot, Phase};
use report_protocol::schema::{self, FieldKind};
use report_protocol::ReportKind;
use std::fmt::Write;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub(crate) const LOADING_MESSAGE: &str = "Generating report, please wait...";

pub(crate) fn render_snapshot(
    kind: ReportKind,
    snapshot: &ControllerSnapshot,
    base_url: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", kind.title());
    match snapshot.phase {
        Phase::Idle => {
            let _ = writeln!(out, "Not submitted.");
        }
        Phase::Loading => {
            let _ = writeln!(out, "{LOADING_MESSAGE}");
        }
        Phase::Failed => {
            let message = snapshot.error.as_deref().unwrap_or_default();
            let _ = writeln!(out, "Error: {message}");
        }
        Phase::Succeeded => {
            if let Some(result) = snapshot.result.as_ref() {
                let _ = writeln!(out, "Report:");
                let _ = writeln!(out, "{}", result.report_text.trim_end());
                let _ = writeln!(out);
            }
            if let Some(path) = snapshot.download_url() {
                let link = join_base_path(base_url, &path).unwrap_or(path);
                let _ = writeln!(out, "Download: {link}");
            }
        }
    }
    out
}

pub(crate) fn render_forms() -> String {
    let mut out = String::new();
    for kind in ReportKind::ALL {
        let _ = writeln!(out, "{} ({}) -> POST {}", kind.title(), kind, kind.endpoint());
        for field in schema::fields(kind) {
            let _ = writeln!(
                out,
                "  {:<12} {:<26} {:<14} default {:?}",
                field.name,
                field.label,
                describe_kind(field.kind),
                field.initial_value().to_string()
            );
        }
    }
    out
}

fn describe_kind(kind: FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::Date => "date".to_string(),
        FieldKind::Number { min, max } => match (min, max) {
            (Some(min), Some(max)) => format!("number {min}-{max}"),
            (Some(min), None) => format!("number >={min}"),
            (None, Some(max)) => format!("number <={max}"),
            (None, None) => "number".to_string(),
        },
        FieldKind::Choice(options) => options.join("|"),
    }
}

/// Prints the loading line once the form goes in flight; ends when it settles.
pub(crate) fn spawn_progress_watcher(
    mut events: broadcast::Receiver<ControllerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::StateChanged { snapshot }) => match snapshot.phase {
                    Phase::Loading => eprintln!("{LOADING_MESSAGE}"),
                    Phase::Idle => {}
                    Phase::Succeeded | Phase::Failed => break,
                },
                Ok(ControllerEvent::StaleResponseDiscarded { form, generation }) => {
                    tracing::debug!(form = %form, generation, "stale reply ignored");
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

pub(crate) async fn join_progress_watcher(watcher: JoinHandle<()>) -> anyhow::Result<()> {
    watcher.await.context("progress watcher task failed")
}

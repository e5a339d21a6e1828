mod cli;
mod config;
mod logging;
mod render;
mod request;

use crate::cli::Args;
use crate::config::{load_console_config, resolve_settings, BASE_URL_ENV};
use crate::logging::init_tracing;
use crate::render::{join_progress_watcher, render_forms, render_snapshot, spawn_progress_watcher};
use crate::request::FormRequest;
use anyhow::Context;
use clap::Parser;
use report_client::{ControllerOptions, HttpTransport, HttpTransportConfig, Phase, ReportForms};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = load_console_config(args.config.as_deref())?;
    let settings = resolve_settings(config, args.base_url, std::env::var(BASE_URL_ENV).ok())?;
    let _log_guard = init_tracing(&settings.log_dir, args.log_to_stderr)
        .with_context(|| format!("failed to init logging in {}", settings.log_dir.display()))?;

    let Some(request) = FormRequest::from_command(args.command, &settings) else {
        print!("{}", render_forms());
        return Ok(ExitCode::SUCCESS);
    };
    info!(
        form = %request.kind,
        base_url = %settings.base_url,
        request_timeout = %humantime::format_duration(settings.request_timeout),
        "report console starting"
    );

    let transport = HttpTransport::new(HttpTransportConfig {
        base_url: settings.base_url.clone(),
        connect_timeout: settings.connect_timeout,
        request_timeout: settings.request_timeout,
    })
    .with_context(|| format!("invalid base_url {}", settings.base_url))?;
    let forms = ReportForms::new(
        Arc::new(transport),
        ControllerOptions {
            fallback_message: settings.fallback_message.clone(),
            ..ControllerOptions::default()
        },
    );
    let controller = forms.get(request.kind);
    request
        .apply(controller)
        .await
        .context("failed to fill report form")?;

    let watcher = spawn_progress_watcher(controller.subscribe());
    let submission = controller.submit().await;
    if let Err(err) = join_progress_watcher(watcher).await {
        warn!(error = %format!("{err:#}"), "progress output stopped early");
    }
    let snapshot = submission.snapshot;

    if request.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(request.kind, &snapshot, &settings.base_url));
    }

    if snapshot.phase != Phase::Succeeded {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(path) = request.download.as_ref() {
        let bytes = controller
            .download_artifact()
            .await
            .context("failed to download report artifact")?;
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "report artifact saved");
        eprintln!("Saved report to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

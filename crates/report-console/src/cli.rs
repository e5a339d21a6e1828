use clap::{Parser, Subcommand};
use report_protocol::ModelType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "report-console",
    version,
    about = "Submit report generation forms to the report service"
)]
pub(crate) struct Args {
    /// TOML config; defaults to config/report-console.toml when present.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// GitHub repository activity report.
    Github {
        #[arg(long)]
        repo: Option<String>,
        #[arg(long)]
        days: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Hacker News topic report for one hour of a day.
    HnTopic {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        hour: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Hacker News daily summary report.
    HnDaily {
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Bidder list report for a date range and keywords.
    BidderList {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// List the report forms, their endpoints and fields.
    Forms,
}

#[derive(clap::Args, Debug, Default)]
pub(crate) struct FormArgs {
    #[arg(long)]
    pub(crate) model_type: Option<ModelType>,
    #[arg(long)]
    pub(crate) model_name: Option<String>,
    /// Override any form field, e.g. --set hour=7 (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub(crate) set: Vec<(String, String)>,
    /// Save the generated artifact to this path.
    #[arg(long)]
    pub(crate) download: Option<PathBuf>,
    /// Print the final form state as JSON.
    #[arg(long, default_value_t = false)]
    pub(crate) json: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

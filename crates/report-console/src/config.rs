use anyhow::Context;
use report_client::http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use report_client::DEFAULT_FAILURE_MESSAGE;
use report_protocol::ModelType;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "config/report-console.toml";
pub(crate) const BASE_URL_ENV: &str = "REPORT_CONSOLE_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConsoleConfig {
    pub(crate) base_url: Option<String>,
    pub(crate) connect_timeout: Option<String>,
    pub(crate) request_timeout: Option<String>,
    pub(crate) fallback_error_message: Option<String>,
    pub(crate) model: Option<ModelDefaults>,
    pub(crate) logging: Option<LoggingConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ModelDefaults {
    pub(crate) model_type: Option<ModelType>,
    pub(crate) model_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggingConfig {
    pub(crate) dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) base_url: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) fallback_message: String,
    pub(crate) model_type: Option<ModelType>,
    pub(crate) model_name: Option<String>,
    pub(crate) log_dir: PathBuf,
}

/// Reads the config file. Only the default path may be absent.
pub(crate) fn load_console_config(path: Option<&Path>) -> anyhow::Result<ConsoleConfig> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    if !required && !path.exists() {
        return Ok(ConsoleConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_console_config(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

pub(crate) fn parse_console_config(raw: &str) -> anyhow::Result<ConsoleConfig> {
    Ok(toml::from_str(raw)?)
}

/// Merges flag, environment, file and built-in values, in that order of precedence.
pub(crate) fn resolve_settings(
    config: ConsoleConfig,
    base_url_flag: Option<String>,
    base_url_env: Option<String>,
) -> anyhow::Result<Settings> {
    let base_url = base_url_flag
        .or(base_url_env)
        .or(config.base_url)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let connect_timeout = parse_timeout(
        "connect_timeout",
        config.connect_timeout.as_deref(),
        DEFAULT_CONNECT_TIMEOUT,
    )?;
    let request_timeout = parse_timeout(
        "request_timeout",
        config.request_timeout.as_deref(),
        DEFAULT_REQUEST_TIMEOUT,
    )?;
    let fallback_message = match config.fallback_error_message {
        Some(message) if message.trim().is_empty() => {
            anyhow::bail!("fallback_error_message cannot be empty")
        }
        Some(message) => message,
        None => DEFAULT_FAILURE_MESSAGE.to_string(),
    };
    let model = config.model.unwrap_or_default();
    let log_dir = config
        .logging
        .and_then(|logging| logging.dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

    Ok(Settings {
        base_url,
        connect_timeout,
        request_timeout,
        fallback_message,
        model_type: model.model_type,
        model_name: model.model_name,
        log_dir,
    })
}

fn parse_timeout(name: &str, raw: Option<&str>, default: Duration) -> anyhow::Result<Duration> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = humantime::parse_duration(raw.trim())
        .with_context(|| format!("{name} must be a duration like \"30s\", got {raw:?}"))?;
    if value.is_zero() {
        anyhow::bail!("{name} must be greater than zero");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings =
            resolve_settings(ConsoleConfig::default(), None, None).expect("settings");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(settings.fallback_message, DEFAULT_FAILURE_MESSAGE);
        assert_eq!(settings.model_type, None);
        assert_eq!(settings.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn parses_full_config() {
        let config = parse_console_config(
            r#"
base_url = "http://reports.internal:5000"
connect_timeout = "2s"
request_timeout = "15m"
fallback_error_message = "report failed"

[model]
model_type = "ollama"
model_name = "llama3"

[logging]
dir = "/var/log/report-console"
"#,
        )
        .expect("parse");
        let settings = resolve_settings(config, None, None).expect("settings");
        assert_eq!(settings.base_url, "http://reports.internal:5000");
        assert_eq!(settings.connect_timeout, Duration::from_secs(2));
        assert_eq!(settings.request_timeout, Duration::from_secs(15 * 60));
        assert_eq!(settings.fallback_message, "report failed");
        assert_eq!(settings.model_type, Some(ModelType::Ollama));
        assert_eq!(settings.model_name.as_deref(), Some("llama3"));
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/report-console"));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = || ConsoleConfig {
            base_url: Some("http://file".to_string()),
            ..ConsoleConfig::default()
        };
        let from_flag = resolve_settings(
            file(),
            Some("http://flag".to_string()),
            Some("http://env".to_string()),
        )
        .expect("settings");
        assert_eq!(from_flag.base_url, "http://flag");

        let from_env =
            resolve_settings(file(), None, Some("http://env".to_string())).expect("settings");
        assert_eq!(from_env.base_url, "http://env");

        let from_file = resolve_settings(file(), None, None).expect("settings");
        assert_eq!(from_file.base_url, "http://file");
    }

    #[test]
    fn rejects_invalid_model_type() {
        let err = parse_console_config("[model]\nmodel_type = \"gemini\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn rejects_bad_durations() {
        let config = parse_console_config("request_timeout = \"soon\"\n").expect("parse");
        let err = resolve_settings(config, None, None).unwrap_err();
        assert!(err.to_string().contains("request_timeout"));

        let config = parse_console_config("connect_timeout = \"0s\"\n").expect("parse");
        let err = resolve_settings(config, None, None).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_console_config(Some(Path::new("/nonexistent/report-console.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}

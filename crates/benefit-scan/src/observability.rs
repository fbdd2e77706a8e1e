//! Logging setup: human-readable stderr output plus optional JSONL file logs.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_PATH_ENV: &str = "BENEFIT_SCAN_LOG_PATH";
const LOG_DIR_ENV: &str = "BENEFIT_SCAN_LOG_DIR";
const LOG_FILE_NAME: &str = "benefit-scan.jsonl";

/// Where JSONL logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory for the log file.
    pub log_dir: Option<PathBuf>,
    /// File name inside `log_dir`.
    pub file_name: String,
}

impl ObservabilityConfig {
    /// Resolve the log destination.
    ///
    /// `BENEFIT_SCAN_LOG_PATH` names the file directly and wins over
    /// `BENEFIT_SCAN_LOG_DIR`, which wins over the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = log_path
            && let Some(name) = path.file_name()
        {
            return Self {
                log_dir: Some(
                    path.parent()
                        .map_or_else(|| PathBuf::from("."), PathBuf::from),
                ),
                file_name: name.to_string_lossy().into_owned(),
            };
        }
        Self {
            log_dir: env_dir.or(config_dir),
            file_name: LOG_FILE_NAME.to_string(),
        }
    }
}

/// Build the log filter from CLI flags.
///
/// `--quiet` keeps errors only, `-v` enables debug and `-vv` trace. Without
/// flags `RUST_LOG` applies, then the configured default level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        }
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber.
///
/// Returns the guard that flushes the file writer; keep it alive until exit.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_wins() {
        let config = ObservabilityConfig::resolve(
            Some(PathBuf::from("/var/log/scan.jsonl")),
            Some(PathBuf::from("/env")),
            Some(PathBuf::from("/cfg")),
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log")));
        assert_eq!(config.file_name, "scan.jsonl");
    }

    #[test]
    fn env_dir_wins_over_config() {
        let config = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/env")),
            Some(PathBuf::from("/cfg")),
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/env")));
        assert_eq!(config.file_name, LOG_FILE_NAME);
    }

    #[test]
    fn no_dir_means_no_file_logging() {
        let config = ObservabilityConfig::resolve(None, None, None);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn filter_levels() {
        assert_eq!(env_filter(true, 2, "info").to_string(), "error");
        assert_eq!(env_filter(false, 1, "info").to_string(), "debug");
        assert_eq!(env_filter(false, 3, "info").to_string(), "trace");
    }
}

//! Info command implementation

use benefit_scan_core::config::{Config, ConfigSources};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taxonomy: Option<String>,
    stemmer: &'static str,
    report_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_limit: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            taxonomy: config.taxonomy_path(sources).map(|p| p.to_string()),
            stemmer: config.stemmer.unwrap_or_default().as_str(),
            report_name: config.report_name().to_string(),
            input_limit: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Scanning".bold().underline());
    print_opt("Taxonomy", &cfg.taxonomy);
    println!("{}: {}", "Stemmer".dimmed(), cfg.stemmer);
    println!("{}: {}", "Report name".dimmed(), cfg.report_name);
    match cfg.input_limit {
        Some(limit) => println!("{}: {limit} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefit_scan_core::DEFAULT_MAX_INPUT_BYTES;
    use benefit_scan_core::stem::StemmerKind;
    use camino::Utf8PathBuf;

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(
            cmd_info(
                InfoArgs::default(),
                false,
                &Config::default(),
                &ConfigSources::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(
            cmd_info(
                InfoArgs::default(),
                true,
                &Config::default(),
                &ConfigSources::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_config_info_defaults() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert!(info.taxonomy.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.stemmer, "russian");
        assert_eq!(info.report_name, "report.docx");
        assert_eq!(info.input_limit, Some(DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn test_config_info_reflects_overrides() {
        let config = Config {
            taxonomy: Some(Utf8PathBuf::from("/etc/benefits.json")),
            stemmer: Some(StemmerKind::None),
            disable_input_limit: true,
            ..Config::default()
        };
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert_eq!(info.taxonomy.as_deref(), Some("/etc/benefits.json"));
        assert_eq!(info.stemmer, "none");
        assert!(info.input_limit.is_none());
    }
}

//! Command implementations.

pub mod info;
pub mod scan;
pub mod schema;
pub mod taxonomy;

use anyhow::bail;
use benefit_scan_core::config::{Config, ConfigSources};
use camino::Utf8PathBuf;

/// Pick the taxonomy file: the command-line flag wins over configuration.
pub fn resolve_taxonomy(
    flag: Option<Utf8PathBuf>,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<Utf8PathBuf> {
    match flag.or_else(|| config.taxonomy_path(sources)) {
        Some(path) => Ok(path),
        None => bail!("no taxonomy file given; pass --taxonomy or set `taxonomy` in the config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_config() {
        let config = Config {
            taxonomy: Some(Utf8PathBuf::from("/cfg/benefits.json")),
            ..Config::default()
        };
        let path = resolve_taxonomy(
            Some(Utf8PathBuf::from("/flag/benefits.json")),
            &config,
            &ConfigSources::default(),
        )
        .unwrap();
        assert_eq!(path, "/flag/benefits.json");
    }

    #[test]
    fn falls_back_to_config() {
        let config = Config {
            taxonomy: Some(Utf8PathBuf::from("/cfg/benefits.json")),
            ..Config::default()
        };
        let path = resolve_taxonomy(None, &config, &ConfigSources::default()).unwrap();
        assert_eq!(path, "/cfg/benefits.json");
    }

    #[test]
    fn missing_everywhere_is_an_error() {
        let result = resolve_taxonomy(None, &Config::default(), &ConfigSources::default());
        assert!(result.is_err());
    }
}

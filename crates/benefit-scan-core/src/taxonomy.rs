//! Benefit taxonomy loading and validation.
//!
//! A taxonomy file names the section delimiter and groups benefit terms into
//! categories:
//!
//! ```json
//! {
//!   "block_keyword": "Коллективный договор",
//!   "benefits": {
//!     "Отпуск": ["отпуск", "дополнительный отпуск"],
//!     "Выплаты": ["материальная помощь"]
//!   }
//! }
//! ```
//!
//! JSON, TOML and YAML are accepted (chosen by extension, JSON otherwise).
//! Terms are matched case-insensitively, so they are lowercased on load.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::notify::Notifier;

/// Categories of benefit terms.
///
/// Every category holds at least one non-blank, lowercase term. Categories
/// iterate in sorted order. An empty taxonomy is valid and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    categories: BTreeMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Build a taxonomy from raw category → term lists.
    ///
    /// Terms are lowercased. Returns a description of the first violation
    /// when a category is empty or a term is blank.
    pub fn try_from_map(raw: BTreeMap<String, Vec<String>>) -> Result<Self, String> {
        let mut categories = BTreeMap::new();
        for (category, terms) in raw {
            if terms.is_empty() {
                return Err(format!("category '{category}' has no terms"));
            }
            let mut normalized = Vec::with_capacity(terms.len());
            for term in terms {
                if term.trim().is_empty() {
                    return Err(format!("category '{category}' contains a blank term"));
                }
                normalized.push(term.to_lowercase());
            }
            categories.insert(category, normalized);
        }
        Ok(Self { categories })
    }

    /// Iterate over `(category, terms)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, terms)| (category.as_str(), terms.as_slice()))
    }

    /// Terms of one category, if it exists.
    pub fn terms(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the taxonomy has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of terms across all categories.
    pub fn term_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// A loaded taxonomy together with its block delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomySource {
    /// Categories of benefit terms.
    pub taxonomy: Taxonomy,
    /// Section marker that separates sub-documents.
    pub delimiter: String,
}

/// On-disk shape of a taxonomy file.
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    block_keyword: String,
    benefits: BTreeMap<String, Vec<String>>,
}

/// Load and validate a taxonomy file.
///
/// Fails when the file is missing, malformed, lacks `block_keyword` or
/// `benefits`, when `benefits` is not a mapping of string lists, when the
/// delimiter is empty, or when a category is empty.
#[tracing::instrument(fields(path = %path))]
pub fn try_load_taxonomy(path: &Utf8Path) -> ConfigResult<TaxonomySource> {
    if !path.is_file() {
        return Err(ConfigError::TaxonomyNotFound(path.to_path_buf()));
    }

    let figment = match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("toml") => Figment::from(Toml::file_exact(path.as_str())),
        Some("yaml" | "yml") => Figment::from(Yaml::file_exact(path.as_str())),
        _ => Figment::from(Json::file_exact(path.as_str())),
    };
    let file: TaxonomyFile = figment
        .extract()
        .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;

    if file.block_keyword.is_empty() {
        return Err(invalid(path, "'block_keyword' must not be empty"));
    }
    let taxonomy = Taxonomy::try_from_map(file.benefits).map_err(|reason| invalid(path, reason))?;

    tracing::debug!(
        categories = taxonomy.len(),
        terms = taxonomy.term_count(),
        delimiter = %file.block_keyword,
        "taxonomy loaded"
    );
    Ok(TaxonomySource {
        taxonomy,
        delimiter: file.block_keyword,
    })
}

/// Load a taxonomy, falling back to an empty one on any failure.
///
/// A failure is reported to `sink` as a single warning and yields
/// `(Taxonomy::default(), "")`, so analysis still runs and finds nothing.
pub fn load_taxonomy(path: &Utf8Path, sink: &dyn Notifier) -> (Taxonomy, String) {
    match try_load_taxonomy(path) {
        Ok(source) => (source.taxonomy, source.delimiter),
        Err(err) => {
            sink.warn(&format!("failed to load taxonomy: {err}"));
            (Taxonomy::default(), String::new())
        }
    }
}

fn invalid(path: &Utf8Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidTaxonomy {
        path: Utf8PathBuf::from(path),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{CollectingNotifier, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn loads_json_taxonomy() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.json",
            r#"{
                "block_keyword": "Коллективный договор",
                "benefits": {
                    "Отпуск": ["Отпуск", "дополнительный отпуск"],
                    "Выплаты": ["материальная помощь"]
                }
            }"#,
        );

        let source = try_load_taxonomy(&path).unwrap();
        assert_eq!(source.delimiter, "Коллективный договор");
        assert_eq!(source.taxonomy.len(), 2);
        assert_eq!(source.taxonomy.term_count(), 3);
        assert_eq!(
            source.taxonomy.terms("Отпуск").unwrap(),
            ["отпуск", "дополнительный отпуск"]
        );
    }

    #[test]
    fn loads_yaml_taxonomy() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.yaml",
            "block_keyword: Section\nbenefits:\n  Health:\n    - dental\n    - vision\n",
        );

        let source = try_load_taxonomy(&path).unwrap();
        assert_eq!(source.delimiter, "Section");
        assert_eq!(source.taxonomy.terms("Health").unwrap(), ["dental", "vision"]);
    }

    #[test]
    fn loads_toml_taxonomy() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.toml",
            "block_keyword = \"Section\"\n[benefits]\nHealth = [\"dental\"]\n",
        );

        let source = try_load_taxonomy(&path).unwrap();
        assert_eq!(source.taxonomy.terms("Health").unwrap(), ["dental"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = try_load_taxonomy(Utf8Path::new("/nonexistent/benefits.json"));
        assert!(matches!(result, Err(ConfigError::TaxonomyNotFound(_))));
    }

    #[test]
    fn malformed_json_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "benefits.json", "{ not json");
        assert!(matches!(
            try_load_taxonomy(&path),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn missing_delimiter_key_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "benefits.json", r#"{"benefits": {"A": ["x"]}}"#);
        assert!(try_load_taxonomy(&path).is_err());
    }

    #[test]
    fn missing_benefits_key_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "benefits.json", r#"{"block_keyword": "X"}"#);
        assert!(try_load_taxonomy(&path).is_err());
    }

    #[test]
    fn benefits_must_be_mapping_of_sequences() {
        let tmp = TempDir::new().unwrap();
        let list = write(
            &tmp,
            "list.json",
            r#"{"block_keyword": "X", "benefits": ["a", "b"]}"#,
        );
        let scalar = write(
            &tmp,
            "scalar.json",
            r#"{"block_keyword": "X", "benefits": {"A": "a"}}"#,
        );
        assert!(try_load_taxonomy(&list).is_err());
        assert!(try_load_taxonomy(&scalar).is_err());
    }

    #[test]
    fn empty_delimiter_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.json",
            r#"{"block_keyword": "", "benefits": {"A": ["x"]}}"#,
        );
        assert!(matches!(
            try_load_taxonomy(&path),
            Err(ConfigError::InvalidTaxonomy { .. })
        ));
    }

    #[test]
    fn empty_category_and_blank_term_are_invalid() {
        let mut raw = BTreeMap::new();
        raw.insert("A".to_string(), Vec::new());
        assert!(Taxonomy::try_from_map(raw).is_err());

        let mut raw = BTreeMap::new();
        raw.insert("A".to_string(), vec!["ok".to_string(), "  ".to_string()]);
        assert!(Taxonomy::try_from_map(raw).is_err());
    }

    #[test]
    fn empty_benefits_map_is_valid() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.json",
            r#"{"block_keyword": "X", "benefits": {}}"#,
        );
        let source = try_load_taxonomy(&path).unwrap();
        assert!(source.taxonomy.is_empty());
    }

    #[test]
    fn load_taxonomy_recovers_with_one_warning() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "benefits.json", "[1, 2, 3]");
        let sink = CollectingNotifier::new();

        let (taxonomy, delimiter) = load_taxonomy(&path, &sink);

        assert!(taxonomy.is_empty());
        assert!(delimiter.is_empty());
        let notes = sink.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[test]
    fn load_taxonomy_success_is_silent() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "benefits.json",
            r#"{"block_keyword": "X", "benefits": {"A": ["x"]}}"#,
        );
        let sink = CollectingNotifier::new();
        let (taxonomy, delimiter) = load_taxonomy(&path, &sink);
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(delimiter, "X");
        assert!(sink.notifications().is_empty());
    }
}

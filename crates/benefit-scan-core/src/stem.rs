//! Stemming for inflected term matching.
//!
//! The matcher only needs `token -> stem`, so the Snowball implementation
//! sits behind the [`Stemmer`] trait and tests can swap in a stub.

use std::collections::BTreeMap;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// Reduces a word to its stem.
pub trait Stemmer {
    /// Stem one lowercase token.
    fn stem(&self, token: &str) -> String;
}

/// Snowball stemmer for Russian.
pub struct RussianStemmer {
    inner: rust_stemmers::Stemmer,
}

impl RussianStemmer {
    /// Create the stemmer.
    pub fn new() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(Algorithm::Russian),
        }
    }
}

impl Default for RussianStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RussianStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RussianStemmer").finish_non_exhaustive()
    }
}

impl Stemmer for RussianStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Returns every token unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Which stemmer to use for the stem pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StemmerKind {
    /// Snowball Russian.
    #[default]
    Russian,
    /// No stemming; the stem pass only matches exact tokens.
    None,
}

impl StemmerKind {
    /// Returns the kind as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Russian => "russian",
            Self::None => "none",
        }
    }

    /// Instantiate the stemmer.
    pub fn build(self) -> Box<dyn Stemmer> {
        match self {
            Self::Russian => Box::new(RussianStemmer::new()),
            Self::None => Box::new(IdentityStemmer),
        }
    }
}

/// Taxonomy terms after stemming, keyed by the same categories.
///
/// Built once per analysis run rather than once per block. Each term is
/// stemmed whole, so multi-word phrases keep their inner spaces and only
/// ever match through the literal pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemmedTaxonomy {
    categories: BTreeMap<String, Vec<String>>,
}

impl StemmedTaxonomy {
    /// Stem every term of `taxonomy`.
    pub fn build(taxonomy: &Taxonomy, stemmer: &dyn Stemmer) -> Self {
        let categories = taxonomy
            .iter()
            .map(|(category, terms)| {
                let stems = terms.iter().map(|term| stemmer.stem(term)).collect();
                (category.to_string(), stems)
            })
            .collect();
        Self { categories }
    }

    /// Iterate over `(category, stemmed terms)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, stems)| (category.as_str(), stems.as_slice()))
    }

    /// Stemmed terms of one category, if it exists.
    pub fn stems(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy(pairs: &[(&str, &[&str])]) -> Taxonomy {
        let raw = pairs
            .iter()
            .map(|(c, terms)| (c.to_string(), terms.iter().map(|t| t.to_string()).collect()))
            .collect();
        Taxonomy::try_from_map(raw).unwrap()
    }

    #[test]
    fn russian_stemmer_strips_noun_endings() {
        let stemmer = RussianStemmer::new();
        assert_eq!(stemmer.stem("отпуска"), "отпуск");
        assert_eq!(stemmer.stem("льготы"), "льгот");
        assert_eq!(stemmer.stem("льгота"), "льгот");
    }

    #[test]
    fn russian_stemmer_keeps_bare_stems() {
        let stemmer = RussianStemmer::new();
        assert_eq!(stemmer.stem("отпуск"), "отпуск");
    }

    #[test]
    fn russian_stemmer_is_consistent() {
        let stemmer = RussianStemmer::new();
        assert_eq!(stemmer.stem("компенсации"), stemmer.stem("компенсации"));
    }

    #[test]
    fn identity_stemmer_is_noop() {
        assert_eq!(IdentityStemmer.stem("отпуска"), "отпуска");
    }

    #[test]
    fn stemmer_kind_builds_matching_stemmer() {
        assert_eq!(StemmerKind::Russian.build().stem("отпуска"), "отпуск");
        assert_eq!(StemmerKind::None.build().stem("отпуска"), "отпуска");
        assert_eq!(StemmerKind::default(), StemmerKind::Russian);
    }

    #[test]
    fn stemmer_kind_deserializes_lowercase() {
        let kind: StemmerKind = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(kind, StemmerKind::None);
        assert_eq!(kind.as_str(), "none");
    }

    #[test]
    fn stemmed_taxonomy_mirrors_categories() {
        let tax = taxonomy(&[("Отпуск", &["отпуска", "отпуск"]), ("Спорт", &["льготы"])]);
        let stemmed = StemmedTaxonomy::build(&tax, &RussianStemmer::new());

        assert_eq!(stemmed.stems("Отпуск").unwrap(), ["отпуск", "отпуск"]);
        assert_eq!(stemmed.stems("Спорт").unwrap(), ["льгот"]);
        assert_eq!(stemmed.iter().count(), 2);
    }

    #[test]
    fn stemmed_taxonomy_of_empty_is_empty() {
        let stemmed = StemmedTaxonomy::build(&Taxonomy::default(), &IdentityStemmer);
        assert_eq!(stemmed.iter().count(), 0);
    }
}

//! The analysis pipeline: segment → match → build.
//!
//! An [`Analyzer`] owns one taxonomy and its precomputed stems, then runs any
//! number of documents against them. Each run returns a fresh [`Analysis`];
//! runs over several documents combine with [`Analysis::merge`].

use camino::Utf8Path;

use crate::document;
use crate::matcher::{self, BenefitCount};
use crate::notify::Notifier;
use crate::report::{self, Report};
use crate::segment;
use crate::stem::{StemmedTaxonomy, Stemmer};
use crate::taxonomy::{self, Taxonomy};

/// Label used for the block-count heading when the delimiter is empty.
pub const FALLBACK_LABEL: &str = "Blocks";

/// Result of analyzing one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Number of blocks found.
    pub block_count: usize,
    /// Per-term counts.
    pub counts: BenefitCount,
}

impl Analysis {
    /// Group the counts into a [`Report`].
    pub fn report(&self) -> Report {
        report::build_report(self.block_count, &self.counts)
    }

    /// Fold another run into this one by summation.
    pub fn merge(&mut self, other: Self) {
        self.block_count += other.block_count;
        self.counts.merge(other.counts);
    }
}

/// A taxonomy prepared for matching.
#[derive(Debug, Clone)]
pub struct Analyzer {
    taxonomy: Taxonomy,
    stemmed: StemmedTaxonomy,
    delimiter: String,
}

impl Analyzer {
    /// Prepare `taxonomy`, stemming every term once.
    pub fn new(taxonomy: Taxonomy, delimiter: impl Into<String>, stemmer: &dyn Stemmer) -> Self {
        let stemmed = StemmedTaxonomy::build(&taxonomy, stemmer);
        Self {
            taxonomy,
            stemmed,
            delimiter: delimiter.into(),
        }
    }

    /// Load a taxonomy file, degrading to an empty taxonomy on failure.
    ///
    /// See [`taxonomy::load_taxonomy`] for the failure contract.
    pub fn from_taxonomy_file(path: &Utf8Path, stemmer: &dyn Stemmer, sink: &dyn Notifier) -> Self {
        let (taxonomy, delimiter) = taxonomy::load_taxonomy(path, sink);
        Self::new(taxonomy, delimiter, stemmer)
    }

    /// The literal taxonomy.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// The precomputed stems.
    pub fn stemmed(&self) -> &StemmedTaxonomy {
        &self.stemmed
    }

    /// The block delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Heading label for the block count in rendered reports.
    pub fn label(&self) -> &str {
        if self.delimiter.is_empty() {
            FALLBACK_LABEL
        } else {
            &self.delimiter
        }
    }

    /// Analyze document text.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn analyze(&self, text: &str) -> Analysis {
        let segmentation = segment::segment(text, &self.delimiter);
        let counts = matcher::match_blocks(segmentation.blocks(), &self.taxonomy, &self.stemmed);
        tracing::debug!(blocks = segmentation.block_count(), "text analyzed");
        Analysis {
            block_count: segmentation.block_count(),
            counts,
        }
    }

    /// Read and analyze a source document.
    ///
    /// An unreadable document is reported to `sink` and analyzed as empty
    /// text, giving zero blocks.
    pub fn analyze_document(
        &self,
        path: &Utf8Path,
        max_bytes: Option<usize>,
        sink: &dyn Notifier,
    ) -> Analysis {
        let text = document::load_source_text(path, max_bytes, sink);
        self.analyze(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{CollectingNotifier, Severity};
    use crate::stem::{IdentityStemmer, RussianStemmer};
    use camino::Utf8PathBuf;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    const MARKER: &str = "Коллективный договор";

    fn analyzer(pairs: &[(&str, &[&str])]) -> Analyzer {
        let raw: BTreeMap<String, Vec<String>> = pairs
            .iter()
            .map(|(c, terms)| (c.to_string(), terms.iter().map(|t| t.to_string()).collect()))
            .collect();
        Analyzer::new(
            Taxonomy::try_from_map(raw).unwrap(),
            MARKER,
            &RussianStemmer::new(),
        )
    }

    #[test]
    fn scenario_two_blocks_one_match() {
        let analysis = analyzer(&[("Cat1", &["льгота a"])]).analyze(
            "intro text. Коллективный договор льгота A льгота A. Коллективный договор льгота B.",
        );
        assert_eq!(analysis.block_count, 2);
        assert_eq!(analysis.counts.get("Cat1", "льгота a"), 1);

        let report = analysis.report();
        assert_eq!(report.block_count, 2);
        assert_eq!(report.categories.len(), 1);
    }

    #[test]
    fn empty_taxonomy_reports_blocks_only() {
        let analyzer = Analyzer::new(Taxonomy::default(), MARKER, &IdentityStemmer);
        let analysis = analyzer.analyze("a Коллективный договор b Коллективный договор c");
        let report = analysis.report();
        assert_eq!(report.block_count, 2);
        assert!(report.is_empty());
    }

    #[test]
    fn missing_document_yields_empty_analysis_and_one_warning() {
        let sink = CollectingNotifier::new();
        let analysis = analyzer(&[("Отпуск", &["отпуск"])]).analyze_document(
            Utf8Path::new("/nonexistent/agreement.docx"),
            None,
            &sink,
        );

        assert_eq!(analysis.block_count, 0);
        assert!(analysis.report().is_empty());
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn malformed_taxonomy_yields_empty_analysis_and_one_warning() {
        let tmp = TempDir::new().unwrap();
        let tax_path = Utf8PathBuf::try_from(tmp.path().join("benefits.json")).unwrap();
        fs::write(&tax_path, r#"{"benefits": "nope"}"#).unwrap();
        let sink = CollectingNotifier::new();

        let analyzer = Analyzer::from_taxonomy_file(&tax_path, &RussianStemmer::new(), &sink);
        let analysis = analyzer.analyze("intro Коллективный договор отпуск");

        assert!(analyzer.taxonomy().is_empty());
        assert_eq!(analyzer.delimiter(), "");
        assert_eq!(analyzer.label(), FALLBACK_LABEL);
        assert_eq!(analysis.block_count, 0);
        assert!(analysis.report().is_empty());
        let notes = sink.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[test]
    fn merged_runs_sum_blocks_and_counts() {
        let analyzer = analyzer(&[("Отпуск", &["отпуск"])]);
        let mut total = analyzer.analyze("x Коллективный договор отпуск");
        total.merge(analyzer.analyze(
            "y Коллективный договор отпуск Коллективный договор нет",
        ));

        assert_eq!(total.block_count, 3);
        assert_eq!(total.counts.get("Отпуск", "отпуск"), 2);
    }

    #[test]
    fn label_is_delimiter() {
        assert_eq!(analyzer(&[]).label(), MARKER);
    }
}

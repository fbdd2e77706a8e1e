//! Report building.
//!
//! Groups matcher output by category. The resulting [`Report`] serializes to
//! JSON for scripting and flattens into headings and paragraphs via
//! [`Report::outline`] for the `.docx` writer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::matcher::BenefitCount;

/// Summary of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// Number of blocks (sub-documents) found.
    pub block_count: usize,
    /// Categories with at least one match, sorted by name.
    pub categories: Vec<CategoryTally>,
}

/// Matches within one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryTally {
    /// Category name.
    pub category: String,
    /// Matched terms, sorted by term.
    pub benefits: Vec<BenefitTally>,
}

/// One term and the number of blocks it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BenefitTally {
    /// Matched term (stemmed form for stem-pass hits).
    pub term: String,
    /// Number of blocks containing the term.
    pub count: usize,
}

/// A heading with the paragraphs under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Heading text.
    pub heading: String,
    /// Body paragraphs.
    pub paragraphs: Vec<String>,
}

impl Report {
    /// Number of distinct matched terms across all categories.
    pub fn term_count(&self) -> usize {
        self.categories.iter().map(|c| c.benefits.len()).sum()
    }

    /// Whether no category matched.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Heading/paragraph structure for rendering.
    ///
    /// The first section is `"{label}: {block_count}"` with no body; each
    /// category follows as a heading with one `"{term}: {count}"` paragraph
    /// per term.
    pub fn outline(&self, label: &str) -> Vec<ReportSection> {
        let mut sections = Vec::with_capacity(self.categories.len() + 1);
        sections.push(ReportSection {
            heading: format!("{label}: {}", self.block_count),
            paragraphs: Vec::new(),
        });
        for tally in &self.categories {
            sections.push(ReportSection {
                heading: tally.category.clone(),
                paragraphs: tally
                    .benefits
                    .iter()
                    .map(|b| format!("{}: {}", b.term, b.count))
                    .collect(),
            });
        }
        sections
    }
}

/// JSON Schema describing a serialized [`Report`].
pub fn report_schema() -> serde_json::Value {
    schemars::schema_for!(Report).to_value()
}

/// Group `counts` by category.
///
/// Categories without matches do not appear. `block_count` is carried even
/// when nothing matched.
pub fn build_report(block_count: usize, counts: &BenefitCount) -> Report {
    let mut categories: Vec<CategoryTally> = Vec::new();
    // Keys iterate sorted by (category, term), so groups are contiguous.
    for (key, count) in counts.iter() {
        let tally = BenefitTally {
            term: key.term.clone(),
            count,
        };
        match categories.last_mut() {
            Some(last) if last.category == key.category => last.benefits.push(tally),
            _ => categories.push(CategoryTally {
                category: key.category.clone(),
                benefits: vec![tally],
            }),
        }
    }
    Report {
        block_count,
        categories,
    }
}

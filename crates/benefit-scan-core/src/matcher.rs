//! Benefit matching.
//!
//! Each block is scanned twice against the taxonomy:
//!
//! 1. **Literal pass**: the lowercased block contains the term as a
//!    substring (no word-boundary anchoring, so multi-word phrases work).
//! 2. **Stem pass**: a stemmed term equals one of the block's tokens.
//!
//! A per-block guard keyed on `(category, term)` is shared by both passes, so
//! a term scores at most once per block however often it occurs, and a
//! literal hit is never counted again by the stem pass. Blocks are
//! independent: a count is the number of blocks a term was found in and can
//! never exceed the block count.

use std::collections::{BTreeMap, HashSet};

use crate::stem::StemmedTaxonomy;
use crate::taxonomy::Taxonomy;
use crate::text;

/// Identifies one counted term.
///
/// For stem-pass hits `term` is the stemmed form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BenefitKey {
    /// Taxonomy category.
    pub category: String,
    /// Matched term.
    pub term: String,
}

/// Occurrence counts keyed by `(category, term)`.
///
/// Returned by value from the matcher. Partial results combine with
/// [`merge`](Self::merge) or by summing an iterator, which is how per-block
/// results roll up into a document total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenefitCount {
    counts: BTreeMap<BenefitKey, usize>,
}

impl BenefitCount {
    /// Create an empty count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one `(category, term)` pair; zero when never matched.
    pub fn get(&self, category: &str, term: &str) -> usize {
        // BTreeMap lookups need an owned key of the same type.
        let key = BenefitKey {
            category: category.to_string(),
            term: term.to_string(),
        };
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Iterate over all non-zero entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BenefitKey, usize)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Number of distinct `(category, term)` pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was matched.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    fn increment(&mut self, category: &str, term: &str) {
        let key = BenefitKey {
            category: category.to_string(),
            term: term.to_string(),
        };
        *self.counts.entry(key).or_insert(0) += 1;
    }
}

impl std::iter::Sum for BenefitCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |mut acc, partial| {
            acc.merge(partial);
            acc
        })
    }
}

/// Count the terms present in a single block.
pub fn match_block(block: &str, taxonomy: &Taxonomy, stemmed: &StemmedTaxonomy) -> BenefitCount {
    let mut counts = BenefitCount::new();
    if block.is_empty() {
        return counts;
    }

    let mut credited: HashSet<(&str, &str)> = HashSet::new();

    let lower = block.to_lowercase();
    for (category, terms) in taxonomy.iter() {
        for term in terms {
            if lower.contains(term.as_str()) && credited.insert((category, term.as_str())) {
                counts.increment(category, term);
            }
        }
    }

    let tokens = text::tokenize(block);
    let tokens: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    for (category, stems) in stemmed.iter() {
        for stem in stems {
            if tokens.contains(stem.as_str()) && credited.insert((category, stem.as_str())) {
                counts.increment(category, stem);
            }
        }
    }

    counts
}

/// Count terms across all blocks.
///
/// Equivalent to summing [`match_block`] over every block.
#[tracing::instrument(skip_all, fields(blocks = blocks.len(), categories = taxonomy.len()))]
pub fn match_blocks(
    blocks: &[&str],
    taxonomy: &Taxonomy,
    stemmed: &StemmedTaxonomy,
) -> BenefitCount {
    let counts: BenefitCount = blocks
        .iter()
        .map(|block| match_block(block, taxonomy, stemmed))
        .sum();
    tracing::debug!(
        distinct = counts.len(),
        total = counts.total(),
        "blocks matched"
    );
    counts
}

//! Block segmentation.
//!
//! A source document concatenates several sub-documents, each introduced by
//! the same marker phrase. Everything before the first marker is front matter
//! and is dropped.

/// The blocks found in one document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation<'a> {
    blocks: Vec<&'a str>,
}

impl<'a> Segmentation<'a> {
    /// The text following each delimiter occurrence.
    pub fn blocks(&self) -> &[&'a str] {
        &self.blocks
    }

    /// Number of delimiter occurrences (equal to the number of blocks).
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the delimiter never occurred.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Split `text` on every literal occurrence of `delimiter`.
///
/// The piece before the first occurrence is discarded. Zero blocks is a valid
/// outcome: it means the document has no sections. An empty delimiter never
/// splits.
pub fn segment<'a>(text: &'a str, delimiter: &str) -> Segmentation<'a> {
    if delimiter.is_empty() {
        return Segmentation::default();
    }
    let blocks = text.split(delimiter).skip(1).collect();
    Segmentation { blocks }
}

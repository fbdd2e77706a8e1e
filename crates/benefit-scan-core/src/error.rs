//! Error types for benefit-scan-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when loading configuration or a taxonomy.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// The taxonomy file does not exist or is not a regular file.
    #[error("taxonomy file not found: {0}")]
    TaxonomyNotFound(Utf8PathBuf),

    /// The taxonomy parsed but violates a structural rule.
    #[error("invalid taxonomy {path}: {reason}")]
    InvalidTaxonomy {
        /// Path of the offending taxonomy file.
        path: Utf8PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading a source document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source document does not exist.
    #[error("file not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The document could not be opened or parsed.
    #[error("cannot open {path}; check that the document is intact: {reason}")]
    Corrupt {
        /// Path of the document.
        path: Utf8PathBuf,
        /// Underlying reader message.
        reason: String,
    },

    /// The document has no paragraphs.
    #[error("document is empty: {0}")]
    Empty(Utf8PathBuf),

    /// The file extension is not a supported source format.
    #[error("unsupported document type: {0} (expected .docx or .txt)")]
    Unsupported(Utf8PathBuf),

    /// The document exceeds the configured input size limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Path of the document.
        path: Utf8PathBuf,
        /// Size reported by the filesystem.
        size: u64,
        /// Configured limit.
        limit: usize,
    },
}

/// Result type alias using [`DocumentError`].
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while writing a report.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The destination is locked or not writable (e.g. open in a word processor).
    #[error("cannot write '{0}': the file is open or not writable; close it and try again")]
    PermissionDenied(Utf8PathBuf),

    /// Any other I/O failure on the destination.
    #[error("failed to write report {path}: {source}")]
    Io {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document archive could not be assembled.
    #[error("failed to build report {path}: {reason}")]
    Pack {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying packer message.
        reason: String,
    },
}

/// Result type alias using [`WriteError`].
pub type WriteResult<T> = Result<T, WriteError>;

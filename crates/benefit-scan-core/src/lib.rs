//! Core library for benefit-scan.
//!
//! Counts employee-benefit terms across the sections of a document. The text
//! is split into blocks on a recurring marker phrase, every block is matched
//! against a taxonomy of benefit terms (literal phrase match plus stemmed
//! token match), and the per-block hits are summed into a [`Report`].
//!
//! # Modules
//!
//! - [`taxonomy`] - Taxonomy file loading and validation
//! - [`text`] - Tokenization
//! - [`stem`] - Stemmer capability and the Russian Snowball stemmer
//! - [`segment`] - Block segmentation
//! - [`matcher`] - Per-block deduplicated term counting
//! - [`report`] - Grouping counts into a report
//! - [`analyzer`] - The segment → match → build pipeline
//! - [`document`] - `.docx`/`.txt` reading and `.docx` report writing
//! - [`notify`] - Notification sink for warnings and info
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use benefit_scan_core::{Analyzer, RussianStemmer, TracingNotifier};
//! use camino::Utf8Path;
//!
//! let sink = TracingNotifier;
//! let analyzer = Analyzer::from_taxonomy_file(
//!     Utf8Path::new("benefits.json"),
//!     &RussianStemmer::new(),
//!     &sink,
//! );
//! let analysis = analyzer.analyze_document(Utf8Path::new("agreements.docx"), None, &sink);
//! println!("{} blocks", analysis.report().block_count);
//! ```
#![deny(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod matcher;
pub mod notify;
pub mod report;
pub mod segment;
pub mod stem;
pub mod taxonomy;
pub mod text;

pub use analyzer::{Analysis, Analyzer};
pub use config::{Config, ConfigLoader, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{ConfigError, ConfigResult, DocumentError, DocumentResult, WriteError, WriteResult};
pub use matcher::{BenefitCount, BenefitKey};
pub use notify::{CollectingNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use report::{Report, build_report, report_schema};
pub use stem::{RussianStemmer, Stemmer, StemmerKind};
pub use taxonomy::Taxonomy;

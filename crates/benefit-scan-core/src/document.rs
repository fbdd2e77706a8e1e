//! Source document reading and report writing.
//!
//! Sources are `.docx` (paragraph text, tables ignored) or `.txt` (one
//! paragraph per line). Paragraphs are joined with single spaces. Reports
//! are written as `.docx` with a level-1 heading per section.
//!
//! Both directions come in two forms: a typed `Result` ([`read_document`],
//! [`write_report`]) and a recovering form ([`load_source_text`],
//! [`deliver_report`]) that turns failures into notifications.

use std::fs::File;

use camino::{Utf8Path, Utf8PathBuf};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};

use crate::error::{DocumentError, DocumentResult, WriteError, WriteResult};
use crate::notify::Notifier;
use crate::report::Report;
use crate::text;

/// Style id used for report headings.
const HEADING_STYLE: &str = "Heading1";

/// Read the plain text of a source document.
///
/// `max_bytes` is checked against file metadata before anything is read.
#[tracing::instrument(skip(max_bytes), fields(path = %path))]
pub fn read_document(path: &Utf8Path, max_bytes: Option<usize>) -> DocumentResult<String> {
    let metadata = std::fs::metadata(path.as_std_path())
        .map_err(|_| DocumentError::NotFound(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    if let Some(limit) = max_bytes
        && metadata.len() > limit as u64
    {
        return Err(DocumentError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    let paragraphs = match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("docx") => docx_paragraphs(path)?,
        Some("txt") => text_paragraphs(path)?,
        _ => return Err(DocumentError::Unsupported(path.to_path_buf())),
    };
    if paragraphs.is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }

    tracing::debug!(paragraphs = paragraphs.len(), "document read");
    Ok(text::join_paragraphs(&paragraphs))
}

/// Read a source document, substituting empty text on failure.
///
/// A failure produces exactly one warning on `sink`. Empty text segments into
/// zero blocks, so the run completes with an empty report.
pub fn load_source_text(path: &Utf8Path, max_bytes: Option<usize>, sink: &dyn Notifier) -> String {
    match read_document(path, max_bytes) {
        Ok(text) => text,
        Err(err) => {
            sink.warn(&err.to_string());
            String::new()
        }
    }
}

fn docx_paragraphs(path: &Utf8Path) -> DocumentResult<Vec<String>> {
    let corrupt = |reason: String| DocumentError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path.as_std_path()).map_err(|e| corrupt(e.to_string()))?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| corrupt(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut line = String::new();
            collect_text(&p.children, &mut line);
            paragraphs.push(line);
        }
    }
    Ok(paragraphs)
}

/// Append the visible text of paragraph children, descending into hyperlinks.
fn collect_text(children: &[docx_rs::ParagraphChild], line: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => run_text(run, line),
            docx_rs::ParagraphChild::Hyperlink(link) => collect_text(&link.children, line),
            _ => {}
        }
    }
}

fn run_text(run: &docx_rs::Run, line: &mut String) {
    for node in &run.children {
        match node {
            docx_rs::RunChild::Text(t) => line.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => line.push('\t'),
            docx_rs::RunChild::Break(_) => line.push('\n'),
            _ => {}
        }
    }
}

fn text_paragraphs(path: &Utf8Path) -> DocumentResult<Vec<String>> {
    let body = std::fs::read_to_string(path.as_std_path()).map_err(|e| DocumentError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(body.lines().map(str::to_string).collect())
}

/// Render `report` to a `.docx` file at `path`.
///
/// `label` prefixes the block-count heading (usually the block delimiter).
/// The report itself is only borrowed and stays intact if writing fails.
#[tracing::instrument(skip(report), fields(path = %path, categories = report.categories.len()))]
pub fn write_report(path: &Utf8Path, report: &Report, label: &str) -> WriteResult<()> {
    let heading = Style::new(HEADING_STYLE, StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();
    let mut docx = Docx::new().add_style(heading);
    for section in report.outline(label) {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(section.heading))
                .style(HEADING_STYLE),
        );
        for body in section.paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(body)));
        }
    }

    let file = File::create(path.as_std_path()).map_err(|e| classify_io(path, e))?;
    docx.build().pack(file).map_err(|e| WriteError::Pack {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!("report written");
    Ok(())
}

/// Write a report and tell the user how it went.
///
/// Success is announced as info; failure as a warning. The error is still
/// returned so callers can reflect it in their own output.
pub fn deliver_report(
    path: &Utf8Path,
    report: &Report,
    label: &str,
    sink: &dyn Notifier,
) -> WriteResult<()> {
    match write_report(path, report, label) {
        Ok(()) => {
            sink.info(&format!("report saved to {path}"));
            Ok(())
        }
        Err(err) => {
            sink.warn(&err.to_string());
            Err(err)
        }
    }
}

fn classify_io(path: &Utf8Path, err: std::io::Error) -> WriteError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        WriteError::PermissionDenied(Utf8PathBuf::from(path))
    } else {
        WriteError::Io {
            path: Utf8PathBuf::from(path),
            source: err,
        }
    }
}

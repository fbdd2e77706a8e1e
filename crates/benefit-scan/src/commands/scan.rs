//! Scan command implementation

use anyhow::bail;
use benefit_scan_core::analyzer::{Analysis, Analyzer};
use benefit_scan_core::config::{Config, ConfigSources};
use benefit_scan_core::document;
use benefit_scan_core::notify::{CollectingNotifier, Notification, Notifier};
use benefit_scan_core::report::Report;
use benefit_scan_core::stem::StemmerKind;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::console::ConsoleNotifier;

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Source documents (.docx or .txt).
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Taxonomy file (JSON, TOML or YAML). Overrides the configured one.
    #[arg(short, long, value_name = "FILE")]
    pub taxonomy: Option<Utf8PathBuf>,

    /// Report path. Only valid with a single source or with --merge.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Combine all sources into one report.
    #[arg(long)]
    pub merge: bool,

    /// Print results without writing .docx reports.
    #[arg(long)]
    pub no_write: bool,

    /// Stemmer for the stem pass.
    #[arg(long, value_enum)]
    pub stemmer: Option<StemmerKind>,
}

/// One report produced by a scan.
#[derive(Debug, Serialize)]
struct ScanEntry {
    sources: Vec<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<Utf8PathBuf>,
    written: bool,
    report: Report,
}

#[derive(Debug, Serialize)]
struct ScanOutput {
    delimiter: String,
    reports: Vec<ScanEntry>,
    notifications: Vec<Notification>,
}

/// A group of sources that ends up in one report.
struct Job {
    sources: Vec<Utf8PathBuf>,
    output: Utf8PathBuf,
    analysis: Analysis,
}

/// Analyze source documents and write one report per source, or one merged
/// report.
///
/// Unreadable sources, a broken taxonomy and failed writes are reported as
/// warnings; the command still succeeds.
#[instrument(name = "cmd_scan", skip_all, fields(files = args.files.len(), merge = args.merge))]
pub fn cmd_scan(
    args: ScanArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(files = ?args.files, taxonomy = ?args.taxonomy, "executing scan command");

    if args.output.is_some() && args.files.len() > 1 && !args.merge {
        bail!("--output needs a single source file or --merge");
    }
    let taxonomy_path = super::resolve_taxonomy(args.taxonomy.clone(), config, sources)?;

    let collector = CollectingNotifier::new();
    let console = ConsoleNotifier::new(quiet);
    let sink: &dyn Notifier = if global_json { &collector } else { &console };

    let stemmer = args
        .stemmer
        .or(config.stemmer)
        .unwrap_or_default()
        .build();
    let analyzer = Analyzer::from_taxonomy_file(&taxonomy_path, stemmer.as_ref(), sink);

    let progress = progress_bar(args.files.len(), global_json || quiet);
    let mut analyses = Vec::with_capacity(args.files.len());
    for file in &args.files {
        progress.set_message(file.to_string());
        analyses.push(analyzer.analyze_document(file, config.input_limit(), sink));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let jobs = plan_jobs(&args, config.report_name(), analyses)?;
    let mut entries = Vec::with_capacity(jobs.len());
    for job in jobs {
        let report = job.analysis.report();
        let written = !args.no_write
            && document::deliver_report(&job.output, &report, analyzer.label(), sink).is_ok();
        entries.push(ScanEntry {
            sources: job.sources,
            output: (!args.no_write).then_some(job.output),
            written,
            report,
        });
    }

    if global_json {
        let output = ScanOutput {
            delimiter: analyzer.delimiter().to_string(),
            reports: entries,
            notifications: collector.into_notifications(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for entry in &entries {
            print_entry(entry, analyzer.label());
        }
    }

    Ok(())
}

/// Decide which sources feed which report and where it is written.
///
/// Per-file report names come from the source stem, so two sources that
/// differ only by extension would share a report. Unless nothing is written,
/// that is refused rather than letting one report overwrite the other.
fn plan_jobs(
    args: &ScanArgs,
    report_name: &str,
    analyses: Vec<Analysis>,
) -> anyhow::Result<Vec<Job>> {
    let single = args.files.len() == 1;

    if args.merge || single {
        let mut total = Analysis::default();
        for analysis in analyses {
            total.merge(analysis);
        }
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| sibling(&args.files[0], report_name));
        return Ok(vec![Job {
            sources: args.files.clone(),
            output,
            analysis: total,
        }]);
    }

    let mut jobs: Vec<Job> = Vec::with_capacity(args.files.len());
    for (file, analysis) in args.files.iter().zip(analyses) {
        let name = format!("{}-{report_name}", file.file_stem().unwrap_or("source"));
        let output = sibling(file, &name);
        if !args.no_write
            && let Some(other) = jobs.iter().find(|job| job.output == output)
        {
            bail!(
                "{} and {file} would both write {output}; rename one or use --merge",
                other.sources[0]
            );
        }
        jobs.push(Job {
            sources: vec![file.clone()],
            output,
            analysis,
        });
    }
    Ok(jobs)
}

/// `name` in the same directory as `file`.
fn sibling(file: &Utf8Path, name: &str) -> Utf8PathBuf {
    file.parent()
        .map_or_else(|| Utf8PathBuf::from(name), |dir| dir.join(name))
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden || len < 2 {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

fn print_entry(entry: &ScanEntry, label: &str) {
    let names: Vec<&str> = entry.sources.iter().map(|p| p.as_str()).collect();
    println!("{}", names.join(", ").bold());
    println!(
        "  {} {}",
        format!("{label}:").cyan(),
        entry.report.block_count
    );
    if entry.report.is_empty() {
        println!("  {}", "no benefits found".dimmed());
    }
    for tally in &entry.report.categories {
        println!("  {}", tally.category.bold());
        for benefit in &tally.benefits {
            println!("    {}: {}", benefit.term, benefit.count);
        }
    }
    if let (true, Some(output)) = (entry.written, &entry.output) {
        println!("  {} {}", "report:".dimmed(), output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(files: &[&str], merge: bool, output: Option<&str>) -> ScanArgs {
        ScanArgs {
            files: files.iter().map(Utf8PathBuf::from).collect(),
            taxonomy: None,
            output: output.map(Utf8PathBuf::from),
            merge,
            no_write: false,
            stemmer: None,
        }
    }

    fn analysis(blocks: usize) -> Analysis {
        Analysis {
            block_count: blocks,
            ..Analysis::default()
        }
    }

    #[test]
    fn single_source_writes_report_next_to_it() {
        let jobs = plan_jobs(&args(&["/docs/a.docx"], false, None), "report.docx", vec![analysis(2)])
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].output, "/docs/report.docx");
        assert_eq!(jobs[0].analysis.block_count, 2);
    }

    #[test]
    fn explicit_output_wins() {
        let jobs = plan_jobs(
            &args(&["/docs/a.docx"], false, Some("/out/r.docx")),
            "report.docx",
            vec![analysis(0)],
        )
        .unwrap();
        assert_eq!(jobs[0].output, "/out/r.docx");
    }

    #[test]
    fn several_sources_get_their_own_reports() {
        let jobs = plan_jobs(
            &args(&["/docs/a.docx", "/other/b.txt"], false, None),
            "report.docx",
            vec![analysis(1), analysis(3)],
        )
        .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].output, "/docs/a-report.docx");
        assert_eq!(jobs[1].output, "/other/b-report.docx");
        assert_eq!(jobs[1].analysis.block_count, 3);
    }

    #[test]
    fn merge_sums_block_counts() {
        let jobs = plan_jobs(
            &args(&["/docs/a.docx", "/docs/b.docx"], true, None),
            "report.docx",
            vec![analysis(1), analysis(3)],
        )
        .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].sources.len(), 2);
        assert_eq!(jobs[0].analysis.block_count, 4);
        assert_eq!(jobs[0].output, "/docs/report.docx");
    }

    #[test]
    fn sources_differing_only_by_extension_are_refused() {
        let result = plan_jobs(
            &args(&["/d/a.docx", "/d/a.txt"], false, None),
            "report.docx",
            vec![analysis(1), analysis(1)],
        );
        let Err(err) = result else {
            panic!("expected a report path collision");
        };
        let message = err.to_string();
        assert!(message.contains("/d/a-report.docx"), "{message}");
        assert!(message.contains("--merge"), "{message}");
    }

    #[test]
    fn same_stem_in_different_directories_is_fine() {
        let jobs = plan_jobs(
            &args(&["/d/a.docx", "/e/a.docx"], false, None),
            "report.docx",
            vec![analysis(1), analysis(2)],
        )
        .unwrap();
        assert_eq!(jobs[0].output, "/d/a-report.docx");
        assert_eq!(jobs[1].output, "/e/a-report.docx");
    }

    #[test]
    fn relative_source_without_directory() {
        assert_eq!(sibling(Utf8Path::new("a.docx"), "report.docx"), "report.docx");
    }
}

//! Taxonomy command: validate a taxonomy file and show its stems.

use anyhow::Context;
use benefit_scan_core::config::{Config, ConfigSources};
use benefit_scan_core::stem::{StemmedTaxonomy, StemmerKind};
use benefit_scan_core::taxonomy::{self, TaxonomySource};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `taxonomy` subcommand.
#[derive(Args, Debug, Default)]
pub struct TaxonomyArgs {
    /// Taxonomy file. Defaults to the configured one.
    pub file: Option<Utf8PathBuf>,

    /// Stemmer used to show term stems.
    #[arg(long, value_enum)]
    pub stemmer: Option<StemmerKind>,
}

#[derive(Debug, Serialize)]
struct TermEntry {
    term: String,
    stem: String,
}

#[derive(Debug, Serialize)]
struct CategoryEntry {
    category: String,
    terms: Vec<TermEntry>,
}

#[derive(Debug, Serialize)]
struct TaxonomyOutput {
    file: Utf8PathBuf,
    delimiter: String,
    stemmer: &'static str,
    term_count: usize,
    categories: Vec<CategoryEntry>,
}

impl TaxonomyOutput {
    fn new(file: Utf8PathBuf, source: TaxonomySource, kind: StemmerKind) -> Self {
        let stemmed = StemmedTaxonomy::build(&source.taxonomy, kind.build().as_ref());
        let categories = source
            .taxonomy
            .iter()
            .map(|(category, terms)| {
                let stems = stemmed.stems(category).unwrap_or_default();
                CategoryEntry {
                    category: category.to_string(),
                    terms: terms
                        .iter()
                        .zip(stems)
                        .map(|(term, stem)| TermEntry {
                            term: term.clone(),
                            stem: stem.clone(),
                        })
                        .collect(),
                }
            })
            .collect();
        Self {
            file,
            delimiter: source.delimiter,
            stemmer: kind.as_str(),
            term_count: source.taxonomy.term_count(),
            categories,
        }
    }
}

/// Load and validate a taxonomy file, then list categories, terms and stems.
///
/// Unlike `scan`, a broken taxonomy is a hard error here.
#[instrument(name = "cmd_taxonomy", skip_all)]
pub fn cmd_taxonomy(
    args: TaxonomyArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let path = super::resolve_taxonomy(args.file, config, sources)?;
    debug!(file = %path, "executing taxonomy command");

    let source = taxonomy::try_load_taxonomy(&path)
        .with_context(|| format!("invalid taxonomy {path}"))?;
    let kind = args.stemmer.or(config.stemmer).unwrap_or_default();
    let output = TaxonomyOutput::new(path, source, kind);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Taxonomy".bold(), output.file.cyan());
    println!("{}: {}", "Delimiter".dimmed(), output.delimiter);
    println!("{}: {}", "Stemmer".dimmed(), output.stemmer);
    println!(
        "{}: {} in {} categories",
        "Terms".dimmed(),
        output.term_count,
        output.categories.len()
    );
    for category in &output.categories {
        println!();
        println!("{}", category.category.bold().underline());
        for entry in &category.terms {
            if entry.stem == entry.term {
                println!("  {}", entry.term);
            } else {
                println!("  {} {}", entry.term, format!("({})", entry.stem).dimmed());
            }
        }
    }

    Ok(())
}

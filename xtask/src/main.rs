//! Build helpers: man pages and shell completions for benefit-scan.
//!
//! ```text
//! cargo xtask man [--out-dir DIR]
//! cargo xtask completions [--out-dir DIR]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

const BIN_NAME: &str = "benefit-scan";

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for benefit-scan")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for the CLI and each subcommand
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out_dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().task {
        Task::Man { out_dir } => man(&out_dir),
        Task::Completions { out_dir } => completions(&out_dir),
    }
}

fn man(out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let cmd = benefit_scan::command();
    render_man(&cmd, BIN_NAME, out_dir)?;
    for sub in cmd.get_subcommands() {
        let name = format!("{BIN_NAME}-{}", sub.get_name());
        render_man(sub, &name, out_dir)?;
    }
    println!("man pages written to {}", out_dir.display());
    Ok(())
}

fn render_man(cmd: &clap::Command, name: &str, out_dir: &Path) -> anyhow::Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut buffer)
        .with_context(|| format!("failed to render man page for {name}"))?;
    let path = out_dir.join(format!("{name}.1"));
    fs::write(&path, buffer).with_context(|| format!("failed to write {}", path.display()))
}

fn completions(out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut cmd = benefit_scan::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
        let path = clap_complete::generate_to(shell, &mut cmd, BIN_NAME, out_dir)
            .with_context(|| format!("failed to generate {shell} completions"))?;
        println!("{}", path.display());
    }
    Ok(())
}

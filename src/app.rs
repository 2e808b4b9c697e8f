use crate::git::SystemGit;
use crate::scan::{self, ScanOptions};
use crate::ui::{self, progress::TerminalProgress, summary, Theme};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything needed for one run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub git: PathBuf,
    pub scan: ScanOptions,
    pub format: OutputFormat,
    pub theme: Theme,
}

pub fn run(config: &Config, interrupt: &AtomicBool) -> Result<()> {
    let root = config
        .root
        .canonicalize()
        .with_context(|| format!("Cannot open scan root {}", config.root.display()))?;
    let git = SystemGit::new(&config.git);

    let report = match config.format {
        OutputFormat::Text => {
            let progress = TerminalProgress::new();
            scan::scan(&root, &git, &config.scan, &progress, interrupt)?
        }
        OutputFormat::Json => scan::scan(&root, &git, &config.scan, &scan::NoProgress, interrupt)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match config.format {
        OutputFormat::Text => summary::render(&mut out, &root, &report, &config.theme),
        OutputFormat::Json => ui::render_json(&mut out, &root, &report),
    };
    written.context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    Ok(())
}

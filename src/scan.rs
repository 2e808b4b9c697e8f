//! Drives the locator, parser and evaluator over every repository under a root.

use crate::fetch::{self, DEFAULT_FETCH_TIMEOUT};
use crate::git::GitRunner;
use crate::locator;
use crate::status;
use crate::sync;
use crate::types::{RepoOutcome, RepositoryRef, ScanReport};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Refresh remote-tracking refs before comparing with the upstream.
    pub fetch: bool,
    pub fetch_timeout: Duration,
    /// Worker threads; 0 picks one per CPU.
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            fetch: true,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            jobs: 0,
        }
    }
}

/// Receives scan progress. Rendering lives behind this so the scan itself does no console IO.
pub trait Progress: Sync {
    fn located(&self, _total: usize) {}
    fn fetching(&self, _repo: &RepositoryRef) {}
    fn finished_repo(&self, _repo: &RepositoryRef, _done: usize, _total: usize) {}
    fn done(&self) {}
}

pub struct NoProgress;

impl Progress for NoProgress {}

/// Runs the full pipeline for one repository: status, sync check, fetch, sync re-check.
pub fn inspect(
    git: &dyn GitRunner,
    repo: RepositoryRef,
    options: &ScanOptions,
    progress: &dyn Progress,
) -> RepoOutcome {
    let path = repo.path();
    let status = status::collect(git, path);

    let mut sync = sync::evaluate(git, path);
    if options.fetch && sync.has_remote() {
        progress.fetching(&repo);
        if fetch::fetch(git, path, options.fetch_timeout) {
            sync = sync::evaluate(git, path);
        }
    }

    tracing::debug!(
        repo = %path.display(),
        changes = status.as_ref().map_or(0, |s| s.total()),
        sync = %sync.classification(),
        "inspected"
    );

    RepoOutcome { repo, status, sync }
}

/// Inspects `repos` on a worker pool and merges the outcomes in path order.
///
/// Once `interrupt` is set no further repository is started; those are counted as skipped.
pub fn scan_repos(
    git: &dyn GitRunner,
    repos: Vec<RepositoryRef>,
    options: &ScanOptions,
    progress: &dyn Progress,
    interrupt: &AtomicBool,
) -> Result<ScanReport> {
    let total = repos.len();
    progress.located(total);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
        .context("Failed to start worker pool")?;

    let done = AtomicUsize::new(0);
    let outcomes: Vec<Option<RepoOutcome>> = pool.install(|| {
        repos
            .into_par_iter()
            .map(|repo| {
                if interrupt.load(Ordering::Relaxed) {
                    return None;
                }
                let outcome = inspect(git, repo, options, progress);
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress.finished_repo(&outcome.repo, n, total);
                Some(outcome)
            })
            .collect()
    });
    progress.done();

    let skipped = outcomes.iter().filter(|o| o.is_none()).count();
    let mut outcomes: Vec<RepoOutcome> = outcomes.into_iter().flatten().collect();
    outcomes.sort_by(|a, b| a.repo.path.cmp(&b.repo.path));

    let mut report = ScanReport {
        repositories: total,
        skipped,
        ..Default::default()
    };
    for outcome in outcomes {
        report.record(outcome);
    }

    if skipped > 0 {
        tracing::info!(skipped, "scan interrupted");
    }
    Ok(report)
}

/// Locates every repository under `root` and inspects them.
pub fn scan(
    root: &Path,
    git: &dyn GitRunner,
    options: &ScanOptions,
    progress: &dyn Progress,
    interrupt: &AtomicBool,
) -> Result<ScanReport> {
    if !root.is_dir() {
        bail!("Scan root {} is not a directory", root.display());
    }

    let repos: Vec<RepositoryRef> = locator::locate(root).collect();
    tracing::info!(root = %root.display(), count = repos.len(), "located repositories");

    scan_repos(git, repos, options, progress, interrupt)
}

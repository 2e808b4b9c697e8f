use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A repository root found by the locator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RepositoryRef {
    pub path: PathBuf,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The status report sections that carry file entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Staged,
    Modified,
    Untracked,
}

impl Section {
    pub fn header(&self) -> &'static str {
        match self {
            Section::Staged => "Changes to be committed:",
            Section::Modified => "Changes not staged for commit:",
            Section::Untracked => "Untracked files:",
        }
    }

    pub const ALL: [Section; 3] = [Section::Staged, Section::Modified, Section::Untracked];
}

/// Local changes of one repository. Never empty: a clean repository has no report at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn entries(&self, section: Section) -> &[String] {
        match section {
            Section::Staged => &self.staged,
            Section::Modified => &self.modified,
            Section::Untracked => &self.untracked,
        }
    }

    pub(crate) fn push(&mut self, section: Section, entry: String) {
        match section {
            Section::Staged => self.staged.push(entry),
            Section::Modified => self.modified.push(entry),
            Section::Untracked => self.untracked.push(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }

    pub fn total(&self) -> usize {
        self.staged.len() + self.modified.len() + self.untracked.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncClassification {
    NoRemote,
    NoBranch,
    NoUpstream,
    /// Both commit counts failed to resolve.
    Unknown,
    Synced,
    Ahead,
    Behind,
    Diverged,
}

impl SyncClassification {
    /// Derives the classification from the facts gathered by the evaluator.
    ///
    /// `ahead`/`behind` are `None` when the corresponding count could not be
    /// resolved. A single missing side counts as zero; both missing is `Unknown`.
    pub fn classify(
        has_remote: bool,
        has_branch: bool,
        has_upstream: bool,
        ahead: Option<u32>,
        behind: Option<u32>,
    ) -> Self {
        if !has_remote {
            return SyncClassification::NoRemote;
        }
        if !has_branch {
            return SyncClassification::NoBranch;
        }
        if !has_upstream {
            return SyncClassification::NoUpstream;
        }
        match (ahead, behind) {
            (None, None) => SyncClassification::Unknown,
            (ahead, behind) => match (ahead.unwrap_or(0), behind.unwrap_or(0)) {
                (0, 0) => SyncClassification::Synced,
                (_, 0) => SyncClassification::Ahead,
                (0, _) => SyncClassification::Behind,
                _ => SyncClassification::Diverged,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncClassification::NoRemote => "no-remote",
            SyncClassification::NoBranch => "no-branch",
            SyncClassification::NoUpstream => "no-upstream",
            SyncClassification::Unknown => "unknown",
            SyncClassification::Synced => "synced",
            SyncClassification::Ahead => "ahead",
            SyncClassification::Behind => "behind",
            SyncClassification::Diverged => "diverged",
        }
    }
}

impl fmt::Display for SyncClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship between the current branch and its upstream.
///
/// The classification is only ever computed from the other fields, so it
/// cannot disagree with the counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncState {
    has_remote: bool,
    branch: Option<String>,
    upstream: Option<String>,
    ahead: u32,
    behind: u32,
    classification: SyncClassification,
}

impl SyncState {
    pub fn no_remote() -> Self {
        Self::build(false, None, None, None, None)
    }

    pub fn no_branch() -> Self {
        Self::build(true, None, None, None, None)
    }

    pub fn no_upstream(branch: String) -> Self {
        Self::build(true, Some(branch), None, None, None)
    }

    pub fn tracking(
        branch: String,
        upstream: String,
        ahead: Option<u32>,
        behind: Option<u32>,
    ) -> Self {
        Self::build(true, Some(branch), Some(upstream), ahead, behind)
    }

    fn build(
        has_remote: bool,
        branch: Option<String>,
        upstream: Option<String>,
        ahead: Option<u32>,
        behind: Option<u32>,
    ) -> Self {
        let classification = SyncClassification::classify(
            has_remote,
            branch.is_some(),
            upstream.is_some(),
            ahead,
            behind,
        );
        Self {
            has_remote,
            branch,
            upstream,
            ahead: ahead.unwrap_or(0),
            behind: behind.unwrap_or(0),
            classification,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.has_remote
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn upstream(&self) -> Option<&str> {
        self.upstream.as_deref()
    }

    pub fn ahead(&self) -> u32 {
        self.ahead
    }

    pub fn behind(&self) -> u32 {
        self.behind
    }

    pub fn classification(&self) -> SyncClassification {
        self.classification
    }

    /// Whether this state belongs in the "out of sync" part of the report.
    /// Repositories without any remote are not considered out of sync.
    pub fn is_issue(&self) -> bool {
        !matches!(
            self.classification,
            SyncClassification::NoRemote | SyncClassification::Synced
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
    pub ahead: u64,
    pub behind: u64,
}

/// Everything one repository's pipeline produced.
#[derive(Debug, Clone)]
pub struct RepoOutcome {
    pub repo: RepositoryRef,
    pub status: Option<StatusReport>,
    pub sync: SyncState,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoChanges {
    #[serde(flatten)]
    pub repo: RepositoryRef,
    pub status: StatusReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoSync {
    #[serde(flatten)]
    pub repo: RepositoryRef,
    pub sync: SyncState,
}

/// Aggregate result of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub repositories: usize,
    /// Repositories never processed because the scan was interrupted.
    pub skipped: usize,
    pub changes: Vec<RepoChanges>,
    pub sync_issues: Vec<RepoSync>,
    pub totals: Totals,
}

impl ScanReport {
    pub fn record(&mut self, outcome: RepoOutcome) {
        let RepoOutcome { repo, status, sync } = outcome;

        if let Some(status) = status {
            self.totals.staged += status.staged.len();
            self.totals.modified += status.modified.len();
            self.totals.untracked += status.untracked.len();
            self.changes.push(RepoChanges {
                repo: repo.clone(),
                status,
            });
        }

        if sync.is_issue() {
            self.totals.ahead += u64::from(sync.ahead());
            self.totals.behind += u64::from(sync.behind());
            self.sync_issues.push(RepoSync { repo, sync });
        }
    }

    pub fn interrupted(&self) -> bool {
        self.skipped > 0
    }
}

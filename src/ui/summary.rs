use super::{colors, Theme};
use crate::types::{ScanReport, Section, SyncClassification, SyncState};
use crossterm::style::Color;
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 80;

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn banner(out: &mut impl Write, theme: &Theme, title: &str) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "{}", theme.bold(title))?;
    rule(out)?;
    writeln!(out)
}

fn plural(n: impl Into<u64>, one: &str, many: &str) -> String {
    let n = n.into();
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn section_label(section: Section) -> (&'static str, &'static str, Color) {
    match section {
        Section::Staged => ("✓", "Staged", colors::GREEN),
        Section::Modified => ("⚠", "Modified, not staged", colors::YELLOW),
        Section::Untracked => ("?", "Untracked", colors::GRAY),
    }
}

/// Symbol, colour and one-line description of a sync state.
pub fn sync_message(state: &SyncState) -> (&'static str, Color, String) {
    let ahead = state.ahead();
    let behind = state.behind();
    match state.classification() {
        SyncClassification::Ahead => (
            "⬆",
            colors::GREEN,
            format!("Ahead of upstream by {}", plural(ahead, "commit", "commits")),
        ),
        SyncClassification::Behind => (
            "⬇",
            colors::YELLOW,
            format!("Behind upstream by {}", plural(behind, "commit", "commits")),
        ),
        SyncClassification::Diverged => (
            "⚡",
            colors::MAGENTA,
            format!("Diverged: {ahead} ahead, {behind} behind"),
        ),
        SyncClassification::NoUpstream => {
            let branch = state.branch().unwrap_or("?");
            (
                "⚠",
                colors::RED,
                format!("Branch {branch} has no upstream and origin/{branch} does not exist"),
            )
        }
        SyncClassification::NoBranch => (
            "⚠",
            colors::RED,
            "Cannot determine the current branch (detached HEAD?)".to_string(),
        ),
        SyncClassification::Unknown => (
            "⚠",
            colors::RED,
            "Cannot count commits against the upstream".to_string(),
        ),
        SyncClassification::NoRemote => ("·", colors::GRAY, "No origin remote".to_string()),
        SyncClassification::Synced => ("✓", colors::GREEN, "In sync".to_string()),
    }
}

/// Writes the human-readable report.
pub fn render(
    out: &mut impl Write,
    root: &Path,
    report: &ScanReport,
    theme: &Theme,
) -> io::Result<()> {
    writeln!(out, "Scanned {}", theme.path(root))?;
    rule(out)?;
    writeln!(
        out,
        "Found {}",
        plural(report.repositories as u64, "git repository", "git repositories")
    )?;
    writeln!(out, "{} with local changes", report.changes.len())?;
    writeln!(out, "{} out of sync with origin", report.sync_issues.len())?;
    if report.interrupted() {
        writeln!(
            out,
            "{}",
            theme.paint(
                format!(
                    "Interrupted: {} not inspected",
                    plural(report.skipped as u64, "repository", "repositories")
                ),
                colors::RED
            )
        )?;
    }
    writeln!(out)?;

    render_changes(out, report, theme)?;
    writeln!(out)?;
    render_sync(out, report, theme)
}

fn render_changes(out: &mut impl Write, report: &ScanReport, theme: &Theme) -> io::Result<()> {
    if report.changes.is_empty() {
        return writeln!(
            out,
            "{}",
            theme.paint("✓ All repositories are clean", colors::GREEN)
        );
    }

    banner(out, theme, "Repositories with local changes")?;
    for entry in &report.changes {
        writeln!(out, "📁 {}", theme.paint(&entry.repo.name, colors::BLUE))?;
        writeln!(out, "   Path: {}", theme.path(entry.repo.path()))?;

        for section in Section::ALL {
            let files = entry.status.entries(section);
            if files.is_empty() {
                continue;
            }
            let (symbol, label, color) = section_label(section);
            writeln!(
                out,
                "   {} ({}): {}",
                theme.paint(format!("{symbol} {label}"), color),
                section.header().trim_end_matches(':'),
                plural(files.len() as u64, "file", "files")
            )?;
            for file in files {
                writeln!(out, "      - {file}")?;
            }
        }
        writeln!(out)?;
    }

    let totals = &report.totals;
    rule(out)?;
    writeln!(out, "Local change totals:")?;
    writeln!(out, "  Staged:    {}", plural(totals.staged as u64, "file", "files"))?;
    writeln!(out, "  Modified:  {}", plural(totals.modified as u64, "file", "files"))?;
    writeln!(out, "  Untracked: {}", plural(totals.untracked as u64, "file", "files"))?;
    rule(out)
}

fn render_sync(out: &mut impl Write, report: &ScanReport, theme: &Theme) -> io::Result<()> {
    if report.sync_issues.is_empty() {
        return writeln!(
            out,
            "{}",
            theme.paint("✓ All repositories with a remote are in sync", colors::GREEN)
        );
    }

    banner(out, theme, "Repositories out of sync with origin")?;
    for entry in &report.sync_issues {
        let sync = &entry.sync;
        writeln!(out, "📁 {}", theme.paint(&entry.repo.name, colors::BLUE))?;
        writeln!(out, "   Path: {}", theme.path(entry.repo.path()))?;
        if let Some(branch) = sync.branch() {
            writeln!(out, "   Branch: {}", theme.paint(branch, colors::CYAN))?;
        }
        if let Some(upstream) = sync.upstream() {
            writeln!(out, "   Upstream: {upstream}")?;
        }
        let (symbol, color, message) = sync_message(sync);
        writeln!(out, "   {}", theme.paint(format!("{symbol} {message}"), color))?;
        writeln!(out)?;
    }

    rule(out)?;
    writeln!(out, "Remote sync totals:")?;
    writeln!(out, "  Ahead of upstream:  {}", plural(report.totals.ahead, "commit", "commits"))?;
    writeln!(out, "  Behind upstream:    {}", plural(report.totals.behind, "commit", "commits"))?;
    rule(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RepoOutcome, RepositoryRef, StatusReport};

    fn render_plain(report: &ScanReport) -> String {
        let mut buf = Vec::new();
        render(&mut buf, Path::new("/work"), report, &Theme::plain()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_report_is_all_clear() {
        let text = render_plain(&ScanReport::default());
        assert!(text.contains("Found 0 git repositories"));
        assert!(text.contains("All repositories are clean"));
        assert!(text.contains("All repositories with a remote are in sync"));
        assert!(!text.contains("Interrupted"));
    }

    #[test]
    fn lists_changes_and_sync_issues() {
        let mut report = ScanReport {
            repositories: 3,
            ..Default::default()
        };
        report.record(RepoOutcome {
            repo: RepositoryRef::new("/work/c"),
            status: Some(StatusReport {
                staged: vec!["new file: lib.rs".into()],
                modified: vec!["modified: README.md".into()],
                untracked: vec![],
            }),
            sync: SyncState::tracking("main".into(), "origin/main".into(), Some(0), Some(3)),
        });

        let text = render_plain(&report);
        assert!(text.contains("Found 3 git repositories"));
        assert!(text.contains("1 with local changes"));
        assert!(text.contains("1 out of sync with origin"));
        assert!(text.contains("✓ Staged (Changes to be committed): 1 file"));
        assert!(text.contains("      - modified: README.md"));
        assert!(!text.contains("Untracked (Untracked files)"));
        assert!(text.contains("   Upstream: origin/main"));
        assert!(text.contains("⬇ Behind upstream by 3 commits"));
        assert!(text.contains("Behind upstream:    3 commits"));
    }

    #[test]
    fn interrupted_scan_is_flagged() {
        let report = ScanReport {
            repositories: 4,
            skipped: 1,
            ..Default::default()
        };
        assert!(render_plain(&report).contains("Interrupted: 1 repository not inspected"));
    }

    #[test]
    fn messages_per_classification() {
        let no_upstream = SyncState::no_upstream("topic".into());
        assert_eq!(
            sync_message(&no_upstream).2,
            "Branch topic has no upstream and origin/topic does not exist"
        );

        let diverged =
            SyncState::tracking("main".into(), "origin/main".into(), Some(2), Some(2));
        assert_eq!(sync_message(&diverged).2, "Diverged: 2 ahead, 2 behind");

        let ahead = SyncState::tracking("main".into(), "origin/main".into(), Some(1), Some(0));
        assert_eq!(sync_message(&ahead).2, "Ahead of upstream by 1 commit");
    }
}

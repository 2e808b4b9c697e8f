//! Parsing of the long-format `git status` report into a [`StatusReport`].
//!
//! The report is a sequence of section headers, each followed by indented
//! entries. Blank lines and advice lines may appear inside a section; any
//! other unindented line ends it.

use crate::git::{self, GitRunner};
use crate::types::{Section, StatusReport};
use std::path::Path;

/// Substrings that mark an unindented advice line rather than the end of a section.
const HINT_MARKERS: [&str; 3] = [
    "use \"git",
    "include in what will be committed",
    "no changes added",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Header(Section),
    Blank,
    Hint,
    /// Indented line; the payload is the trimmed text.
    Indented(&'a str),
    /// Unindented line that is neither a header nor a hint.
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(section) = Section::ALL.into_iter().find(|s| line.contains(s.header())) {
        return Line::Header(section);
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('\t') || line.starts_with("  ") {
        return Line::Indented(trimmed);
    }

    let lower = line.to_lowercase();
    if HINT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        Line::Hint
    } else {
        Line::Other
    }
}

/// Formats one entry of a staged or modified section as `"<kind>: <path>"`.
fn tracked_entry(text: &str) -> String {
    match text.split_once(':') {
        Some((kind, path)) => format!("{}: {}", kind.trim(), path.trim()),
        None => text.to_string(),
    }
}

/// Parses a long-format status report.
///
/// Returns `None` when no section contributed any entry.
pub fn parse_status(raw: &str) -> Option<StatusReport> {
    let mut report = StatusReport::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        match (classify(line), current) {
            (Line::Header(section), _) => current = Some(section),
            (Line::Other, Some(_)) => current = None,
            (Line::Indented(text), Some(section)) if !text.starts_with('(') => {
                let entry = match section {
                    Section::Staged | Section::Modified => tracked_entry(text),
                    Section::Untracked => text.to_string(),
                };
                report.push(section, entry);
            }
            _ => {}
        }
    }

    (!report.is_empty()).then_some(report)
}

/// Queries and parses the status of `repo`. Any failure degrades to `None`.
pub fn collect(git: &dyn GitRunner, repo: &Path) -> Option<StatusReport> {
    match git::status_text(git, repo) {
        Ok(raw) => parse_status(&raw),
        Err(e) => {
            tracing::warn!(repo = %repo.display(), "status query failed: {e}");
            None
        }
    }
}

pub mod colors;
pub mod progress;
pub mod summary;

use crate::types::ScanReport;
use crossterm::style::{Color, Stylize};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

/// Whether ANSI colour and OSC 8 hyperlinks go into the rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub hyperlinks: bool,
}

impl Theme {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        if self.color {
            text.to_string().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// The path as display text, clickable when hyperlinks are enabled.
    pub fn path(&self, path: &Path) -> String {
        let text = path.display().to_string();
        if !self.hyperlinks {
            return text;
        }
        let url = file_url(path);
        format!(
            "{}{}{}",
            osc8::Hyperlink::new(&url),
            text,
            osc8::Hyperlink::END
        )
    }
}

/// `file://` URL for a local path, each component percent-encoded.
pub fn file_url(path: &Path) -> String {
    let slashed = path.to_string_lossy().replace('\\', "/");
    let encoded = slashed
        .split('/')
        .map(|segment| urlencoding::encode(segment).replace("%3A", ":"))
        .collect::<Vec<_>>()
        .join("/");
    if encoded.starts_with('/') {
        format!("file://{encoded}")
    } else {
        format!("file:///{encoded}")
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    interrupted: bool,
    #[serde(flatten)]
    report: &'a ScanReport,
}

pub fn render_json(out: &mut impl Write, root: &Path, report: &ScanReport) -> io::Result<()> {
    let doc = JsonReport {
        root,
        interrupted: report.interrupted(),
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RepoOutcome, RepositoryRef, StatusReport, SyncState};

    #[test]
    fn file_url_encodes_components() {
        assert_eq!(
            file_url(Path::new("/home/me/my repo")),
            "file:///home/me/my%20repo"
        );
        assert_eq!(
            file_url(Path::new("C:\\work\\proj")),
            "file:///C:/work/proj"
        );
    }

    #[test]
    fn plain_theme_adds_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(theme.paint("x", colors::RED), "x");
        assert_eq!(theme.path(Path::new("/a/b")), "/a/b");
    }

    #[test]
    fn hyperlink_wraps_path() {
        let theme = Theme {
            color: false,
            hyperlinks: true,
        };
        let rendered = theme.path(Path::new("/a/b"));
        assert!(rendered.contains("file:///a/b"));
        assert!(rendered.contains("\u{1b}]8;"));
    }

    #[test]
    fn json_contains_classification_and_totals() {
        let mut report = ScanReport {
            repositories: 1,
            ..Default::default()
        };
        report.record(RepoOutcome {
            repo: RepositoryRef::new("/r/c"),
            status: Some(StatusReport {
                staged: vec!["new file: a".into()],
                ..Default::default()
            }),
            sync: SyncState::tracking("main".into(), "origin/main".into(), Some(0), Some(3)),
        });

        let mut buf = Vec::new();
        render_json(&mut buf, Path::new("/r"), &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["repositories"], 1);
        assert_eq!(value["interrupted"], false);
        assert_eq!(value["sync_issues"][0]["name"], "c");
        assert_eq!(value["sync_issues"][0]["sync"]["classification"], "behind");
        assert_eq!(value["totals"]["behind"], 3);
        assert_eq!(value["changes"][0]["status"]["staged"][0], "new file: a");
    }
}

//! Discovery of repository roots beneath a directory.

use crate::types::RepositoryRef;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

const REPO_MARKER: &str = ".git";

pub fn is_repo_root(dir: &Path) -> bool {
    dir.join(REPO_MARKER).is_dir()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn should_visit(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && !is_hidden(entry)
}

type Walker = walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// Lazily yields every repository root under `root`, depth first.
///
/// A repository's own subtree is never entered, hidden directories are
/// skipped, and unreadable directories are passed over silently.
pub fn locate(root: &Path) -> Locator {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(should_visit as fn(&DirEntry) -> bool);
    Locator { walker }
}

pub struct Locator {
    walker: Walker,
}

impl Iterator for Locator {
    type Item = RepositoryRef;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable path: {e}");
                    continue;
                }
            };

            if is_repo_root(entry.path()) {
                self.walker.skip_current_dir();
                return Some(RepositoryRef::new(entry.into_path()));
            }
        }
    }
}

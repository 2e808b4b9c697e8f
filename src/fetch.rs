use crate::git::{self, GitError, GitRunner, ORIGIN};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Refreshes `origin`'s remote-tracking refs for `repo`, giving up after `timeout`.
///
/// Returns whether the fetch succeeded. A timeout counts as a failure; callers
/// carry on with whatever tracking data is already present.
pub fn fetch(git: &dyn GitRunner, repo: &Path, timeout: Duration) -> bool {
    match git::fetch_remote(git, repo, ORIGIN, timeout) {
        Ok(()) => true,
        Err(e @ GitError::TimedOut { .. }) => {
            tracing::warn!(repo = %repo.display(), "{e}");
            false
        }
        Err(e) => {
            tracing::warn!(repo = %repo.display(), "fetch failed: {e}");
            false
        }
    }
}

use crate::git::{self, GitRunner, ORIGIN};
use crate::types::SyncState;
use std::path::Path;

/// Determines how the current branch of `repo` relates to its upstream.
///
/// Never fails: missing remotes, branches and upstreams are classifications,
/// and a failed commit count is treated as unknown for that side.
pub fn evaluate(git: &dyn GitRunner, repo: &Path) -> SyncState {
    match git::has_remote(git, repo, ORIGIN) {
        Ok(true) => {}
        Ok(false) => return SyncState::no_remote(),
        Err(e) => {
            tracing::debug!(repo = %repo.display(), "remote listing failed: {e}");
            return SyncState::no_remote();
        }
    }

    let branch = match git::current_branch(git, repo) {
        Ok(Some(branch)) => branch,
        Ok(None) => return SyncState::no_branch(),
        Err(e) => {
            tracing::debug!(repo = %repo.display(), "branch query failed: {e}");
            return SyncState::no_branch();
        }
    };

    let Some(upstream) = resolve_upstream(git, repo, &branch) else {
        return SyncState::no_upstream(branch);
    };

    let ahead = count(git, repo, &upstream, "HEAD");
    let behind = count(git, repo, "HEAD", &upstream);

    SyncState::tracking(branch, upstream, ahead, behind)
}

/// The configured upstream, or `origin/<branch>` when that exists without tracking config.
fn resolve_upstream(git: &dyn GitRunner, repo: &Path, branch: &str) -> Option<String> {
    match git::upstream(git, repo) {
        Ok(Some(upstream)) => return Some(upstream),
        Ok(None) => {}
        Err(e) => tracing::debug!(repo = %repo.display(), "no upstream configured: {e}"),
    }

    let fallback = format!("{ORIGIN}/{branch}");
    git::ref_exists(git, repo, &format!("refs/remotes/{fallback}")).then_some(fallback)
}

fn count(git: &dyn GitRunner, repo: &Path, from: &str, to: &str) -> Option<u32> {
    match git::count_commits(git, repo, from, to) {
        Ok(Some(n)) => Some(n),
        Ok(None) => {
            tracing::warn!(repo = %repo.display(), "unparseable commit count for {from}..{to}");
            None
        }
        Err(e) => {
            tracing::warn!(repo = %repo.display(), "commit count failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::ScriptedGit;
    use crate::types::SyncClassification;

    fn repo() -> &'static Path {
        Path::new("/work/repo")
    }

    fn tracked(ahead: &str, behind: &str) -> ScriptedGit {
        ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "main\n")
            .ok("rev-parse --abbrev-ref @{upstream}", "origin/main\n")
            .ok("rev-list --count origin/main..HEAD", ahead)
            .ok("rev-list --count HEAD..origin/main", behind)
    }

    #[test]
    fn no_origin_skips_everything_else() {
        let git = ScriptedGit::new().ok("remote", "upstream\n");
        let state = evaluate(&git, repo());
        assert_eq!(state.classification(), SyncClassification::NoRemote);
        assert!(!state.has_remote());
        assert!(!git.called("branch --show-current"));
        assert!(!git.called("rev-list --count origin/main..HEAD"));
    }

    #[test]
    fn failed_remote_listing_is_no_remote() {
        let git = ScriptedGit::new().fail("remote");
        assert_eq!(evaluate(&git, repo()).classification(), SyncClassification::NoRemote);
    }

    #[test]
    fn detached_head_is_no_branch() {
        let git = ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "");
        let state = evaluate(&git, repo());
        assert_eq!(state.classification(), SyncClassification::NoBranch);
        assert!(state.has_remote());
        assert_eq!(state.branch(), None);
    }

    #[test]
    fn untracked_branch_without_remote_counterpart() {
        let git = ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "feature\n")
            .fail("rev-parse --abbrev-ref @{upstream}")
            .fail("rev-parse --verify --quiet refs/remotes/origin/feature");
        let state = evaluate(&git, repo());
        assert_eq!(state.classification(), SyncClassification::NoUpstream);
        assert_eq!(state.branch(), Some("feature"));
        assert_eq!(state.upstream(), None);
    }

    #[test]
    fn falls_back_to_same_named_origin_branch() {
        let git = ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "feature\n")
            .fail("rev-parse --abbrev-ref @{upstream}")
            .ok("rev-parse --verify --quiet refs/remotes/origin/feature", "abc123\n")
            .ok("rev-list --count origin/feature..HEAD", "2\n")
            .ok("rev-list --count HEAD..origin/feature", "0\n");
        let state = evaluate(&git, repo());
        assert_eq!(state.upstream(), Some("origin/feature"));
        assert_eq!(state.classification(), SyncClassification::Ahead);
        assert_eq!(state.ahead(), 2);
    }

    #[test]
    fn counts_drive_classification() {
        let cases = [
            ("3\n", "0\n", SyncClassification::Ahead),
            ("0\n", "5\n", SyncClassification::Behind),
            ("2\n", "2\n", SyncClassification::Diverged),
            ("0\n", "0\n", SyncClassification::Synced),
        ];
        for (ahead, behind, expected) in cases {
            let state = evaluate(&tracked(ahead, behind), repo());
            assert_eq!(state.classification(), expected, "{ahead:?}/{behind:?}");
            assert_eq!(state.upstream(), Some("origin/main"));
        }
    }

    #[test]
    fn one_failed_count_fails_open() {
        let git = ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "main\n")
            .ok("rev-parse --abbrev-ref @{upstream}", "origin/main\n")
            .fail("rev-list --count origin/main..HEAD")
            .ok("rev-list --count HEAD..origin/main", "4\n");
        let state = evaluate(&git, repo());
        assert_eq!(state.classification(), SyncClassification::Behind);
        assert_eq!(state.ahead(), 0);
        assert_eq!(state.behind(), 4);
    }

    #[test]
    fn both_failed_counts_are_unknown_not_synced() {
        let git = ScriptedGit::new()
            .ok("remote", "origin\n")
            .ok("branch --show-current", "main\n")
            .ok("rev-parse --abbrev-ref @{upstream}", "origin/main\n");
        let state = evaluate(&git, repo());
        assert_eq!(state.classification(), SyncClassification::Unknown);
        assert_eq!((state.ahead(), state.behind()), (0, 0));
    }
}

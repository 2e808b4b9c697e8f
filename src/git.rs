use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to spawn git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: io::Error,
    },

    #[error("git {args} exited with {code:?}: {stderr}")]
    Failed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("git {args} timed out after {timeout:?}")]
    TimedOut { args: String, timeout: Duration },

    #[error("failed waiting for git {args}: {source}")]
    Wait {
        args: String,
        #[source]
        source: io::Error,
    },
}

/// Runs version-control commands for a repository.
///
/// Parser and evaluator code only talks to this trait, so they can be driven by
/// scripted output in tests.
pub trait GitRunner: Send + Sync {
    /// Runs `git <args>` in `repo` and returns its stdout when it exits successfully.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError>;

    /// Runs `git <args>` in `repo` with output discarded, killing it once `timeout` elapses.
    fn run_bounded(&self, repo: &Path, args: &[&str], timeout: Duration) -> Result<(), GitError>;
}

/// [`GitRunner`] backed by the git executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git")
    }
}

impl SystemGit {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(repo)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }
}

impl GitRunner for SystemGit {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let joined = args.join(" ");
        tracing::debug!(repo = %repo.display(), "$ git {}", joined);

        let output = self
            .command(repo, args)
            .output()
            .map_err(|source| GitError::Spawn {
                args: joined.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                args: joined,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_bounded(&self, repo: &Path, args: &[&str], timeout: Duration) -> Result<(), GitError> {
        let joined = args.join(" ");
        tracing::debug!(repo = %repo.display(), ?timeout, "$ git {}", joined);

        let mut child = self
            .command(repo, args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| GitError::Spawn {
                args: joined.clone(),
                source,
            })?;

        match child.wait_timeout(timeout) {
            Ok(Some(status)) if status.success() => Ok(()),
            Ok(Some(status)) => Err(GitError::Failed {
                args: joined,
                code: status.code(),
                stderr: String::new(),
            }),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(GitError::TimedOut {
                    args: joined,
                    timeout,
                })
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(GitError::Wait {
                    args: joined,
                    source,
                })
            }
        }
    }
}

pub const ORIGIN: &str = "origin";

pub fn status_text(git: &dyn GitRunner, repo: &Path) -> Result<String, GitError> {
    git.run(repo, &["-c", "color.status=false", "status", "--long"])
}

pub fn has_remote(git: &dyn GitRunner, repo: &Path, name: &str) -> Result<bool, GitError> {
    let out = git.run(repo, &["remote"])?;
    Ok(out.lines().any(|line| line.trim() == name))
}

/// Name of the checked-out branch, `None` when HEAD is detached.
pub fn current_branch(git: &dyn GitRunner, repo: &Path) -> Result<Option<String>, GitError> {
    let out = git.run(repo, &["branch", "--show-current"])?;
    let name = out.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

/// Configured upstream of the current branch, e.g. `origin/main`.
pub fn upstream(git: &dyn GitRunner, repo: &Path) -> Result<Option<String>, GitError> {
    let out = git.run(repo, &["rev-parse", "--abbrev-ref", "@{upstream}"])?;
    let name = out.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

pub fn ref_exists(git: &dyn GitRunner, repo: &Path, reference: &str) -> bool {
    git.run(repo, &["rev-parse", "--verify", "--quiet", reference])
        .is_ok()
}

/// Number of commits reachable from `to` but not from `from`.
pub fn count_commits(
    git: &dyn GitRunner,
    repo: &Path,
    from: &str,
    to: &str,
) -> Result<Option<u32>, GitError> {
    let range = format!("{from}..{to}");
    let out = git.run(repo, &["rev-list", "--count", &range])?;
    Ok(out.trim().parse().ok())
}

pub fn fetch_remote(
    git: &dyn GitRunner,
    repo: &Path,
    remote: &str,
    timeout: Duration,
) -> Result<(), GitError> {
    git.run_bounded(repo, &["fetch", remote], timeout)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedGit;
    use super::*;

    #[test]
    fn has_remote_matches_whole_name() {
        let repo = Path::new("/r");
        let git = ScriptedGit::new().ok("remote", "upstream\norigin-mirror\n");
        assert!(!has_remote(&git, repo, ORIGIN).unwrap());

        let git = ScriptedGit::new().ok("remote", "upstream\norigin\n");
        assert!(has_remote(&git, repo, ORIGIN).unwrap());
    }

    #[test]
    fn current_branch_empty_is_detached() {
        let repo = Path::new("/r");
        let git = ScriptedGit::new().ok("branch --show-current", "\n");
        assert_eq!(current_branch(&git, repo).unwrap(), None);

        let git = ScriptedGit::new().ok("branch --show-current", "main\n");
        assert_eq!(current_branch(&git, repo).unwrap(), Some("main".to_string()));
    }

    #[test]
    fn count_commits_garbage_is_none() {
        let repo = Path::new("/r");
        let git = ScriptedGit::new()
            .ok("rev-list --count origin/main..HEAD", "7\n")
            .ok("rev-list --count HEAD..origin/main", "not a number\n");
        assert_eq!(count_commits(&git, repo, "origin/main", "HEAD").unwrap(), Some(7));
        assert_eq!(count_commits(&git, repo, "HEAD", "origin/main").unwrap(), None);
    }

    #[test]
    fn system_git_reports_missing_executable() {
        let git = SystemGit::new("/nonexistent/git-binary");
        let err = git.run(Path::new("."), &["status"]).unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }));
    }
}

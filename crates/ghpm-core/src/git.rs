//! Thin wrapper over the `git` executable.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::exec::{CommandRunner, CommandSpec};

/// Default host repositories are cloned from.
pub const DEFAULT_GIT_BASE: &str = "https://github.com";
/// Environment variable overriding [`DEFAULT_GIT_BASE`].
pub const GIT_BASE_ENV: &str = "GHPM_GIT_BASE";

/// Clone base from `$GHPM_GIT_BASE`, else [`DEFAULT_GIT_BASE`].
pub fn git_base_from_env() -> String {
    std::env::var(GIT_BASE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_GIT_BASE.to_string())
}

/// Git failures.
#[derive(Error, Debug)]
pub enum GitError {
    /// `git clone` did not succeed.
    #[error("git clone of {url} failed: {reason}")]
    Clone {
        /// Clone URL.
        url: String,
        /// Exit status or spawn error.
        reason: String,
    },

    /// `git pull` did not succeed.
    #[error("git pull in {dir} failed: {reason}")]
    Pull {
        /// Working copy.
        dir: PathBuf,
        /// Exit status or spawn error.
        reason: String,
    },

    /// The clone destination has no parent to run git from.
    #[error("{0} has no parent directory")]
    NoParent(PathBuf),
}

/// Runs git through a [`CommandRunner`] with inherited output.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
}

impl std::fmt::Debug for Git<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").finish_non_exhaustive()
    }
}

impl<'a> Git<'a> {
    /// Git driven by `runner`.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// `git clone <url> <dest>`, run from `dest`'s parent.
    ///
    /// # Errors
    ///
    /// Returns an error if `dest` has no parent or git fails.
    pub fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let parent = dest
            .parent()
            .ok_or_else(|| GitError::NoParent(dest.to_path_buf()))?;
        let spec = CommandSpec::new("git", parent)
            .args(["clone", url])
            .arg(dest.to_string_lossy());
        let result = self.runner.run(&spec);
        if result.success() {
            Ok(())
        } else {
            Err(GitError::Clone {
                url: url.to_string(),
                reason: result.failure_reason("git clone"),
            })
        }
    }

    /// `git pull` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be started or exits non-zero.
    pub fn pull(&self, dir: &Path) -> Result<(), GitError> {
        let result = self.runner.run(&CommandSpec::new("git", dir).arg("pull"));
        if result.success() {
            Ok(())
        } else {
            Err(GitError::Pull {
                dir: dir.to_path_buf(),
                reason: result.failure_reason("git pull"),
            })
        }
    }

    /// HEAD commit of the clone in `dir`, if git can tell.
    pub fn head_commit(&self, dir: &Path) -> Option<String> {
        let result = self
            .runner
            .run(&CommandSpec::new("git", dir).args(["rev-parse", "HEAD"]).captured());
        if !result.success() {
            return None;
        }
        result
            .stdout
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecResult, ScriptedRunner};

    #[test]
    fn test_clone_runs_from_parent() {
        let runner = ScriptedRunner::new();
        let git = Git::new(&runner);
        git.clone_repo("https://github.com/a/b.git", Path::new("/tmp/pkgs/b"))
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].display(), "git clone https://github.com/a/b.git /tmp/pkgs/b");
        assert_eq!(calls[0].cwd, PathBuf::from("/tmp/pkgs"));
    }

    #[test]
    fn test_clone_failure_is_typed() {
        let runner = ScriptedRunner::new().fail("git clone https://github.com/a/b.git /tmp/b");
        let err = Git::new(&runner)
            .clone_repo("https://github.com/a/b.git", Path::new("/tmp/b"))
            .unwrap_err();
        assert!(matches!(err, GitError::Clone { .. }));
    }

    #[test]
    fn test_head_commit_trims_output() {
        let runner = ScriptedRunner::new().respond(
            "git rev-parse HEAD",
            ExecResult {
                stdout: Some("abc123\n".into()),
                ..ExecResult::ok()
            },
        );
        assert_eq!(
            Git::new(&runner).head_commit(Path::new("/repo")).as_deref(),
            Some("abc123")
        );

        let failing = ScriptedRunner::new().fail("git rev-parse HEAD");
        assert_eq!(Git::new(&failing).head_commit(Path::new("/repo")), None);
    }

    #[test]
    fn test_pull_failure() {
        let runner = ScriptedRunner::new().fail("git pull");
        let err = Git::new(&runner).pull(Path::new("/repo")).unwrap_err();
        assert!(err.to_string().contains("git pull"));
    }
}

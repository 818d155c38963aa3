//! Repositories that ship an install script.

use std::path::{Path, PathBuf};

use ghpm_schema::{Ecosystem, reason};

use super::{BuildAttempt, BuildPlan, ResolveContext, Strategy, scan_entry_points};
use crate::files;
use crate::resolver::BinaryCandidate;

/// Repositories whose only build system is an `install*.sh` script.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellStrategy;

/// First top-level `*.sh` file (by name) whose name contains `install`,
/// case-insensitively.
pub fn find_install_script(repo_root: &Path) -> Option<PathBuf> {
    files::list_files(repo_root).into_iter().find(|path| {
        let name = files::file_name(path);
        name.ends_with(".sh") && name.to_lowercase().contains("install")
    })
}

impl Strategy for ShellStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Shell
    }

    fn detect(&self, repo_root: &Path) -> bool {
        find_install_script(repo_root).is_some()
    }

    fn plan(&self, repo_root: &Path) -> BuildPlan {
        let Some(script) = find_install_script(repo_root) else {
            return BuildPlan::Unavailable(reason::NO_INSTALL_SCRIPT.to_string());
        };
        let script_arg = script.to_string_lossy().to_string();
        let description = format!("./{}", files::file_name(&script));
        BuildPlan::Fallback(vec![
            BuildAttempt::new("sh", &["sh", script_arg.as_str()], description).make_executable(script),
        ])
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        scan_entry_points(ctx.repo_root, ctx.repo_name, &[".sh"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_script_lookup() {
        let repo = tempdir().unwrap();
        std::fs::write(repo.path().join("build.sh"), "").unwrap();
        std::fs::write(repo.path().join("Install-linux.sh"), "").unwrap();
        std::fs::write(repo.path().join("install.sh"), "").unwrap();
        std::fs::write(repo.path().join("install.txt"), "").unwrap();

        let script = find_install_script(repo.path()).unwrap();
        assert_eq!(files::file_name(&script), "Install-linux.sh");
    }

    #[test]
    fn test_plan_runs_script_through_sh() {
        let repo = tempdir().unwrap();
        std::fs::write(repo.path().join("install.sh"), "").unwrap();

        let BuildPlan::Fallback(attempts) = ShellStrategy.plan(repo.path()) else {
            panic!("expected fallback plan");
        };
        let attempt = &attempts[0];
        assert_eq!(attempt.tool_required, "sh");
        assert_eq!(attempt.description, "./install.sh");
        assert_eq!(attempt.command[1], repo.path().join("install.sh").to_string_lossy());
        assert_eq!(attempt.make_executable, Some(repo.path().join("install.sh")));
    }

    #[test]
    fn test_without_script() {
        let repo = tempdir().unwrap();
        std::fs::write(repo.path().join("run.sh"), "").unwrap();
        assert!(!ShellStrategy.detect(repo.path()));
        assert_eq!(
            ShellStrategy.plan(repo.path()),
            BuildPlan::Unavailable(reason::NO_INSTALL_SCRIPT.to_string())
        );
    }
}

//! Go modules: `go install`, falling back to `go build`.

use std::path::Path;

use ghpm_schema::Ecosystem;

use super::{BuildAttempt, BuildPlan, ResolveContext, Strategy};
use crate::resolver::BinaryCandidate;

/// Go modules.
///
/// `go install` drops the binary in the global Go bin directory; `go build`
/// leaves it in the repository root.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoStrategy;

impl Strategy for GoStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn markers(&self) -> &'static [&'static str] {
        &["go.mod"]
    }

    fn plan(&self, _repo_root: &Path) -> BuildPlan {
        BuildPlan::Fallback(vec![
            BuildAttempt::new("go", &["go", "install"], "go install"),
            BuildAttempt::new("go", &["go", "build"], "go build"),
        ])
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        let installed = ctx
            .go_bin_dir
            .map(|dir| dir.join(ctx.repo_name))
            .filter(|p| p.is_file());
        let local = || Some(ctx.repo_root.join(ctx.repo_name)).filter(|p| p.is_file());

        installed
            .or_else(local)
            .map(BinaryCandidate::new)
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plan_is_install_then_build() {
        let BuildPlan::Fallback(attempts) = GoStrategy.plan(Path::new("/repo")) else {
            panic!("expected a fallback chain");
        };
        let descriptions: Vec<&str> = attempts.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(descriptions, vec!["go install", "go build"]);
        assert!(attempts.iter().all(|a| a.tool_required == "go"));
    }

    #[test]
    fn test_candidates_prefer_go_bin_dir() {
        let repo = tempdir().unwrap();
        let gobin = tempdir().unwrap();
        std::fs::write(gobin.path().join("fzf"), "").unwrap();
        std::fs::write(repo.path().join("fzf"), "").unwrap();

        let ctx = ResolveContext {
            repo_root: repo.path(),
            repo_name: "fzf",
            go_bin_dir: Some(gobin.path()),
        };
        let found = GoStrategy.candidates(&ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, gobin.path().join("fzf"));
    }

    #[test]
    fn test_candidates_fall_back_to_repo_root() {
        let repo = tempdir().unwrap();
        let gobin = tempdir().unwrap();
        std::fs::write(repo.path().join("fzf"), "").unwrap();

        let ctx = ResolveContext {
            repo_root: repo.path(),
            repo_name: "fzf",
            go_bin_dir: Some(gobin.path()),
        };
        let found = GoStrategy.candidates(&ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, repo.path().join("fzf"));

        let empty = ResolveContext {
            repo_name: "other",
            ..ctx
        };
        assert!(GoStrategy.candidates(&empty).is_empty());
    }
}

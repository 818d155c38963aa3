//! Ruby gems and Gemfile projects. Nothing is built.

use std::path::Path;

use ghpm_schema::Ecosystem;

use super::{BuildPlan, ResolveContext, Strategy};
use crate::files;
use crate::resolver::BinaryCandidate;

/// Ruby projects. Nothing is built; scripts under `bin/` are linked as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyStrategy;

fn has_gemspec(repo_root: &Path) -> bool {
    let pattern = format!(
        "{}/*.gemspec",
        glob::Pattern::escape(&repo_root.to_string_lossy())
    );
    glob::glob(&pattern)
        .map(|mut paths| paths.any(|p| p.is_ok()))
        .unwrap_or(false)
}

impl Strategy for RubyStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Ruby
    }

    fn markers(&self) -> &'static [&'static str] {
        &["Gemfile"]
    }

    fn detect(&self, repo_root: &Path) -> bool {
        repo_root.join("Gemfile").exists() || has_gemspec(repo_root)
    }

    fn plan(&self, _repo_root: &Path) -> BuildPlan {
        BuildPlan::NotRequired
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        let bin_dir = ctx.repo_root.join("bin");
        let named = bin_dir.join(ctx.repo_name);
        if named.is_file() {
            return vec![BinaryCandidate::new(named)];
        }
        files::list_files(&bin_dir)
            .into_iter()
            .map(BinaryCandidate::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detects_gemfile_or_gemspec() {
        let with_gemfile = tempdir().unwrap();
        std::fs::write(with_gemfile.path().join("Gemfile"), "").unwrap();
        assert!(RubyStrategy.detect(with_gemfile.path()));

        let with_gemspec = tempdir().unwrap();
        std::fs::write(with_gemspec.path().join("thing.gemspec"), "").unwrap();
        assert!(RubyStrategy.detect(with_gemspec.path()));

        let neither = tempdir().unwrap();
        std::fs::write(neither.path().join("Rakefile"), "").unwrap();
        assert!(!RubyStrategy.detect(neither.path()));
    }

    #[test]
    fn test_named_bin_wins() {
        let repo = tempdir().unwrap();
        std::fs::create_dir(repo.path().join("bin")).unwrap();
        std::fs::write(repo.path().join("bin/tool"), "").unwrap();
        std::fs::write(repo.path().join("bin/setup"), "").unwrap();

        let ctx = ResolveContext {
            repo_root: repo.path(),
            repo_name: "tool",
            go_bin_dir: None,
        };
        let found = RubyStrategy.candidates(&ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, repo.path().join("bin/tool"));

        let ctx = ResolveContext {
            repo_name: "other",
            ..ctx
        };
        assert_eq!(RubyStrategy.candidates(&ctx).len(), 2);
    }

    #[test]
    fn test_plan_is_not_required() {
        assert_eq!(RubyStrategy.plan(Path::new("/x")), BuildPlan::NotRequired);
    }
}

//! npm packages and their `bin` entries.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use ghpm_schema::Ecosystem;
use serde::Deserialize;

use super::{BuildAttempt, BuildPlan, ResolveContext, Strategy, scan_entry_points};
use crate::resolver::BinaryCandidate;

/// npm packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeStrategy;

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bin: Option<BinField>,
}

/// The `bin` field: a single path, or a map of command name to path.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BinField {
    Single(String),
    Map(BTreeMap<String, String>),
}

/// Command name npm derives from a package name: the scope is dropped.
fn command_name(package: &str) -> &str {
    package.rsplit('/').next().unwrap_or(package)
}

/// Join a manifest-relative path onto the root, dropping `.` components.
fn manifest_path(root: &Path, rel: &str) -> PathBuf {
    let cleaned: PathBuf = Path::new(rel)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    root.join(cleaned)
}

/// Entry points declared by `package.json`, paired with their command names.
fn declared_bins(repo_root: &Path) -> Vec<(String, PathBuf)> {
    let Ok(content) = std::fs::read_to_string(repo_root.join("package.json")) else {
        return Vec::new();
    };
    let manifest: PackageJson = match serde_json::from_str(&content) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!("Ignoring unparsable package.json: {e}");
            return Vec::new();
        }
    };

    match manifest.bin {
        Some(BinField::Single(path)) => manifest
            .name
            .map(|name| vec![(command_name(&name).to_string(), manifest_path(repo_root, &path))])
            .unwrap_or_default(),
        Some(BinField::Map(map)) => map
            .into_iter()
            .map(|(cmd, path)| (cmd, manifest_path(repo_root, &path)))
            .collect(),
        None => Vec::new(),
    }
}

impl Strategy for NodeStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::NodeJS
    }

    fn markers(&self) -> &'static [&'static str] {
        &["package.json"]
    }

    fn plan(&self, _repo_root: &Path) -> BuildPlan {
        BuildPlan::Fallback(vec![BuildAttempt::new(
            "npm",
            &["npm", "install"],
            "npm install",
        )])
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        let mut found: Vec<BinaryCandidate> = declared_bins(ctx.repo_root)
            .into_iter()
            .filter(|(_, path)| path.is_file())
            .map(|(cmd, path)| BinaryCandidate::named(path, cmd))
            .collect();
        found.extend(scan_entry_points(ctx.repo_root, ctx.repo_name, &[".js"]));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ctx(root: &Path) -> ResolveContext<'_> {
        ResolveContext {
            repo_root: root,
            repo_name: "tldr",
            go_bin_dir: None,
        }
    }

    #[test]
    fn test_bin_string_is_paired_with_package_name() {
        let repo = tempdir().unwrap();
        std::fs::create_dir(repo.path().join("lib")).unwrap();
        std::fs::write(repo.path().join("lib/cli.mjs"), "").unwrap();
        std::fs::write(
            repo.path().join("package.json"),
            r#"{"name": "@scope/pretty", "bin": "./lib/cli.mjs"}"#,
        )
        .unwrap();

        let found = NodeStrategy.candidates(&ctx(repo.path()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, repo.path().join("lib/cli.mjs"));
        assert_eq!(found[0].command.as_deref(), Some("pretty"));
    }

    #[test]
    fn test_bin_map_yields_each_command() {
        let repo = tempdir().unwrap();
        std::fs::create_dir(repo.path().join("bin")).unwrap();
        std::fs::write(repo.path().join("bin/a.js"), "").unwrap();
        std::fs::write(repo.path().join("bin/b.js"), "").unwrap();
        std::fs::write(
            repo.path().join("package.json"),
            r#"{"name": "x", "bin": {"alpha": "bin/a.js", "beta": "bin/b.js", "gone": "bin/c.js"}}"#,
        )
        .unwrap();

        let found = NodeStrategy.candidates(&ctx(repo.path()));
        let declared: Vec<_> = found
            .iter()
            .filter_map(|c| c.command.clone())
            .collect();
        assert_eq!(declared, vec!["alpha", "beta"]);
        // The scan also sees bin/*.js; duplicates are removed by the resolver
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_scan_finds_named_and_js_files() {
        let repo = tempdir().unwrap();
        std::fs::write(repo.path().join("package.json"), "{}").unwrap();
        std::fs::write(repo.path().join("tldr"), "").unwrap();
        std::fs::write(repo.path().join("index.js"), "").unwrap();
        std::fs::write(repo.path().join("README.md"), "").unwrap();

        let mut names: Vec<String> = NodeStrategy
            .candidates(&ctx(repo.path()))
            .iter()
            .map(|c| crate::files::file_name(&c.path))
            .collect();
        names.sort();
        assert_eq!(names, vec!["index.js", "tldr"]);
    }

    #[test]
    fn test_command_name_strips_scope() {
        assert_eq!(command_name("@scope/tool"), "tool");
        assert_eq!(command_name("tool"), "tool");
    }
}

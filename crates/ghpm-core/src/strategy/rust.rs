//! Cargo packages.

use std::path::Path;

use ghpm_schema::Ecosystem;
use serde::Deserialize;

use super::{BuildAttempt, BuildPlan, ResolveContext, Strategy};
use crate::resolver::BinaryCandidate;

/// Cargo packages. Binaries are looked up under `target/release`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustStrategy;

#[derive(Debug, Default, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
    #[serde(default)]
    bin: Vec<CargoBin>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CargoBin {
    name: Option<String>,
}

/// Binary names declared by `Cargo.toml`: every `[[bin]]` name plus the
/// package name. Unreadable or workspace-only manifests declare none.
fn declared_binaries(repo_root: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(repo_root.join("Cargo.toml")) else {
        return Vec::new();
    };
    let manifest: CargoManifest = match toml::from_str(&content) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!("Ignoring unparsable Cargo.toml: {e}");
            return Vec::new();
        }
    };

    manifest
        .bin
        .into_iter()
        .filter_map(|b| b.name)
        .chain(manifest.package.map(|p| p.name))
        .collect()
}

impl Strategy for RustStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }

    fn markers(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    fn plan(&self, _repo_root: &Path) -> BuildPlan {
        BuildPlan::Fallback(vec![
            BuildAttempt::new(
                "cargo",
                &["cargo", "install", "--path", "."],
                "cargo install --path .",
            ),
            BuildAttempt::new(
                "cargo",
                &["cargo", "build", "--release"],
                "cargo build --release",
            ),
        ])
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        let release = ctx.repo_root.join("target").join("release");

        std::iter::once(ctx.repo_name.to_string())
            .chain(declared_binaries(ctx.repo_root))
            .map(|name| release.join(name))
            .filter(|p| p.is_file())
            .map(BinaryCandidate::new)
            .collect()
    }
}

//! Ecosystem detection.

use std::path::Path;

use ghpm_schema::Ecosystem;

use crate::strategy::StrategyRegistry;

/// Classify a cloned repository.
///
/// Strategies are consulted in registry order and the first match wins, so a
/// repository with both `go.mod` and `package.json` is Go. Never fails and
/// never writes: a repository nobody claims is [`Ecosystem::Unknown`].
pub fn detect(registry: &StrategyRegistry, repo_root: &Path) -> Ecosystem {
    let found = registry
        .iter()
        .find(|s| s.detect(repo_root))
        .map_or(Ecosystem::Unknown, |s| s.ecosystem());
    tracing::debug!(repo = %repo_root.display(), ecosystem = %found, "detected ecosystem");
    found
}

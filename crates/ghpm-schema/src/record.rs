//! Persisted per-package metadata.
//!
//! One JSON document per installed package, keyed by package name. The
//! ecosystem and build outcome are denormalized here so `list` and `info`
//! never need to touch the cloned repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::repo::GitHubRepo;
use crate::types::{BuildOutcome, Ecosystem, PackageName};

/// Metadata describing one installed package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Package name (the repository name).
    pub name: PackageName,
    /// Source repository.
    pub repo: GitHubRepo,
    /// Clone URL.
    pub url: String,
    /// Time of the last install or update.
    pub installed_at: DateTime<Utc>,
    /// HEAD commit after the last clone or pull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Ecosystem detected during the last install or update.
    #[serde(default)]
    pub language: Ecosystem,
    /// Whether the last build succeeded.
    #[serde(default)]
    pub built: bool,
    /// Description of the last build attempt.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_cmd: String,
    /// Why the last build did not succeed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_reason: String,
    /// Symlinks created in the link directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binaries: Vec<PathBuf>,
    /// Executables those links point at. Some live outside the package
    /// directory, e.g. in the Go bin directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link_sources: Vec<PathBuf>,
}

impl ManifestRecord {
    /// Fresh record for a just-cloned repository.
    pub fn new(repo: GitHubRepo, url: impl Into<String>) -> Self {
        Self {
            name: PackageName::new(repo.name()),
            repo,
            url: url.into(),
            installed_at: Utc::now(),
            commit: None,
            language: Ecosystem::Unknown,
            built: false,
            build_cmd: String::new(),
            build_reason: String::new(),
            binaries: Vec::new(),
            link_sources: Vec::new(),
        }
    }

    /// Copy a build outcome into the denormalized fields.
    pub fn apply_outcome(&mut self, language: Ecosystem, outcome: &BuildOutcome) {
        self.language = language;
        self.built = outcome.succeeded;
        self.build_cmd.clone_from(&outcome.attempt_description);
        self.build_reason.clone_from(&outcome.reason);
    }

    /// Reconstruct the outcome from the denormalized fields.
    pub fn outcome(&self) -> BuildOutcome {
        BuildOutcome {
            succeeded: self.built,
            attempt_description: self.build_cmd.clone(),
            reason: self.build_reason.clone(),
        }
    }
}

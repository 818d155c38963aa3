//! Package names, ecosystems and build outcomes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use thiserror::Error;

/// A string that cannot name a package directory.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid package name '{0}'")]
pub struct InvalidPackageName(pub String);

/// A package name as stored on disk: the repository name, case preserved.
///
/// Binary lookups match files named after the repository, so unlike most
/// registries we must not normalize case here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name.
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Validate a user-supplied name before it is joined onto a directory.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPackageName`] for an empty name, `.`, `..`, or a name
    /// containing a path separator.
    pub fn parse(name: &str) -> Result<Self, InvalidPackageName> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(InvalidPackageName(name.to_string()));
        }
        Ok(Self::new(name))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::ffi::OsStr> for PackageName {
    fn as_ref(&self) -> &std::ffi::OsStr {
        self.0.as_ref()
    }
}

impl AsRef<std::path::Path> for PackageName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The build/packaging toolchain a repository is written for.
///
/// Exactly one tag is assigned per repository snapshot. The serialized form
/// is the human-readable label shown by `ghpm list` and `ghpm info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Ecosystem {
    /// Go modules (`go.mod`).
    Go,
    /// Cargo packages (`Cargo.toml`).
    Rust,
    /// npm packages (`package.json`).
    #[serde(rename = "Node")]
    NodeJS,
    /// `setup.py`, `pyproject.toml` or `requirements.txt`.
    Python,
    /// `Gemfile` or a `*.gemspec`.
    Ruby,
    /// `Makefile` or `CMakeLists.txt`.
    #[serde(rename = "C/C++")]
    CCpp,
    /// A top-level `*install*.sh` script.
    Shell,
    /// No recognized evidence.
    #[default]
    Unknown,
}

impl Ecosystem {
    /// All known ecosystems in detection priority order, `Unknown` excluded.
    pub const DETECTION_ORDER: [Ecosystem; 7] = [
        Ecosystem::Go,
        Ecosystem::Rust,
        Ecosystem::NodeJS,
        Ecosystem::Python,
        Ecosystem::Ruby,
        Ecosystem::CCpp,
        Ecosystem::Shell,
    ];

    /// Human-readable label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::NodeJS => "Node",
            Self::Python => "Python",
            Self::Ruby => "Ruby",
            Self::CCpp => "C/C++",
            Self::Shell => "Shell",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns `true` for ecosystems whose artifacts are scripts that need
    /// the execute bit set before they can be linked and invoked directly.
    pub fn is_interpreted(self) -> bool {
        matches!(
            self,
            Self::NodeJS | Self::Python | Self::Shell | Self::Ruby
        )
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Well-known `BuildOutcome::reason` values.
pub mod reason {
    /// Detection found no evidence of any ecosystem.
    pub const UNKNOWN_LANGUAGE: &str = "unknown language";
    /// The ecosystem installs without a build step (Ruby).
    pub const NO_BUILD_REQUIRED: &str = "no build required";
    /// The user asked for `--no-build`.
    pub const SKIPPED: &str = "skipped";
    /// A Shell repository without an install script.
    pub const NO_INSTALL_SCRIPT: &str = "no install script found";
    /// A C/C++ repository without a usable Makefile or CMake project.
    pub const NO_BUILD_SYSTEM: &str = "no build system found";

    /// Reason recorded when a required tool is not on `PATH`.
    pub fn missing_tool(tool: &str) -> String {
        format!("missing {tool}")
    }
}

/// Result of one build phase of an install or update.
///
/// `reason` is empty on success and populated whenever the build failed or
/// was not attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    /// Whether a build attempt ran and exited successfully.
    pub succeeded: bool,
    /// Description of the last attempt tried (e.g. `go install`).
    pub attempt_description: String,
    /// Why the build did not succeed; empty on success.
    pub reason: String,
}

impl BuildOutcome {
    /// A successful attempt.
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            attempt_description: description.into(),
            reason: String::new(),
        }
    }

    /// A failed attempt or a build that never started.
    pub fn failure(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            attempt_description: description.into(),
            reason: reason.into(),
        }
    }

    /// A build that was not attempted at all.
    pub fn not_attempted(reason: impl Into<String>) -> Self {
        Self::failure(String::new(), reason)
    }

    /// `true` when the package can be published: it either built, or its
    /// ecosystem needs no build step.
    pub fn usable(&self) -> bool {
        self.succeeded || self.reason == reason::NO_BUILD_REQUIRED
    }
}

//! Binary discovery.
//!
//! Runs after a usable build. Each strategy yields raw candidates; this
//! module removes duplicates and, for interpreted ecosystems, marks scripts
//! executable before they are linked.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ghpm_schema::Ecosystem;

use crate::files;
use crate::strategy::{ResolveContext, StrategyRegistry};

/// A file that should be exposed on the user's `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryCandidate {
    /// Absolute path inside the package directory.
    pub path: PathBuf,
    /// Command name declared by the project's own metadata, if any.
    pub command: Option<String>,
    /// Whether the file is executable after resolution.
    pub executable: bool,
}

impl BinaryCandidate {
    /// Candidate linked under its own file name.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            command: None,
            executable: false,
        }
    }

    /// Candidate linked under a declared command name.
    pub fn named(path: PathBuf, command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Self::new(path)
        }
    }

    /// Name of the symlink to create.
    pub fn link_name(&self) -> String {
        self.command
            .clone()
            .unwrap_or_else(|| files::file_name(&self.path))
    }
}

/// Finds binaries through the registered strategies.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a StrategyRegistry,
    go_bin_dir: Option<&'a Path>,
}

impl<'a> Resolver<'a> {
    /// Resolver over `registry`. `go_bin_dir` is where `go install` puts binaries.
    pub fn new(registry: &'a StrategyRegistry, go_bin_dir: Option<&'a Path>) -> Self {
        Self {
            registry,
            go_bin_dir,
        }
    }

    /// Candidate binaries of a built repository.
    ///
    /// The returned iterator is lazy: the filesystem is not scanned until it
    /// is first advanced. Paths are unique.
    pub fn resolve(&self, repo_root: &'a Path, repo_name: &'a str, ecosystem: Ecosystem) -> Candidates<'a> {
        Candidates {
            registry: self.registry,
            ctx: ResolveContext {
                repo_root,
                repo_name,
                go_bin_dir: self.go_bin_dir,
            },
            ecosystem,
            pending: None,
            seen: HashSet::new(),
        }
    }
}

/// Lazy, de-duplicating candidate stream returned by [`Resolver::resolve`].
#[derive(Debug)]
pub struct Candidates<'a> {
    registry: &'a StrategyRegistry,
    ctx: ResolveContext<'a>,
    ecosystem: Ecosystem,
    pending: Option<std::vec::IntoIter<BinaryCandidate>>,
    seen: HashSet<PathBuf>,
}

impl Candidates<'_> {
    fn scan_strategy(&self) -> std::vec::IntoIter<BinaryCandidate> {
        let found = self
            .registry
            .get(self.ecosystem)
            .map(|s| s.candidates(&self.ctx))
            .unwrap_or_default();
        tracing::debug!(
            ecosystem = %self.ecosystem,
            count = found.len(),
            "scanned for binaries"
        );
        found.into_iter()
    }

    fn prepare(&self, mut candidate: BinaryCandidate) -> BinaryCandidate {
        if self.ecosystem.is_interpreted()
            && let Err(e) = files::ensure_executable(&candidate.path)
        {
            tracing::warn!("Could not mark {} executable: {e}", candidate.path.display());
        }
        candidate.executable = files::is_executable_file(&candidate.path);
        candidate
    }
}

impl Iterator for Candidates<'_> {
    type Item = BinaryCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_none() {
            self.pending = Some(self.scan_strategy());
        }
        loop {
            let candidate = self.pending.as_mut()?.next()?;
            if self.seen.insert(candidate.path.clone()) {
                return Some(self.prepare(candidate));
            }
        }
    }
}

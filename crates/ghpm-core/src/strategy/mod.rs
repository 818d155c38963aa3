//! Per-ecosystem build strategies.
//!
//! Each ecosystem is one [`Strategy`] object answering three questions:
//! does this repository belong to me, what should be run to build it, and
//! where do its executables end up. The [`StrategyRegistry`] holds them in
//! detection priority order, so adding an ecosystem never touches the shared
//! orchestration in [`crate::builder`], [`crate::resolver`] or
//! [`crate::pipeline`].

use std::path::{Path, PathBuf};

use ghpm_schema::Ecosystem;

use crate::files;
use crate::resolver::BinaryCandidate;

pub mod cpp;
pub mod go;
pub mod node;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod shell;

pub use cpp::CppStrategy;
pub use go::GoStrategy;
pub use node::NodeStrategy;
pub use python::PythonStrategy;
pub use ruby::RubyStrategy;
pub use rust::RustStrategy;
pub use shell::ShellStrategy;

/// Name of the out-of-tree build directory used by CMake flows.
pub const BUILD_SUBDIR: &str = "build";

/// Where a build command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkDir {
    /// The repository root.
    #[default]
    RepoRoot,
    /// `<repo>/build`, created on demand.
    BuildSubdir,
}

impl WorkDir {
    /// Absolute directory for a given repository root.
    pub fn resolve(self, repo_root: &Path) -> PathBuf {
        match self {
            Self::RepoRoot => repo_root.to_path_buf(),
            Self::BuildSubdir => repo_root.join(BUILD_SUBDIR),
        }
    }
}

/// A command run after an attempt's primary command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Argument vector, program first.
    pub command: Vec<String>,
    /// Where it runs.
    pub workdir: WorkDir,
    /// A soft step's failure is logged and ignored.
    pub soft: bool,
}

/// One candidate way of building a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildAttempt {
    /// Tool that must be on `PATH` before anything in this attempt runs.
    pub tool_required: String,
    /// Primary command, program first.
    pub command: Vec<String>,
    /// Where the primary command runs.
    pub workdir: WorkDir,
    /// Human-readable summary stored in the manifest, e.g. `go install`.
    pub description: String,
    /// Commands chained after the primary one.
    pub followups: Vec<Step>,
    /// File to mark executable before spawning.
    pub make_executable: Option<PathBuf>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

impl BuildAttempt {
    /// Attempt running `command` in the repository root.
    pub fn new(tool: &str, command: &[&str], description: impl Into<String>) -> Self {
        Self {
            tool_required: tool.to_string(),
            command: argv(command),
            workdir: WorkDir::RepoRoot,
            description: description.into(),
            followups: Vec::new(),
            make_executable: None,
        }
    }

    /// Run the primary command in the build subdirectory.
    pub fn in_build_dir(mut self) -> Self {
        self.workdir = WorkDir::BuildSubdir;
        self
    }

    /// Chain a required command.
    pub fn then(mut self, command: &[&str], workdir: WorkDir) -> Self {
        self.followups.push(Step {
            command: argv(command),
            workdir,
            soft: false,
        });
        self
    }

    /// Chain a command whose failure is only a warning.
    pub fn then_soft(mut self, command: &[&str], workdir: WorkDir) -> Self {
        self.followups.push(Step {
            command: argv(command),
            workdir,
            soft: true,
        });
        self
    }

    /// Tools that must be present before anything runs: the primary tool,
    /// then the programs of required follow-up steps.
    pub fn required_tools(&self) -> Vec<&str> {
        let mut tools = vec![self.tool_required.as_str()];
        for step in self.followups.iter().filter(|s| !s.soft) {
            if let Some(program) = step.command.first()
                && !tools.contains(&program.as_str())
            {
                tools.push(program);
            }
        }
        tools
    }

    /// Ensure `path` is executable before the primary command runs.
    pub fn make_executable(mut self, path: PathBuf) -> Self {
        self.make_executable = Some(path);
        self
    }
}

/// What the executor should do for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    /// The ecosystem is usable as cloned.
    NotRequired,
    /// There is nothing to run; the string is the recorded reason.
    Unavailable(String),
    /// Try in order, each attempt a fallback for the previous one's failure.
    /// A missing tool stops the chain.
    Fallback(Vec<BuildAttempt>),
    /// Independent toolchains in preference order. The first attempt whose
    /// required tools are all present runs exclusively.
    Alternates(Vec<BuildAttempt>),
}

/// Inputs for binary discovery.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Repository root.
    pub repo_root: &'a Path,
    /// Repository (and package) name.
    pub repo_name: &'a str,
    /// Global `go install` output directory.
    pub go_bin_dir: Option<&'a Path>,
}

/// Capability set of one ecosystem.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// The ecosystem this strategy handles.
    fn ecosystem(&self) -> Ecosystem;

    /// Marker files whose presence at the repository root identifies the
    /// ecosystem.
    fn markers(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the repository belongs to this ecosystem. Read-only.
    fn detect(&self, repo_root: &Path) -> bool {
        self.markers()
            .iter()
            .any(|marker| repo_root.join(marker).exists())
    }

    /// Build plan for the repository.
    fn plan(&self, repo_root: &Path) -> BuildPlan;

    /// Candidate executables, in discovery order. May contain duplicates.
    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate>;
}

/// Strategies in detection priority order.
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRegistry {
    /// The built-in strategies. Manifest-backed ecosystems come first;
    /// the weak shell-script heuristic is consulted last.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(GoStrategy),
                Box::new(RustStrategy),
                Box::new(NodeStrategy),
                Box::new(PythonStrategy),
                Box::new(RubyStrategy),
                Box::new(CppStrategy),
                Box::new(ShellStrategy),
            ],
        }
    }

    /// Registry with a custom strategy list, already in priority order.
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy for `ecosystem`, if registered.
    pub fn get(&self, ecosystem: Ecosystem) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.ecosystem() == ecosystem)
            .map(AsRef::as_ref)
    }

    /// Strategies in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.strategies.iter().map(AsRef::as_ref)
    }
}

/// Files in `<root>` and `<root>/bin` that look like entry points of an
/// interpreted project: named after the repository, containing `install`,
/// or ending in one of `suffixes`.
pub(crate) fn scan_entry_points(root: &Path, name: &str, suffixes: &[&str]) -> Vec<BinaryCandidate> {
    [root.to_path_buf(), root.join("bin")]
        .iter()
        .flat_map(|dir| files::list_files(dir))
        .filter(|path| {
            let file = files::file_name(path);
            file == name
                || file.to_lowercase().contains("install")
                || suffixes.iter().any(|s| file.ends_with(s))
        })
        .map(BinaryCandidate::new)
        .collect()
}

//! The install/update state machine.
//!
//! ```text
//! Detecting ──▶ Building ──▶ Resolving ──▶ Linking ──▶ Done
//!                   │                                   ▲
//!                   └──── outcome not usable ───────────┘
//! ```

use std::path::Path;

use ghpm_schema::{BuildOutcome, Ecosystem};

use crate::builder::Builder;
use crate::config::Settings;
use crate::detect::detect;
use crate::exec::CommandRunner;
use crate::linker::{LinkReport, Linker};
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::strategy::StrategyRegistry;
use crate::toolchain::ToolProbe;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Classifying the repository.
    Detecting,
    /// Running the build plan.
    Building,
    /// Looking for produced executables.
    Resolving,
    /// Symlinking them into the link directory.
    Linking,
    /// Finished, built or not.
    Done,
}

/// What one pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Detected ecosystem.
    pub ecosystem: Ecosystem,
    /// Build result.
    pub outcome: BuildOutcome,
    /// Link pass, absent when the build was not usable.
    pub links: Option<LinkReport>,
    /// Stages visited, in order.
    pub stages: Vec<Stage>,
}

impl PipelineReport {
    /// Links created by this run.
    pub fn binaries(&self) -> Vec<std::path::PathBuf> {
        self.links.as_ref().map(LinkReport::links).unwrap_or_default()
    }
}

/// Detect, build, resolve and link one cloned repository.
pub struct Pipeline<'a> {
    registry: &'a StrategyRegistry,
    probe: &'a dyn ToolProbe,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    settings: &'a Settings,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline over the given seams.
    pub fn new(
        registry: &'a StrategyRegistry,
        probe: &'a dyn ToolProbe,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
        settings: &'a Settings,
    ) -> Self {
        Self {
            registry,
            probe,
            runner,
            reporter,
            settings,
        }
    }

    /// Run every stage against `repo_root`, a clone of the repository `name`.
    pub fn run(&self, repo_root: &Path, name: &str) -> PipelineReport {
        let mut stages = vec![Stage::Detecting];
        let ecosystem = detect(self.registry, repo_root);
        self.reporter.info(&format!("Detected language: {ecosystem}"));

        stages.push(Stage::Building);
        self.reporter.section("Building");
        let outcome = Builder::new(self.registry, self.probe, self.runner, self.reporter)
            .no_build(self.settings.no_build)
            .build(repo_root, ecosystem);

        if !outcome.usable() {
            tracing::debug!(reason = %outcome.reason, "build not usable, skipping link");
            stages.push(Stage::Done);
            return PipelineReport {
                ecosystem,
                outcome,
                links: None,
                stages,
            };
        }

        stages.push(Stage::Resolving);
        let resolver = Resolver::new(self.registry, self.settings.go_bin_dir.as_deref());
        let candidates = resolver.resolve(repo_root, name, ecosystem);

        stages.push(Stage::Linking);
        self.reporter.section("Linking");
        let links = Linker::new(&self.settings.link_dir, self.reporter)
            .with_path_var(self.settings.path_var.clone())
            .link(candidates);

        stages.push(Stage::Done);
        PipelineReport {
            ecosystem,
            outcome,
            links: Some(links),
            stages,
        }
    }
}

//! Shared command context.
//!
//! Groups the directory layout, settings and process seams every command
//! needs, resolved once from the command line and environment.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ghpm_core::exec::SystemRunner;
use ghpm_core::manifest::ManifestStore;
use ghpm_core::paths;
use ghpm_core::toolchain::PathProbe;
use ghpm_core::{Layout, Pipeline, PipelineReport, Settings, StrategyRegistry};

use super::error::PackageError;
use crate::Cli;
use crate::ui::Output;

/// Groups common state used by the commands.
#[derive(Clone)]
pub struct Context {
    pub layout: Layout,
    pub settings: Settings,
    pub registry: Arc<StrategyRegistry>,
    pub probe: PathProbe,
    pub runner: SystemRunner,
    pub output: Output,
    pub git_base: String,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("settings", &self.settings)
            .field("git_base", &self.git_base)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context for an explicit layout with default settings.
    pub fn new(layout: Layout, quiet: bool) -> Self {
        let settings = Settings::from_layout(&layout);
        Self {
            layout,
            settings,
            registry: Arc::new(StrategyRegistry::new()),
            probe: PathProbe::new(),
            runner: SystemRunner::new(),
            output: Output::new(quiet),
            git_base: ghpm_core::git::git_base_from_env(),
        }
    }

    /// Resolve the context from parsed arguments and the environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, PackageError> {
        let base = cli
            .home
            .clone()
            .or_else(paths::try_ghpm_home)
            .ok_or(PackageError::NoHome)?;
        let bin = cli
            .bin_dir
            .clone()
            .or_else(paths::try_bin_dir)
            .ok_or(PackageError::NoHome)?;

        let mut ctx = Self::new(Layout::new(base, bin), cli.quiet);
        ctx.runner = SystemRunner::new().with_timeout(cli.build_timeout.map(Duration::from_secs));
        Ok(ctx)
    }

    /// Copy of this context with `--no-build` applied.
    pub fn with_no_build(&self, no_build: bool) -> Self {
        let mut ctx = self.clone();
        ctx.settings = ctx.settings.with_no_build(no_build);
        ctx
    }

    /// Manifest store for this layout.
    pub fn store(&self) -> ManifestStore {
        ManifestStore::new(self.layout.clone())
    }

    /// Detect, build and link the clone of `name`.
    pub fn run_pipeline(&self, name: &str) -> PipelineReport {
        let repo_root = self.layout.package_dir(name);
        Pipeline::new(
            &self.registry,
            &self.probe,
            &self.runner,
            &self.output,
            &self.settings,
        )
        .run(&repo_root, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_timeout_reaches_runner() {
        let cli = Cli::try_parse_from([
            "ghpm",
            "--build-timeout",
            "90",
            "--home",
            "/tmp/ghpm-home",
            "--bin-dir",
            "/tmp/ghpm-bin",
            "list",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        assert_eq!(ctx.runner.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(ctx.layout.bin(), std::path::Path::new("/tmp/ghpm-bin"));
    }

    #[test]
    fn test_no_timeout_by_default() {
        let cli = Cli::try_parse_from([
            "ghpm",
            "--home",
            "/tmp/ghpm-home",
            "--bin-dir",
            "/tmp/ghpm-bin",
            "list",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        assert_eq!(ctx.runner.timeout(), None);
    }
}

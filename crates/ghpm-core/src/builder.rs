//! Build execution.
//!
//! Interprets a strategy's [`BuildPlan`] against the tool probe and command
//! runner. Build failure is never an error: every path ends in a
//! [`BuildOutcome`] that the caller persists.

use std::collections::HashMap;
use std::path::Path;

use ghpm_schema::{BuildOutcome, Ecosystem, reason};

use crate::exec::{CommandRunner, CommandSpec};
use crate::files;
use crate::reporter::Reporter;
use crate::strategy::{BUILD_SUBDIR, BuildAttempt, BuildPlan, StrategyRegistry, WorkDir};
use crate::toolchain::ToolProbe;

/// Runs build plans.
pub struct Builder<'a> {
    registry: &'a StrategyRegistry,
    probe: &'a dyn ToolProbe,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    no_build: bool,
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("registry", &self.registry)
            .field("no_build", &self.no_build)
            .finish_non_exhaustive()
    }
}

/// Result of running one attempt whose tool was present.
enum AttemptResult {
    Succeeded,
    Failed(String),
}

impl<'a> Builder<'a> {
    /// Builder over the given seams.
    pub fn new(
        registry: &'a StrategyRegistry,
        probe: &'a dyn ToolProbe,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            registry,
            probe,
            runner,
            reporter,
            no_build: false,
        }
    }

    /// Skip all build attempts.
    pub fn no_build(mut self, no_build: bool) -> Self {
        self.no_build = no_build;
        self
    }

    /// Build the repository at `repo_root` as `ecosystem`.
    pub fn build(&self, repo_root: &Path, ecosystem: Ecosystem) -> BuildOutcome {
        if self.no_build {
            self.reporter.info("Skipping build (--no-build)");
            return BuildOutcome::not_attempted(reason::SKIPPED);
        }

        let Some(strategy) = self.registry.get(ecosystem) else {
            self.reporter
                .warning("Could not detect a supported language, skipping build");
            return BuildOutcome::not_attempted(reason::UNKNOWN_LANGUAGE);
        };

        match strategy.plan(repo_root) {
            BuildPlan::NotRequired => {
                self.reporter.info(&format!("{ecosystem} projects need no build step"));
                BuildOutcome::not_attempted(reason::NO_BUILD_REQUIRED)
            }
            BuildPlan::Unavailable(why) => {
                self.reporter.warning(&format!("Cannot build: {why}"));
                BuildOutcome::not_attempted(why)
            }
            BuildPlan::Fallback(attempts) => self.run_fallback(repo_root, &attempts),
            BuildPlan::Alternates(attempts) => self.run_alternates(repo_root, &attempts),
        }
    }

    /// First tool `attempt` needs that is not installed. Each tool is looked
    /// up once per build; `known` carries the answers.
    fn missing_tool<'t>(
        &self,
        attempt: &'t BuildAttempt,
        known: &mut HashMap<&'t str, bool>,
    ) -> Option<&'t str> {
        attempt
            .required_tools()
            .into_iter()
            .find(|tool| !*known.entry(*tool).or_insert_with(|| self.probe.exists(tool)))
    }

    fn missing(&self, attempt: &BuildAttempt, tool: &str) -> BuildOutcome {
        self.reporter
            .warning(&format!("{tool} is not installed, cannot build"));
        BuildOutcome::failure(&attempt.description, reason::missing_tool(tool))
    }

    fn run_fallback(&self, repo_root: &Path, attempts: &[BuildAttempt]) -> BuildOutcome {
        let mut known = HashMap::new();
        let mut last = BuildOutcome::not_attempted(reason::NO_BUILD_SYSTEM);
        for (i, attempt) in attempts.iter().enumerate() {
            if let Some(tool) = self.missing_tool(attempt, &mut known) {
                return self.missing(attempt, tool);
            }

            match self.run_attempt(repo_root, attempt) {
                AttemptResult::Succeeded => return BuildOutcome::success(&attempt.description),
                AttemptResult::Failed(why) => {
                    if i + 1 < attempts.len() {
                        self.reporter
                            .warning(&format!("{} failed, trying next method", attempt.description));
                    }
                    last = BuildOutcome::failure(&attempt.description, why);
                }
            }
        }
        last
    }

    fn run_alternates(&self, repo_root: &Path, attempts: &[BuildAttempt]) -> BuildOutcome {
        let Some(first) = attempts.first() else {
            return BuildOutcome::not_attempted(reason::NO_BUILD_SYSTEM);
        };

        let mut known = HashMap::new();
        match attempts
            .iter()
            .find(|a| self.missing_tool(a, &mut known).is_none())
        {
            Some(attempt) => match self.run_attempt(repo_root, attempt) {
                AttemptResult::Succeeded => BuildOutcome::success(&attempt.description),
                AttemptResult::Failed(why) => BuildOutcome::failure(&attempt.description, why),
            },
            None => {
                let tool = self
                    .missing_tool(first, &mut known)
                    .unwrap_or(first.tool_required.as_str());
                self.missing(first, tool)
            }
        }
    }

    fn run_attempt(&self, repo_root: &Path, attempt: &BuildAttempt) -> AttemptResult {
        self.reporter.info(&format!("Running {}", attempt.description));

        if let Some(script) = &attempt.make_executable
            && let Err(e) = files::ensure_executable(script)
        {
            return AttemptResult::Failed(format!(
                "could not make {} executable: {e}",
                script.display()
            ));
        }

        let uses_build_dir = attempt.workdir == WorkDir::BuildSubdir
            || attempt.followups.iter().any(|s| s.workdir == WorkDir::BuildSubdir);
        if uses_build_dir && let Err(e) = std::fs::create_dir_all(repo_root.join(BUILD_SUBDIR)) {
            return AttemptResult::Failed(format!("could not create {BUILD_SUBDIR}/: {e}"));
        }

        let primary = CommandSpec::from_argv(&attempt.command, &attempt.workdir.resolve(repo_root));
        let result = self.runner.run(&primary);
        if !result.success() {
            let why = result.failure_reason(&primary.display());
            tracing::debug!("{why}");
            return AttemptResult::Failed(why);
        }

        for step in &attempt.followups {
            let spec = CommandSpec::from_argv(&step.command, &step.workdir.resolve(repo_root));
            let result = self.runner.run(&spec);
            if result.success() {
                continue;
            }
            let why = result.failure_reason(&spec.display());
            if step.soft {
                self.reporter.warning(&format!("{why} (continuing)"));
            } else {
                return AttemptResult::Failed(why);
            }
        }

        self.reporter
            .success(&format!("Built successfully with {}", attempt.description));
        AttemptResult::Succeeded
    }
}

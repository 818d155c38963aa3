//! Subprocess execution.
//!
//! Build commands inherit the parent's stdout/stderr so build logs stream
//! live; the only thing observed is whether the command exited successfully.
//! [`CommandRunner`] is the seam tests use to avoid spawning real processes.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use wait_timeout::ChildExt;

/// A command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments, not including the program.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
    /// Capture stdout instead of inheriting it.
    pub capture: bool,
}

impl CommandSpec {
    /// `program` with no arguments, run in `cwd`.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            capture: false,
        }
    }

    /// Build from an argv whose first element is the program.
    ///
    /// An empty argv yields an empty program name, which fails to spawn.
    pub fn from_argv(argv: &[String], cwd: &Path) -> Self {
        let (program, args) = argv.split_first().map_or((String::new(), &[][..]), |(p, a)| {
            (p.clone(), a)
        });
        Self {
            program,
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
            capture: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Capture stdout into [`ExecResult::stdout`].
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// The command line as a user would type it.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    /// The process ran to completion. `None` when killed by a signal.
    Exited(Option<i32>),
    /// The process could not be started.
    SpawnFailed(String),
    /// The process outlived the configured timeout and was killed.
    TimedOut,
}

/// Structured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit disposition.
    pub status: ExecStatus,
    /// Captured stdout, only when [`CommandSpec::capture`] was set.
    pub stdout: Option<String>,
}

impl ExecResult {
    /// Exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            status: ExecStatus::Exited(Some(code)),
            stdout: None,
        }
    }

    /// Exited with status zero.
    pub fn ok() -> Self {
        Self::exited(0)
    }

    /// Could not spawn.
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            status: ExecStatus::SpawnFailed(reason.into()),
            stdout: None,
        }
    }

    /// Returns `true` on a zero exit status.
    pub fn success(&self) -> bool {
        self.status == ExecStatus::Exited(Some(0))
    }

    /// One-line failure description, e.g. `go build exited with status 2`.
    pub fn failure_reason(&self, command: &str) -> String {
        match &self.status {
            ExecStatus::Exited(Some(code)) => format!("{command} exited with status {code}"),
            ExecStatus::Exited(None) => format!("{command} was terminated by a signal"),
            ExecStatus::SpawnFailed(e) => format!("failed to start {command}: {e}"),
            ExecStatus::TimedOut => format!("{command} timed out"),
        }
    }
}

/// Runs commands synchronously, one at a time.
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion.
    fn run(&self, spec: &CommandSpec) -> ExecResult;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Runner with no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> ExecResult {
        tracing::debug!(cwd = %spec.cwd.display(), "exec: {}", spec.display());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit());
        if spec.capture {
            cmd.stdout(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
        }

        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => return ExecResult::spawn_failed(e.to_string()),
        };

        // Drain the pipe before waiting so a chatty child cannot block on a full buffer.
        let stdout = child.stdout.take().and_then(|mut out| {
            let mut buf = String::new();
            out.read_to_string(&mut buf).ok().map(|_| buf)
        });

        let waited = match self.timeout {
            Some(limit) => child.wait_timeout(limit),
            None => child.wait().map(Some),
        };

        let status = match waited {
            Ok(Some(status)) => ExecStatus::Exited(status.code()),
            Ok(None) => {
                tracing::warn!("{} timed out, killing", spec.display());
                let _ = child.kill();
                let _ = child.wait();
                ExecStatus::TimedOut
            }
            Err(e) => ExecStatus::SpawnFailed(e.to_string()),
        };

        ExecResult { status, stdout }
    }
}

/// Runner that never spawns anything.
///
/// Answers each command line with a scripted result (success by default) and
/// records every spec it was asked to run, in order.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, ExecResult>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    /// Runner that succeeds for every command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command_line` (as rendered by [`CommandSpec::display`]) with `result`.
    pub fn respond(mut self, command_line: &str, result: ExecResult) -> Self {
        self.responses.insert(command_line.to_string(), result);
        self
    }

    /// Fail `command_line` with exit status 1.
    pub fn fail(self, command_line: &str) -> Self {
        self.respond(command_line, ExecResult::exited(1))
    }

    /// Every spec run so far.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Rendered command lines run so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> ExecResult {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }
        self.responses
            .get(&spec.display())
            .cloned()
            .unwrap_or_else(ExecResult::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_display_joins_argv() {
        let spec = CommandSpec::new("cargo", "/tmp").args(["install", "--path", "."]);
        assert_eq!(spec.display(), "cargo install --path .");
    }

    #[test]
    fn test_from_argv_splits_program() {
        let argv = vec!["make".to_string(), "install".to_string()];
        let spec = CommandSpec::from_argv(&argv, Path::new("/src"));
        assert_eq!(spec.program, "make");
        assert_eq!(spec.args, vec!["install".to_string()]);
        assert_eq!(spec.cwd, PathBuf::from("/src"));
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(
            ExecResult::exited(2).failure_reason("go build"),
            "go build exited with status 2"
        );
        assert!(
            ExecResult::spawn_failed("No such file")
                .failure_reason("npm install")
                .starts_with("failed to start npm install")
        );
    }

    #[test]
    fn test_scripted_runner_records_calls() {
        let runner = ScriptedRunner::new().fail("go install");
        let cwd = Path::new("/repo");
        assert!(!runner.run(&CommandSpec::new("go", cwd).arg("install")).success());
        assert!(runner.run(&CommandSpec::new("go", cwd).arg("build")).success());
        assert_eq!(runner.command_lines(), vec!["go install", "go build"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_status() {
        let tmp = tempdir().unwrap();
        let runner = SystemRunner::new();

        let ok = runner.run(&CommandSpec::new("sh", tmp.path()).args(["-c", "exit 0"]));
        assert!(ok.success());

        let failed = runner.run(&CommandSpec::new("sh", tmp.path()).args(["-c", "exit 3"]));
        assert_eq!(failed.status, ExecStatus::Exited(Some(3)));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout_in_cwd() {
        let tmp = tempdir().unwrap();
        let result = SystemRunner::new()
            .run(&CommandSpec::new("sh", tmp.path()).args(["-c", "pwd"]).captured());
        assert!(result.success());
        let printed = PathBuf::from(result.stdout.unwrap().trim());
        assert_eq!(
            printed.canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let tmp = tempdir().unwrap();
        let result =
            SystemRunner::new().run(&CommandSpec::new("ghpm-definitely-not-a-tool", tmp.path()));
        assert!(matches!(result.status, ExecStatus::SpawnFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_timeout_kills() {
        let tmp = tempdir().unwrap();
        let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(100)));
        let result = runner.run(&CommandSpec::new("sleep", tmp.path()).arg("5"));
        assert_eq!(result.status, ExecStatus::TimedOut);
    }
}

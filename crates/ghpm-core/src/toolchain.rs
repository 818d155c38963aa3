//! External tool availability.

use std::collections::HashSet;
use std::ffi::OsString;
use std::sync::Mutex;

/// Answers "is `tool` on the command search path?".
///
/// Implementations must not cache: the executor asks once per build attempt.
pub trait ToolProbe: Send + Sync {
    /// Returns `true` if `tool` resolves to an executable.
    fn exists(&self, tool: &str) -> bool;
}

/// Looks tools up with `which`, against the process `PATH` or an explicit one.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    path: Option<OsString>,
}

impl PathProbe {
    /// Probe the process `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe an explicit `PATH` value instead of the process one.
    pub fn with_path(path: impl Into<OsString>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ToolProbe for PathProbe {
    fn exists(&self, tool: &str) -> bool {
        let found = match &self.path {
            Some(path) => std::env::current_dir()
                .ok()
                .and_then(|cwd| which::which_in(tool, Some(path), cwd).ok()),
            None => which::which(tool).ok(),
        };
        tracing::debug!(tool, found = ?found, "tool lookup");
        found.is_some()
    }
}

/// Probe with a fixed set of available tools that counts its queries.
#[derive(Debug, Default)]
pub struct StaticProbe {
    available: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticProbe {
    /// Probe reporting exactly `tools` as available.
    pub fn new<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: tools.into_iter().map(Into::into).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Probe reporting every tool as missing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Tools asked about so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl ToolProbe for StaticProbe {
    fn exists(&self, tool: &str) -> bool {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(tool.to_string());
        }
        self.available.contains(tool)
    }
}

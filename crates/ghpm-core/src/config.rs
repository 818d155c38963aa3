//! Per-invocation settings threaded into the pipeline.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::paths::{self, Layout};

/// Knobs consulted by the build, resolve and link stages.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Directory receiving binary symlinks.
    pub link_dir: PathBuf,
    /// Global output directory of `go install`.
    pub go_bin_dir: Option<PathBuf>,
    /// `PATH` value used for the post-link advisory.
    pub path_var: Option<OsString>,
    /// Skip every build attempt.
    pub no_build: bool,
}

impl Settings {
    /// Settings for `layout`, reading the Go and `PATH` variables from the
    /// process environment.
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            link_dir: layout.bin().to_path_buf(),
            go_bin_dir: paths::go_bin_dir(),
            path_var: std::env::var_os("PATH"),
            no_build: false,
        }
    }

    /// Toggle `--no-build`.
    pub fn with_no_build(mut self, no_build: bool) -> Self {
        self.no_build = no_build;
        self
    }
}

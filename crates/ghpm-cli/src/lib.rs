//! ghpm - a package manager for GitHub source repositories
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Clones a repository, works out how to build it, builds it and puts the
//! resulting executables on your `PATH`.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.ghpm/
//! ├── packages/   # git clones, one per package
//! └── manifests/  # <name>.json install records
//! ~/.local/bin/   # symlinks to built binaries
//! ```

pub mod cmd;
pub mod ops;
pub mod ui;

pub use ghpm_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ghpm")]
#[command(author, version, about = "ghpm - install tools from GitHub source")]
pub struct Cli {
    /// Kill any single build command running longer than this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub build_timeout: Option<u64>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory for clones and manifests
    #[arg(long, global = true, env = "GHPM_HOME", value_name = "DIR", hide = true)]
    pub home: Option<PathBuf>,

    /// Directory receiving binary symlinks
    #[arg(long, global = true, env = "GHPM_BIN_DIR", value_name = "DIR", hide = true)]
    pub bin_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a repository (owner/repo), or search by name and pick one
    Install {
        /// owner/repo, or a search query
        target: String,
        /// Clone only, do not build
        #[arg(long)]
        no_build: bool,
    },
    /// Remove an installed package
    Remove {
        /// Package name
        name: String,
    },
    /// List installed packages
    List,
    /// Search GitHub and install a result
    Search {
        /// Search query
        query: String,
        /// Number of results to show (1-50)
        #[arg(short, long, default_value_t = ghpm_core::github::DEFAULT_PER_PAGE)]
        limit: u32,
    },
    /// Pull and rebuild an installed package
    Update {
        /// Package name
        name: String,
        /// Pull only, do not build
        #[arg(long)]
        no_build: bool,
    },
    /// Show package info
    Info {
        /// Package name
        name: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

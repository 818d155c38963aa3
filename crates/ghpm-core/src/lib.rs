//! Core library for ghpm.
//!
//! Given a repository already cloned to disk, this crate decides which
//! ecosystem it belongs to, runs that ecosystem's build commands with
//! fallback, finds the executables it produced and symlinks them into the
//! user's bin directory.
//!
//! ```text
//! detect ──▶ Builder::build ──▶ Resolver::resolve ──▶ Linker::link
//!   │             │                    │                   │
//!   └─ StrategyRegistry (one Strategy per Ecosystem) ──────┘
//! ```
//!
//! All process spawning goes through [`exec::CommandRunner`] and all tool
//! lookups through [`toolchain::ToolProbe`], so every stage can be driven
//! against a temporary directory without touching the host toolchain.

pub mod builder;
pub mod config;
pub mod detect;
pub mod exec;
pub mod files;
pub mod git;
#[cfg(feature = "network")]
pub mod github;
pub mod linker;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod reporter;
pub mod resolver;
pub mod strategy;
pub mod toolchain;

pub use builder::Builder;
pub use config::Settings;
pub use detect::detect;
pub use linker::{LinkRecord, LinkReport, Linker, unlink_owned};
pub use paths::Layout;
pub use pipeline::{Pipeline, PipelineReport, Stage};
pub use reporter::{NullReporter, Reporter};
pub use resolver::{BinaryCandidate, Resolver};
pub use strategy::{Strategy, StrategyRegistry};

/// User Agent string for outbound HTTP requests.
pub const USER_AGENT: &str = concat!("ghpm-cli/", env!("CARGO_PKG_VERSION"));

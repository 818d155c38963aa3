//! Shared types for ghpm.
//!
//! Everything that crosses the boundary between the build engine and the
//! persisted manifest records lives here, so the CLI and core agree on a
//! single wire format.

pub mod record;
pub mod repo;
pub mod types;

// Re-exports
pub use record::ManifestRecord;
pub use repo::{GitHubRepo, RepoParseError};
pub use types::*;

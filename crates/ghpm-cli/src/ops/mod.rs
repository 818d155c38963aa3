//! Shared building blocks for the commands.

pub mod context;
pub mod error;
pub mod install;

pub use context::Context;
pub use error::PackageError;

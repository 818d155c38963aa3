//! Domain-specific errors for package operations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Already installed: {name} (at {})", path.display())]
    AlreadyInstalled { name: String, path: PathBuf },

    #[error("Package not installed: {0}")]
    NotInstalled(String),

    #[error("Could not determine home directory. Set GHPM_HOME and GHPM_BIN_DIR to override.")]
    NoHome,
}

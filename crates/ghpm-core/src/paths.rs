//! Directory layout.
//!
//! ```text
//! ~/.ghpm/
//! ├── packages/   # one clone per package
//! └── manifests/  # one <name>.json record per package
//! ~/.local/bin/   # symlinks to resolved binaries
//! ```
//!
//! Every path is carried by an explicit [`Layout`] value instead of process
//! globals, so tests can point the whole tool at a temporary root.

use dirs::home_dir;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "GHPM_HOME";
/// Environment variable overriding the link directory.
pub const BIN_DIR_ENV: &str = "GHPM_BIN_DIR";

/// Raised when no home directory can be determined.
#[derive(Error, Debug)]
#[error("Could not determine home directory. Set {HOME_ENV} and {BIN_DIR_ENV} to override.")]
pub struct NoHomeError;

/// Returns the base directory, or None if the user's home cannot be resolved.
pub fn try_ghpm_home() -> Option<PathBuf> {
    if let Some(val) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".ghpm"))
}

/// Returns the link directory, or None if the user's home cannot be resolved.
pub fn try_bin_dir() -> Option<PathBuf> {
    if let Some(val) = std::env::var_os(BIN_DIR_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".local").join("bin"))
}

/// Where `go install` puts binaries: `$GOBIN`, else the first `$GOPATH`
/// entry's `bin`, else `~/go/bin`.
pub fn go_bin_dir() -> Option<PathBuf> {
    go_bin_dir_from(
        std::env::var_os("GOBIN"),
        std::env::var_os("GOPATH"),
        home_dir(),
    )
}

/// Pure form of [`go_bin_dir`].
pub fn go_bin_dir_from(
    gobin: Option<OsString>,
    gopath: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(dir) = gobin.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if let Some(first) = gopath
        .filter(|v| !v.is_empty())
        .and_then(|v| std::env::split_paths(&v).next())
    {
        return Some(first.join("bin"));
    }
    home.map(|h| h.join("go").join("bin"))
}

/// The set of directories one ghpm invocation works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base: PathBuf,
    packages: PathBuf,
    manifests: PathBuf,
    bin: PathBuf,
}

impl Layout {
    /// Layout rooted at `base`, linking binaries into `bin`.
    pub fn new(base: impl Into<PathBuf>, bin: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            packages: base.join("packages"),
            manifests: base.join("manifests"),
            base,
            bin: bin.into(),
        }
    }

    /// Layout resolved from `GHPM_HOME`, `GHPM_BIN_DIR` and the home directory.
    ///
    /// # Errors
    ///
    /// Returns [`NoHomeError`] if a directory is neither overridden nor
    /// derivable from the user's home.
    pub fn from_env() -> Result<Self, NoHomeError> {
        let base = try_ghpm_home().ok_or(NoHomeError)?;
        let bin = try_bin_dir().ok_or(NoHomeError)?;
        Ok(Self::new(base, bin))
    }

    /// Create the base, packages and manifests directories.
    ///
    /// The link directory is created lazily by the linker.
    ///
    /// # Errors
    ///
    /// Returns any error from `create_dir_all`.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::create_dir_all(&self.packages)?;
        std::fs::create_dir_all(&self.manifests)?;
        Ok(())
    }

    /// Base directory: ~/.ghpm
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Clone root: ~/.ghpm/packages
    pub fn packages(&self) -> &Path {
        &self.packages
    }

    /// Manifest root: ~/.ghpm/manifests
    pub fn manifests(&self) -> &Path {
        &self.manifests
    }

    /// Link directory: ~/.local/bin
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Clone directory for one package.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.packages.join(name)
    }

    /// Manifest file for one package.
    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.manifests.join(format!("{name}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/tmp/g", "/tmp/bin");
        assert_eq!(layout.packages(), Path::new("/tmp/g/packages"));
        assert_eq!(layout.manifests(), Path::new("/tmp/g/manifests"));
        assert_eq!(layout.package_dir("fzf"), PathBuf::from("/tmp/g/packages/fzf"));
        assert_eq!(
            layout.manifest_path("fzf"),
            PathBuf::from("/tmp/g/manifests/fzf.json")
        );
        assert_eq!(layout.bin(), Path::new("/tmp/bin"));
    }

    #[test]
    fn test_ensure_creates_directories() {
        let tmp = tempdir().unwrap();
        let layout = Layout::new(tmp.path().join(".ghpm"), tmp.path().join("bin"));
        layout.ensure().unwrap();
        assert!(layout.packages().is_dir());
        assert!(layout.manifests().is_dir());
        // Link directory belongs to the linker
        assert!(!layout.bin().exists());
    }

    #[test]
    fn test_go_bin_dir_precedence() {
        let home = Some(PathBuf::from("/home/u"));
        assert_eq!(
            go_bin_dir_from(Some("/opt/gobin".into()), Some("/opt/gopath".into()), home.clone()),
            Some(PathBuf::from("/opt/gobin"))
        );
        assert_eq!(
            go_bin_dir_from(None, Some("/opt/gopath".into()), home.clone()),
            Some(PathBuf::from("/opt/gopath/bin"))
        );
        assert_eq!(
            go_bin_dir_from(Some(OsString::new()), None, home),
            Some(PathBuf::from("/home/u/go/bin"))
        );
        assert_eq!(go_bin_dir_from(None, None, None), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_go_bin_dir_uses_first_gopath_entry() {
        assert_eq!(
            go_bin_dir_from(None, Some("/a/go:/b/go".into()), None),
            Some(PathBuf::from("/a/go/bin"))
        );
    }
}

//! Symlinking resolved binaries into the link directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::reporter::Reporter;
use crate::resolver::BinaryCandidate;

/// One symlink created by [`Linker::link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Absolute path of the linked binary.
    pub source: PathBuf,
    /// Path of the symlink in the link directory.
    pub link: PathBuf,
}

/// A candidate that could not be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    /// The binary that was being linked.
    pub source: PathBuf,
    /// What went wrong.
    pub reason: String,
}

/// Everything a link pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Links now in place.
    pub records: Vec<LinkRecord>,
    /// Per-candidate failures.
    pub failures: Vec<LinkFailure>,
    /// Whether the link directory is on `PATH`.
    pub on_path: bool,
}

impl LinkReport {
    /// Link paths, in creation order.
    pub fn links(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.link.clone()).collect()
    }

    /// Link targets, in creation order.
    pub fn sources(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.source.clone()).collect()
    }
}

/// Delete those `links` that still point at something the package owns:
/// a path under `package_dir` or one of its recorded `sources`.
///
/// Links since repointed elsewhere are left alone. Returns the links removed.
pub fn unlink_owned(links: &[PathBuf], sources: &[PathBuf], package_dir: &Path) -> Vec<PathBuf> {
    links
        .iter()
        .filter(|link| {
            std::fs::read_link(link).is_ok_and(|target| {
                target.starts_with(package_dir) || sources.contains(&target)
            })
        })
        .filter(|link| match std::fs::remove_file(link) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to remove {}: {e}", link.display());
                false
            }
        })
        .cloned()
        .collect()
}

/// Returns `true` if `dir` is literally one of the entries of `path_var`.
pub fn dir_on_path(dir: &Path, path_var: Option<&OsString>) -> bool {
    path_var.is_some_and(|p| std::env::split_paths(p).any(|entry| entry == dir))
}

/// Creates symlinks in one directory.
pub struct Linker<'a> {
    link_dir: PathBuf,
    path_var: Option<OsString>,
    reporter: &'a dyn Reporter,
}

impl std::fmt::Debug for Linker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linker")
            .field("link_dir", &self.link_dir)
            .finish_non_exhaustive()
    }
}

impl<'a> Linker<'a> {
    /// Linker into `link_dir` checking the process `PATH`.
    pub fn new(link_dir: impl Into<PathBuf>, reporter: &'a dyn Reporter) -> Self {
        Self {
            link_dir: link_dir.into(),
            path_var: std::env::var_os("PATH"),
            reporter,
        }
    }

    /// Check an explicit `PATH` value instead of the process one.
    pub fn with_path_var(mut self, path_var: Option<OsString>) -> Self {
        self.path_var = path_var;
        self
    }

    /// Link every candidate. Never fails as a whole.
    pub fn link<I>(&self, candidates: I) -> LinkReport
    where
        I: IntoIterator<Item = BinaryCandidate>,
    {
        let mut report = LinkReport {
            on_path: dir_on_path(&self.link_dir, self.path_var.as_ref()),
            ..LinkReport::default()
        };

        if let Err(e) = std::fs::create_dir_all(&self.link_dir) {
            self.reporter.error(&format!(
                "Could not create {}: {e}",
                self.link_dir.display()
            ));
        }

        let mut attempted = 0usize;
        for candidate in candidates {
            attempted += 1;
            match self.link_one(&candidate) {
                Ok(record) => {
                    self.reporter.success(&format!(
                        "Linked {} -> {}",
                        record.link.display(),
                        record.source.display()
                    ));
                    report.records.push(record);
                }
                Err(reason) => {
                    self.reporter.warning(&format!(
                        "Failed to link {}: {reason}",
                        candidate.path.display()
                    ));
                    report.failures.push(LinkFailure {
                        source: candidate.path,
                        reason,
                    });
                }
            }
        }

        if attempted == 0 {
            self.reporter
                .warning("No binaries found. You may need to build manually or check the repo");
        }

        if !report.on_path {
            self.reporter
                .warning(&format!("{} is not in your PATH.", self.link_dir.display()));
            self.reporter.info(&format!(
                "Add this to your shell profile: export PATH=\"{}:$PATH\"",
                self.link_dir.display()
            ));
        } else {
            self.warn_shadowed(&report.records);
        }

        report
    }

    fn link_one(&self, candidate: &BinaryCandidate) -> Result<LinkRecord, String> {
        let source = std::path::absolute(&candidate.path).map_err(|e| e.to_string())?;
        let link = self.link_dir.join(candidate.link_name());

        if link.symlink_metadata().is_ok() {
            std::fs::remove_file(&link).map_err(|e| format!("could not replace existing entry: {e}"))?;
        }

        #[cfg(unix)]
        std::os::unix::fs::symlink(&source, &link).map_err(|e| e.to_string())?;
        #[cfg(not(unix))]
        std::fs::copy(&source, &link).map_err(|e| e.to_string())?;

        tracing::debug!(link = %link.display(), source = %source.display(), "linked");
        Ok(LinkRecord { source, link })
    }

    /// Warn when a command resolves to something other than our link.
    fn warn_shadowed(&self, records: &[LinkRecord]) {
        let Some(path_var) = &self.path_var else {
            return;
        };
        let Ok(cwd) = std::env::current_dir() else {
            return;
        };
        for record in records {
            let Some(name) = record.link.file_name() else {
                continue;
            };
            if let Ok(found) = which::which_in(name, Some(path_var), &cwd)
                && !found.starts_with(&self.link_dir)
            {
                self.reporter.warning(&format!(
                    "'{}' is shadowed by system version at {}",
                    name.to_string_lossy(),
                    found.display()
                ));
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::reporter::{CollectingReporter, Level};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn executable(path: &Path) {
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_link_creates_symlinks() {
        let pkg = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let link_dir = bin.path().join("nested/bin");
        let tool = pkg.path().join("tool");
        executable(&tool);

        let reporter = CollectingReporter::new();
        let linker = Linker::new(&link_dir, &reporter).with_path_var(Some(link_dir.clone().into()));
        let report = linker.link([BinaryCandidate::new(tool.clone())]);

        assert!(report.on_path);
        assert!(report.failures.is_empty());
        assert_eq!(report.links(), vec![link_dir.join("tool")]);
        assert_eq!(std::fs::read_link(link_dir.join("tool")).unwrap(), tool);
    }

    #[test]
    fn test_link_is_idempotent_and_replaces_stale_entries() {
        let pkg = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let tool = pkg.path().join("tool");
        executable(&tool);
        std::fs::write(bin.path().join("tool"), "stale").unwrap();

        let reporter = CollectingReporter::new();
        let linker = Linker::new(bin.path(), &reporter).with_path_var(None);
        let first = linker.link([BinaryCandidate::new(tool.clone())]);
        let second = linker.link([BinaryCandidate::new(tool.clone())]);

        assert_eq!(first.records, second.records);
        assert!(second.failures.is_empty());
        assert_eq!(std::fs::read_link(bin.path().join("tool")).unwrap(), tool);
    }

    #[test]
    fn test_declared_command_name_is_used() {
        let pkg = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let script = pkg.path().join("cli.js");
        executable(&script);

        let reporter = CollectingReporter::new();
        let report = Linker::new(bin.path(), &reporter)
            .with_path_var(None)
            .link([BinaryCandidate::named(script, "pretty")]);
        assert_eq!(report.links(), vec![bin.path().join("pretty")]);
    }

    #[test]
    fn test_empty_input_warns() {
        let bin = tempdir().unwrap();
        let reporter = CollectingReporter::new();
        let report = Linker::new(bin.path(), &reporter)
            .with_path_var(Some(bin.path().as_os_str().to_owned()))
            .link(Vec::new());

        assert!(report.records.is_empty());
        let warnings = reporter.at(Level::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("No binaries found"));
    }

    #[test]
    fn test_path_advice_once_when_not_on_path() {
        let pkg = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let a = pkg.path().join("a");
        let b = pkg.path().join("b");
        executable(&a);
        executable(&b);

        let reporter = CollectingReporter::new();
        let report = Linker::new(bin.path(), &reporter)
            .with_path_var(Some("/usr/bin:/bin".into()))
            .link([BinaryCandidate::new(a), BinaryCandidate::new(b)]);

        assert!(!report.on_path);
        let advice: Vec<_> = reporter
            .at(Level::Info)
            .into_iter()
            .filter(|m| m.contains("export PATH"))
            .collect();
        assert_eq!(advice.len(), 1);
    }

    #[test]
    fn test_failure_does_not_stop_others() {
        let pkg = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let good = pkg.path().join("good");
        executable(&good);
        // A non-empty directory in the way cannot be removed with remove_file.
        std::fs::create_dir_all(bin.path().join("blocked/inner")).unwrap();

        let reporter = CollectingReporter::new();
        let report = Linker::new(bin.path(), &reporter).with_path_var(None).link([
            BinaryCandidate::named(good.clone(), "blocked"),
            BinaryCandidate::new(good),
        ]);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.links(), vec![bin.path().join("good")]);
    }

    #[test]
    fn test_unlink_owned_keeps_foreign_links() {
        let tmp = tempdir().unwrap();
        let pkg = tmp.path().join("packages/tool");
        let other = tmp.path().join("packages/other");
        let bin = tmp.path().join("bin");
        for dir in [&pkg, &other, &bin] {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(pkg.join("tool"), "").unwrap();
        std::fs::write(other.join("tool2"), "").unwrap();

        let ours = bin.join("tool");
        let theirs = bin.join("tool2");
        let plain = bin.join("plain");
        std::os::unix::fs::symlink(pkg.join("tool"), &ours).unwrap();
        std::os::unix::fs::symlink(other.join("tool2"), &theirs).unwrap();
        std::fs::write(&plain, "").unwrap();

        let removed = unlink_owned(
            &[ours.clone(), theirs.clone(), plain.clone(), bin.join("gone")],
            &[],
            &pkg,
        );

        assert_eq!(removed, vec![ours.clone()]);
        assert!(ours.symlink_metadata().is_err());
        assert!(theirs.symlink_metadata().is_ok());
        assert!(plain.exists());
    }

    #[test]
    fn test_unlink_owned_follows_recorded_sources_outside_package() {
        let tmp = tempdir().unwrap();
        let pkg = tmp.path().join("packages/fzf");
        let go_bin = tmp.path().join("go/bin");
        let bin = tmp.path().join("bin");
        for dir in [&pkg, &go_bin, &bin] {
            std::fs::create_dir_all(dir).unwrap();
        }
        executable(&go_bin.join("fzf"));
        executable(&go_bin.join("gopls"));
        let link = bin.join("fzf");
        let unrelated = bin.join("gopls");
        std::os::unix::fs::symlink(go_bin.join("fzf"), &link).unwrap();
        std::os::unix::fs::symlink(go_bin.join("gopls"), &unrelated).unwrap();

        let removed = unlink_owned(
            &[link.clone(), unrelated.clone()],
            &[go_bin.join("fzf")],
            &pkg,
        );

        assert_eq!(removed, vec![link.clone()]);
        assert!(link.symlink_metadata().is_err());
        assert!(unrelated.symlink_metadata().is_ok());
        assert!(go_bin.join("fzf").exists());
    }

    #[test]
    fn test_dir_on_path_is_literal() {
        let path: OsString = "/usr/bin:/home/u/.local/bin".into();
        assert!(dir_on_path(Path::new("/home/u/.local/bin"), Some(&path)));
        assert!(!dir_on_path(Path::new("/home/u/.local"), Some(&path)));
        assert!(!dir_on_path(Path::new("/home/u/.local/bin"), None));
    }
}

//! Small filesystem helpers shared by the strategies, resolver and linker.

use std::path::{Path, PathBuf};

/// Regular files directly inside `dir`, sorted by name. Missing or
/// unreadable directories yield nothing.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// File name as UTF-8, lossily.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Returns `true` if `path` is a regular file (following symlinks) with at
/// least one execute bit set.
pub fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Add execute permission (for everyone who can read the file).
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or permissions set.
pub fn ensure_executable(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        let mode = perms.mode();
        let wanted = mode | ((mode & 0o444) >> 2) | 0o100;
        if wanted != mode {
            perms.set_mode(wanted);
            std::fs::set_permissions(path, perms)?;
        }
    }
    #[cfg(not(unix))]
    {
        std::fs::metadata(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_files_is_shallow_and_sorted() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("b.sh"), "").unwrap();
        std::fs::write(tmp.path().join("a.sh"), "").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub/c.sh"), "").unwrap();

        let names: Vec<String> = list_files(tmp.path()).iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.sh", "b.sh"]);
        assert!(list_files(&tmp.path().join("missing")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_executable_sets_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let script = tmp.path().join("install.sh");
        std::fs::write(&script, "echo hi\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable_file(&script));

        ensure_executable(&script).unwrap();
        let mode = std::fs::metadata(&script).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert!(is_executable_file(&script));
    }

    #[test]
    fn test_directories_are_not_executable_files() {
        let tmp = tempdir().unwrap();
        assert!(!is_executable_file(tmp.path()));
        assert!(!is_executable_file(&tmp.path().join("missing")));
    }
}

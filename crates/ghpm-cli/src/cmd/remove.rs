//! Remove command

use anyhow::{Context as _, Result};
use ghpm_core::manifest::ManifestError;
use ghpm_core::{Reporter, unlink_owned};
use ghpm_schema::PackageName;

use crate::ops::{Context, PackageError};

/// Remove an installed package, its links and its manifest
pub fn remove(ctx: &Context, name: &str) -> Result<()> {
    let name = PackageName::parse(name)?;
    let store = ctx.store();
    let package_dir = ctx.layout.package_dir(&name);

    if !package_dir.exists() && !store.exists(&name) {
        return Err(PackageError::NotInstalled(name.to_string()).into());
    }

    match store.load(&name) {
        Ok(record) => {
            for link in unlink_owned(&record.binaries, &record.link_sources, &package_dir) {
                ctx.output.info(&format!("Unlinked {}", link.display()));
            }
        }
        Err(ManifestError::NotFound(_)) => {}
        Err(e) => ctx.output.warning(&format!("Could not read manifest: {e}")),
    }

    if package_dir.exists() {
        std::fs::remove_dir_all(&package_dir)
            .with_context(|| format!("Failed to delete {}", package_dir.display()))?;
    }
    match store.remove(&name) {
        Ok(()) | Err(ManifestError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    ctx.output.success(&format!("Removed {name}"));
    Ok(())
}

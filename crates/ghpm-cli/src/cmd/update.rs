//! Update command

use anyhow::{Context as _, Result};
use ghpm_core::Reporter;
use ghpm_core::exec::SystemRunner;
use ghpm_core::git::Git;
use ghpm_schema::PackageName;

use crate::ops::install::apply_report;
use crate::ops::{Context, PackageError};

/// Pull the latest source for `name` and run the full pipeline again
pub fn update(ctx: &Context, name: &str) -> Result<()> {
    let name = PackageName::parse(name)?;
    let package_dir = ctx.layout.package_dir(&name);
    if !package_dir.exists() {
        return Err(PackageError::NotInstalled(name.to_string()).into());
    }

    let store = ctx.store();
    let mut record = store
        .load(&name)
        .with_context(|| format!("Failed to read manifest for {name}"))?;

    ctx.output.section(&format!("Updating {name}"));
    let git_runner = SystemRunner::new();
    let git = Git::new(&git_runner);
    git.pull(&package_dir)?;

    let report = ctx.run_pipeline(&name);
    record.commit = git.head_commit(&package_dir).or(record.commit);
    for link in apply_report(&mut record, &report, &package_dir) {
        ctx.output.info(&format!("Unlinked {}", link.display()));
    }
    store
        .save(&record)
        .with_context(|| format!("Failed to record {name}"))?;

    ctx.output.success(&format!("Updated {name}"));
    Ok(())
}

//! Info command

use anyhow::Result;
use crossterm::style::Stylize;
use ghpm_core::manifest::ManifestError;
use ghpm_schema::PackageName;

use crate::ops::{Context, PackageError};

/// Show everything recorded about one package
pub fn info(ctx: &Context, name: &str) -> Result<()> {
    let name = PackageName::parse(name)?;
    let record = match ctx.store().load(&name) {
        Ok(r) => r,
        Err(ManifestError::NotFound(_)) => {
            return Err(PackageError::NotInstalled(name.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    };
    let theme = ctx.output.theme();

    println!("{}", record.name.as_str().with(theme.colors.package_name).bold());
    println!("  Repository:    {}", record.repo);
    println!("  URL:           {}", record.url);
    println!("  Language:      {}", record.language);
    println!("  Built:         {}", record.built);
    if !record.build_cmd.is_empty() {
        println!("  Build Command: {}", record.build_cmd);
    }
    if !record.build_reason.is_empty() {
        println!("  Build Reason:  {}", record.build_reason);
    }
    if let Some(commit) = &record.commit {
        println!("  Commit:        {commit}");
    }
    println!(
        "  Installed:     {}",
        record.installed_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !record.binaries.is_empty() {
        println!("  Binaries:");
        for bin in &record.binaries {
            println!("    {}", bin.display());
        }
    }

    let location = ctx.layout.package_dir(&name);
    if location.exists() {
        println!("  Location:      {}", location.display());
    }
    Ok(())
}

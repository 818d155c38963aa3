//! List command

use anyhow::{Context as _, Result};

use crate::ops::Context;
use crate::ui::list::print_list;

/// List all installed packages
pub fn list(ctx: &Context) -> Result<()> {
    let records = ctx
        .store()
        .list()
        .context("Failed to read manifests")?;

    if records.is_empty() {
        println!("No installed packages.");
        return Ok(());
    }

    print_list(&records);
    Ok(())
}

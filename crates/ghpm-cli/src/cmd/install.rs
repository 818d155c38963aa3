//! Install command

use anyhow::{Context as _, Result};
use ghpm_schema::GitHubRepo;

use crate::ops::Context;
use crate::ops::install::install_repo;

/// Install `target`: an `owner/repo` slug, or a query to search for.
pub async fn install(ctx: &Context, target: &str) -> Result<()> {
    if !target.contains('/') {
        return super::search::search_and_prompt(
            ctx,
            target,
            ghpm_core::github::DEFAULT_PER_PAGE,
        )
        .await;
    }

    let repo = GitHubRepo::new(target).context("Invalid repo format. Use owner/repo")?;
    install_repo(ctx, &repo)?;
    Ok(())
}

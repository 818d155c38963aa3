//! Search command

use std::io::{BufRead, Write};

use anyhow::{Context as _, Result};
use ghpm_core::Reporter;
use ghpm_core::github::SearchClient;
use ghpm_schema::GitHubRepo;
use thiserror::Error;

use crate::ops::Context;
use crate::ops::install::install_repo;
use crate::ui::list::print_search_results;

/// Why a typed selection was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No selection made")]
    Empty,
    #[error("Invalid selection: {0}")]
    NotANumber(String),
    #[error("Selection out of range: {0}")]
    OutOfRange(usize),
}

/// Parse a 1-based selection among `count` results into a 0-based index.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }
    let n: usize = input
        .parse()
        .map_err(|_| SelectionError::NotANumber(input.to_string()))?;
    if n == 0 || n > count {
        return Err(SelectionError::OutOfRange(n));
    }
    Ok(n - 1)
}

/// Search GitHub and install the result the user picks
pub async fn search(ctx: &Context, query: &str, limit: u32) -> Result<()> {
    search_and_prompt(ctx, query, limit).await
}

/// Search, print numbered results, read a choice from stdin and install it.
pub async fn search_and_prompt(ctx: &Context, query: &str, limit: u32) -> Result<()> {
    let client = SearchClient::from_env().context("Failed to create HTTP client")?;
    let items = client.search(query, limit).await.context("Search failed")?;

    if items.is_empty() {
        println!("No results found for: {query}");
        return Ok(());
    }

    print_search_results(&items);

    print!("Select a number: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;

    let index = match parse_selection(&input, items.len()) {
        Ok(i) => i,
        Err(SelectionError::Empty) => {
            ctx.output.info("No selection made");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let repo = GitHubRepo::new(&items[index].full_name)?;
    install_repo(ctx, &repo)?;
    Ok(())
}

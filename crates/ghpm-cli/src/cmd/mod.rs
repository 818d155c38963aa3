//! Command implementations, one module per subcommand.

pub mod completions;
pub mod info;
pub mod install;
pub mod list;
pub mod remove;
pub mod search;
pub mod update;

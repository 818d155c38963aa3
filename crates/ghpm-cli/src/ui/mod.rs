//! Terminal output.
//!
//! - [`theme`] - Colors, icons and column widths
//! - [`output`] - [`Output`], the terminal [`ghpm_core::Reporter`]
//! - [`list`] - Tables for `list` and `search`

pub mod list;
pub mod output;
pub mod theme;

pub use output::Output;
pub use theme::Theme;

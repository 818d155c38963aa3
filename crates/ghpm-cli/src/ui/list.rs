//! Column-aligned rendering for `ghpm list` and `ghpm search`.

use crossterm::style::Stylize;
use ghpm_core::github::RepoItem;
use ghpm_schema::ManifestRecord;

use super::theme::Theme;

/// Header line for `ghpm list`.
pub fn list_header(theme: &Theme) -> String {
    let header = format!(
        "  {:<nw$} {:<rw$} {:<lw$} {}",
        "name",
        "repo",
        "language",
        "built",
        nw = theme.layout.name_width,
        rw = theme.layout.repo_width,
        lw = theme.layout.language_width,
    );
    header.dark_grey().to_string()
}

/// One row of `ghpm list`.
pub fn list_row(theme: &Theme, record: &ManifestRecord) -> String {
    let name = format!("{:<w$}", record.name.as_str(), w = theme.layout.name_width);
    let repo = format!("{:<w$}", record.repo.to_string(), w = theme.layout.repo_width);
    let language = format!(
        "{:<w$}",
        record.language.label(),
        w = theme.layout.language_width
    );
    let built = if record.built {
        theme.icons.success.with(theme.colors.success)
    } else {
        theme.icons.error.with(theme.colors.error)
    };

    format!(
        "  {} {} {} {}",
        name.with(theme.colors.package_name),
        repo.with(theme.colors.secondary),
        language.with(theme.colors.secondary),
        built
    )
}

/// Print the whole `ghpm list` table.
pub fn print_list(records: &[ManifestRecord]) {
    let theme = Theme::default();
    println!();
    println!("{}", list_header(&theme));
    for record in records {
        println!("{}", list_row(&theme, record));
    }
    println!();
    let noun = if records.len() == 1 { "package" } else { "packages" };
    println!("{}", format!("  {} {noun}", records.len()).dark_grey());
}

/// One numbered search hit: `1) owner/repo  ★123  Go`.
pub fn search_row(theme: &Theme, index: usize, item: &RepoItem) -> String {
    format!(
        "{index}) {}  {}{}  {}",
        item.full_name.as_str().with(theme.colors.package_name),
        theme.icons.star,
        item.stargazers_count,
        item.language_label().with(theme.colors.secondary)
    )
}

/// Print numbered search results, starting at 1.
pub fn print_search_results(items: &[RepoItem]) {
    let theme = Theme::default();
    for (i, item) in items.iter().enumerate() {
        println!("{}", search_row(&theme, i + 1, item));
        if let Some(desc) = item.description.as_deref().filter(|d| !d.is_empty()) {
            println!("   {}", desc.dark_grey());
        }
    }
}

//! UI theme: colors, icons and column widths shared by every command.

use crossterm::style::Color;

/// Default theme for ghpm output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Colors for different UI elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
    /// Column widths
    pub layout: Layout,
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Package names (primary content)
    pub package_name: Color,
    /// Repositories, languages and other secondary info
    pub secondary: Color,
    /// Headers and labels
    pub header: Color,
    /// Success states
    pub success: Color,
    /// Warning states
    pub warning: Color,
    /// Error states
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            package_name: Color::Cyan,
            secondary: Color::DarkGrey,
            header: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Status icons
#[derive(Debug, Clone)]
pub struct Icons {
    /// Success/built (✓)
    pub success: &'static str,
    /// Error/not built (✗)
    pub error: &'static str,
    /// Warning (⚠)
    pub warning: &'static str,
    /// Info/Tip (ℹ)
    pub info: &'static str,
    /// Star count (★)
    pub star: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            error: "✗",
            warning: "⚠",
            info: "ℹ",
            star: "★",
        }
    }
}

/// Column widths for `ghpm list`
#[derive(Debug, Clone)]
pub struct Layout {
    /// Package name column
    pub name_width: usize,
    /// owner/repo column
    pub repo_width: usize,
    /// Language column
    pub language_width: usize,
    /// Width of section header rules
    pub rule_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            name_width: 18,
            repo_width: 32,
            language_width: 8,
            rule_width: 40,
        }
    }
}

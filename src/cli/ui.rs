use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    ActiveTab,
    InactiveTab,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::ActiveTab => style(text).black().on_white().bold(),
        StyleType::InactiveTab => style(text).white(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right aligned, bold number cell.
pub fn number_cell(text: String) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

pub fn subtle_cell(text: String) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

/// `Page 2 / 5` with arrows for the directions that are available.
pub fn page_indicator(page: usize, total_pages: usize, has_prev: bool, has_next: bool) -> String {
    let prev = if has_prev { "‹ prev" } else { "      " };
    let next = if has_next { "next ›" } else { "" };
    format!(
        "{}  Page {page} / {total_pages}  {}",
        style_text(prev, StyleType::Subtle),
        style_text(next, StyleType::Subtle)
    )
}

/// Spinner shown while a request is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Asks a yes/no question on the terminal. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> std::io::Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{question} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("{}", style_text(&"─".repeat(term_width), StyleType::Subtle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_page_indicator_mentions_position() {
        console::set_colors_enabled(false);
        let text = page_indicator(2, 3, true, true);
        assert!(text.contains("Page 2 / 3"));
        assert!(text.contains("prev"));
        assert!(text.contains("next"));
    }
}

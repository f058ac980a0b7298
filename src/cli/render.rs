use super::ui::{self, StyleType};
use crate::app::View;
use crate::core::conversion::format_rate;
use crate::core::dispatch::Render;
use crate::core::state::{HistoryView, RatesView, Tab};
use chrono::Local;
use comfy_table::Cell;
use indicatif::ProgressBar;

/// Which part of the screen a one-shot command cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Alerts only
    Quiet,
    All,
    Conversion,
    Rates,
    History,
    Currencies,
}

/// Prints renders to the terminal. Alerts and the busy spinner are always
/// shown; everything else only when it belongs to the focused panel.
pub struct TerminalView {
    focus: Panel,
    spinner: Option<ProgressBar>,
}

impl TerminalView {
    pub fn interactive() -> Self {
        Self::focused(Panel::All)
    }

    pub fn focused(focus: Panel) -> Self {
        Self {
            focus,
            spinner: None,
        }
    }

    pub fn set_focus(&mut self, focus: Panel) {
        self.focus = focus;
    }

    fn shows(&self, panel: Panel) -> bool {
        self.focus == Panel::All || self.focus == panel
    }

    /// Prints without tearing an active spinner.
    fn print(&self, f: impl FnOnce()) {
        match &self.spinner {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }

    fn set_busy(&mut self, busy: bool) {
        match (busy, self.spinner.take()) {
            (true, None) => self.spinner = Some(ui::new_spinner("Converting...")),
            (true, Some(pb)) => self.spinner = Some(pb),
            (false, Some(pb)) => pb.finish_and_clear(),
            (false, None) => {}
        }
    }
}

impl View for TerminalView {
    fn render(&mut self, render: &Render) {
        match render {
            Render::ConvertControl { enabled, busy } => {
                self.set_busy(*busy);
                if self.focus == Panel::All && !enabled && !busy {
                    self.print(|| {
                        println!(
                            "{}",
                            ui::style_text("Enter a positive amount to convert", StyleType::Subtle)
                        )
                    });
                }
            }
            Render::ConversionResult { result, rate_text } if self.shows(Panel::Conversion) => {
                self.print(|| {
                    println!(
                        "{}  {}",
                        ui::style_text(result, StyleType::Result),
                        ui::style_text(rate_text, StyleType::Subtle)
                    )
                });
            }
            Render::Alert(message) => {
                self.print(|| eprintln!("{}", ui::style_text(message, StyleType::Error)));
            }
            Render::CatalogUnavailable => {
                self.print(|| {
                    eprintln!(
                        "{}",
                        ui::style_text("Failed to load currencies", StyleType::Error)
                    )
                });
            }
            Render::CurrencyOptions { options, from, to } => {
                if self.focus == Panel::Currencies {
                    let mut table = ui::new_styled_table();
                    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
                    for (code, name) in options {
                        table.add_row(vec![Cell::new(code), Cell::new(name)]);
                    }
                    self.print(|| println!("{table}"));
                } else if self.focus == Panel::All {
                    let line = format!(
                        "Loaded {} currencies. {}",
                        options.len(),
                        selection_text(from.as_deref(), to.as_deref())
                    );
                    self.print(|| println!("{}", ui::style_text(&line, StyleType::Subtle)));
                }
            }
            Render::Selection { from, to } if self.focus == Panel::All => {
                let line = selection_text(from.as_deref(), to.as_deref());
                self.print(|| println!("{line}"));
            }
            Render::PopularRates(view) if self.shows(Panel::Rates) => {
                let text = rates_table(view);
                self.print(|| println!("{text}"));
            }
            Render::PopularRatesUnavailable if self.shows(Panel::Rates) => {
                self.print(|| {
                    eprintln!("{}", ui::style_text("Failed to load rates", StyleType::Error))
                });
            }
            Render::History(view) if self.shows(Panel::History) => {
                let text = history_table(view);
                self.print(|| println!("{text}"));
            }
            Render::Tabs(active) if self.focus == Panel::All => {
                let text = tab_bar(*active);
                self.print(|| {
                    ui::print_separator();
                    println!("{text}");
                });
            }
            Render::ConfirmClear { count } if self.focus == Panel::All => {
                let question = format!(
                    "Clear {count} conversion(s) from history? Type 'yes' to confirm."
                );
                self.print(|| println!("{}", ui::style_text(&question, StyleType::Title)));
            }
            _ => {}
        }
    }
}

fn selection_text(from: Option<&str>, to: Option<&str>) -> String {
    format!(
        "From {} → To {}",
        from.unwrap_or("---"),
        to.unwrap_or("---")
    )
}

fn tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            let label = format!(" {tab} ");
            if *tab == active {
                ui::style_text(&label, StyleType::ActiveTab)
            } else {
                ui::style_text(&label, StyleType::InactiveTab)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn rates_table(view: &RatesView) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Rate")]);
    for (code, rate) in &view.entries {
        table.add_row(vec![
            Cell::new(format!("{}/{}", view.base, code)),
            ui::number_cell(format_rate(*rate)),
        ]);
    }
    format!(
        "{}\n{table}\n{}",
        ui::style_text(&format!("Popular rates ({})", view.base), StyleType::Title),
        ui::page_indicator(view.page, view.total_pages, view.has_prev, view.has_next)
    )
}

fn history_table(view: &HistoryView) -> String {
    let title = ui::style_text(
        &format!("Conversion history ({})", view.sort_order),
        StyleType::Title,
    );
    if view.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text("No conversion history yet", StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Conversion"),
        ui::header_cell("Rate"),
        ui::header_cell("Time"),
    ]);
    for record in &view.entries {
        table.add_row(vec![
            Cell::new(format!(
                "{} {} → {} {}",
                record.amount, record.from, record.result, record.to
            )),
            ui::number_cell(format_rate(record.rate)),
            ui::subtle_cell(
                record
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
        ]);
    }

    if view.show_pagination() {
        format!(
            "{title}\n{table}\n{}",
            ui::page_indicator(view.page, view.total_pages, view.has_prev, view.has_next)
        )
    } else {
        format!("{title}\n{table}")
    }
}

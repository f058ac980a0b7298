use super::one_shot_controller;
use super::render::Panel;
use super::ui::{self, StyleType};
use crate::core::config::AppConfig;
use crate::core::dispatch::Msg;
use crate::core::history::SortOrder;
use crate::core::storage::KeyValueStorage;
use anyhow::Result;
use std::sync::Arc;

/// Prints one page of the conversion history.
pub fn show(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStorage>,
    sort_order: SortOrder,
    page: Option<usize>,
) -> Result<()> {
    let mut controller = one_shot_controller(config, storage, Panel::Quiet)?;
    controller.dispatch(Msg::SortHistory(sort_order));
    controller.view_mut().set_focus(Panel::History);
    controller.dispatch(Msg::GoToHistoryPage(page.unwrap_or(1)));
    Ok(())
}

/// Clears the history after confirmation. `assume_yes` skips the prompt.
pub fn clear(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStorage>,
    assume_yes: bool,
) -> Result<()> {
    let mut controller = one_shot_controller(config, storage, Panel::Quiet)?;
    let count = controller.state().history().len();
    if count == 0 {
        println!("No conversion history to clear");
        return Ok(());
    }

    controller.dispatch(Msg::RequestClearHistory);
    let confirmed =
        assume_yes || ui::confirm(&format!("Clear {count} conversion(s) from history?"))?;
    if confirmed {
        controller.dispatch(Msg::ConfirmClearHistory);
        println!("{}", ui::style_text("Conversion history cleared", StyleType::Result));
    } else {
        controller.dispatch(Msg::CancelClearHistory);
        println!("{}", ui::style_text("Nothing cleared", StyleType::Subtle));
    }
    Ok(())
}

use super::one_shot_controller;
use super::render::Panel;
use crate::core::config::AppConfig;
use crate::core::dispatch::Msg;
use crate::core::storage::KeyValueStorage;
use anyhow::{Result, bail};
use std::sync::Arc;

/// Loads the catalog and popular rates, then prints one page of rates.
pub async fn run(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStorage>,
    page: Option<usize>,
) -> Result<()> {
    let mut controller = one_shot_controller(config, storage, Panel::Quiet)?;
    controller.dispatch(Msg::Init);
    controller.settle().await;

    if controller.state().snapshot().is_none() {
        bail!("Failed to load rates for {}", config.popular_base);
    }

    controller.view_mut().set_focus(Panel::Rates);
    controller.dispatch(Msg::GoToRatesPage(page.unwrap_or(1)));
    Ok(())
}

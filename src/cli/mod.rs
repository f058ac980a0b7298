pub mod convert;
pub mod currencies;
pub mod history;
pub mod interactive;
pub mod rates;
pub mod render;
pub mod setup;
pub mod ui;

use crate::app::Controller;
use crate::core::config::AppConfig;
use crate::core::history::History;
use crate::core::state::AppState;
use crate::core::storage::KeyValueStorage;
use crate::providers::FrankfurterClient;
use anyhow::Result;
use render::{Panel, TerminalView};
use std::sync::Arc;

/// Builds a controller for a one-shot command, with history loaded from
/// `storage`.
pub(crate) fn one_shot_controller(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStorage>,
    focus: Panel,
) -> Result<Controller<TerminalView>> {
    let client = FrankfurterClient::new(&config.provider.base_url)?;
    let state = AppState::new(&config.popular_base, History::load(storage.as_ref()))
        .with_defaults(&config.default_from, &config.default_to);
    Ok(Controller::new(
        state,
        client,
        storage,
        TerminalView::focused(focus),
    ))
}

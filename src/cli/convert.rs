use super::one_shot_controller;
use super::render::Panel;
use crate::core::config::AppConfig;
use crate::core::dispatch::Msg;
use crate::core::state::ConversionOutcome;
use crate::core::storage::KeyValueStorage;
use anyhow::{Result, bail};
use std::sync::Arc;

/// Converts `amount` once and records it in the history.
pub async fn run(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStorage>,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let mut controller = one_shot_controller(config, storage, Panel::Conversion)?;

    // Amount goes last so that picking the pair doesn't convert early
    controller.dispatch(Msg::FromChanged(from.to_string()));
    controller.dispatch(Msg::ToChanged(to.to_string()));
    controller.dispatch(Msg::AmountChanged(amount.to_string()));
    controller.dispatch(Msg::Convert);
    controller.settle().await;

    match controller.state().last_conversion() {
        Some(ConversionOutcome::Converted(_)) => Ok(()),
        Some(ConversionOutcome::Failed(e)) => bail!("Conversion failed: {}", e),
        None => bail!("Nothing was converted"),
    }
}

use super::render::{Panel, TerminalView};
use crate::app::View;
use crate::core::config::AppConfig;
use crate::core::dispatch::Render;
use crate::providers::FrankfurterClient;
use anyhow::{Context, Result};

/// Prints every supported currency.
pub async fn run(config: &AppConfig) -> Result<()> {
    let client = FrankfurterClient::new(&config.provider.base_url)?;
    let catalog = client
        .fetch_currencies()
        .await
        .context("Failed to load currencies")?;

    let mut view = TerminalView::focused(Panel::Currencies);
    view.render(&Render::CurrencyOptions {
        options: catalog.entries().to_vec(),
        from: None,
        to: None,
    });
    Ok(())
}

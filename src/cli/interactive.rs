use super::render::TerminalView;
use super::ui::{self, StyleType};
use crate::app::Controller;
use crate::core::config::AppConfig;
use crate::core::dispatch::Msg;
use crate::core::history::{History, SortOrder};
use crate::core::state::{AppState, Tab};
use crate::core::storage::KeyValueStorage;
use crate::providers::FrankfurterClient;
use anyhow::{Result, anyhow, bail};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  <number>            set the amount and convert
  amount <number>     set the amount
  from <CODE>         set the source currency
  to <CODE>           set the target currency
  convert | c         convert the amount
  swap                swap source and target
  tab <convert|rates|history>
  next | prev         page through the active tab
  pick <CODE>         convert from the popular base into CODE
  sort <latest|oldest>
  clear               clear the conversion history
  refresh             reload popular rates
  help | quit";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Empty,
}

/// Parses one line against the current state. While a clear is awaiting
/// confirmation, the line is the answer.
pub fn parse_input(line: &str, state: &AppState) -> Result<Input> {
    let line = line.trim();
    if state.confirm_clear_pending() {
        let msg = if ui::is_yes(line) {
            Msg::ConfirmClearHistory
        } else {
            Msg::CancelClearHistory
        };
        return Ok(Input::Msgs(vec![msg]));
    }

    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(Input::Empty);
    };
    let arg = parts.next();
    let required = |name: &str| arg.ok_or_else(|| anyhow!("Usage: {} <value>", name));

    let msgs = match command.to_lowercase().as_str() {
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" | "q" => return Ok(Input::Quit),
        "amount" => vec![Msg::AmountChanged(required("amount")?.to_string())],
        "from" => vec![Msg::FromChanged(required("from")?.to_string())],
        "to" => vec![Msg::ToChanged(required("to")?.to_string())],
        "convert" | "c" => vec![Msg::Convert],
        "swap" => vec![Msg::Swap],
        "tab" => vec![Msg::SelectTab(required("tab")?.parse::<Tab>()?)],
        "pick" => vec![Msg::QuickSet(required("pick")?.to_string())],
        "sort" => vec![Msg::SortHistory(required("sort")?.parse::<SortOrder>()?)],
        "clear" => vec![Msg::RequestClearHistory],
        "refresh" => vec![Msg::RefreshPopularRates],
        "next" | "n" => match state.active_tab() {
            Tab::Rates => vec![Msg::NextRatesPage],
            Tab::History => vec![Msg::NextHistoryPage],
            Tab::Convert => bail!("Switch to the rates or history tab to page"),
        },
        "prev" | "p" => match state.active_tab() {
            Tab::Rates => vec![Msg::PrevRatesPage],
            Tab::History => vec![Msg::PrevHistoryPage],
            Tab::Convert => bail!("Switch to the rates or history tab to page"),
        },
        _ if command.parse::<f64>().is_ok() => {
            vec![Msg::AmountChanged(command.to_string()), Msg::Convert]
        }
        _ => bail!("Unknown command: {}. Type 'help' for a list.", command),
    };
    Ok(Input::Msgs(msgs))
}

/// Runs the interactive session until stdin closes or the user quits.
pub async fn run(config: &AppConfig, storage: Arc<dyn KeyValueStorage>) -> Result<()> {
    let client = FrankfurterClient::new(&config.provider.base_url)?;
    let state = AppState::new(&config.popular_base, History::load(storage.as_ref()))
        .with_defaults(&config.default_from, &config.default_to);
    let mut controller = Controller::new(state, client, storage, TerminalView::interactive());

    println!("{}", ui::style_text("xfx currency converter", StyleType::Title));
    println!("{}", ui::style_text(HELP, StyleType::Subtle));
    controller.dispatch(Msg::Init);

    let period = Duration::from_secs(config.refresh_interval_secs.max(1));
    let mut refresh = interval_at(Instant::now() + period, period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                match parse_input(&line, controller.state()) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Empty) => {}
                    Ok(Input::Msgs(msgs)) => {
                        for msg in msgs {
                            controller.dispatch(msg);
                        }
                    }
                    Err(e) => eprintln!("{}", ui::style_text(&e.to_string(), StyleType::Error)),
                }
            }
            _ = refresh.tick() => {
                debug!("Refreshing popular rates");
                controller.dispatch(Msg::RefreshPopularRates);
            }
            Some(msg) = controller.next_message() => {
                controller.dispatch(msg);
            }
        }
    }

    info!("Interactive session ended");
    Ok(())
}

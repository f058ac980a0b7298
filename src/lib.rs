pub mod app;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::history::SortOrder;
use crate::core::storage::KeyValueStorage;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Rates {
        page: Option<usize>,
    },
    History {
        sort: SortOrder,
        page: Option<usize>,
    },
    ClearHistory {
        yes: bool,
    },
    Currencies,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let open_storage = || -> Result<Arc<dyn KeyValueStorage>> {
        Ok(Arc::new(store::DiskStorage::open(&config.storage_path()?)?))
    };

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&config, open_storage()?, &amount, &from, &to).await
        }
        AppCommand::Rates { page } => cli::rates::run(&config, open_storage()?, page).await,
        AppCommand::History { sort, page } => {
            cli::history::show(&config, open_storage()?, sort, page)
        }
        AppCommand::ClearHistory { yes } => cli::history::clear(&config, open_storage()?, yes),
        AppCommand::Currencies => cli::currencies::run(&config).await,
        AppCommand::Interactive => cli::interactive::run(&config, open_storage()?).await,
    }
}

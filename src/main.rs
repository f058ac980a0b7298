use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xfx::core::history::SortOrder;
use xfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xfx::AppCommand {
    fn from(cmd: Commands) -> xfx::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => xfx::AppCommand::Convert { amount, from, to },
            Commands::Rates { page } => xfx::AppCommand::Rates { page },
            Commands::History { sort, page } => xfx::AppCommand::History { sort, page },
            Commands::ClearHistory { yes } => xfx::AppCommand::ClearHistory { yes },
            Commands::Currencies => xfx::AppCommand::Currencies,
            Commands::Interactive => xfx::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: String,
        /// Currency to convert from, e.g. USD
        from: String,
        /// Currency to convert to, e.g. EUR
        to: String,
    },
    /// Display popular exchange rates
    Rates {
        /// Page to display
        #[arg(short, long)]
        page: Option<usize>,
    },
    /// Display conversion history
    History {
        /// Sort order: latest or oldest
        #[arg(short, long, default_value = "latest")]
        sort: SortOrder,
        /// Page to display
        #[arg(short, long)]
        page: Option<usize>,
    },
    /// Clear conversion history
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List supported currencies
    Currencies,
    /// Start an interactive session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xfx::cli::setup::setup(),
        Some(cmd) => xfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

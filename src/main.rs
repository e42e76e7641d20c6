use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use satsconv::core::CurrencyCode;
use satsconv::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current BTC rate
    Rate {
        /// Currency for this run only (cad, usd, jpy, php)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Convert a fiat amount to sats
    ToSats {
        amount: String,
        /// Currency for this run only (cad, usd, jpy, php)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Convert sats to a fiat amount
    ToFiat {
        sats: String,
        /// Currency for this run only (cad, usd, jpy, php)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Show or change the remembered currency
    Currency {
        /// Currency to remember (cad, usd, jpy, php)
        currency: Option<CurrencyCode>,
        /// Forget the remembered currency
        #[arg(long, conflicts_with = "currency")]
        reset: bool,
    },
    /// Convert interactively, like the two linked input fields
    Interactive,
}

impl From<Commands> for satsconv::AppCommand {
    fn from(cmd: Commands) -> satsconv::AppCommand {
        match cmd {
            Commands::Rate { currency } => satsconv::AppCommand::Rate { currency },
            Commands::ToSats { amount, currency } => {
                satsconv::AppCommand::ToSats { amount, currency }
            }
            Commands::ToFiat { sats, currency } => satsconv::AppCommand::ToFiat { sats, currency },
            Commands::Currency { currency, reset } => {
                satsconv::AppCommand::Currency { currency, reset }
            }
            Commands::Interactive => satsconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => satsconv::cli::setup::setup(),
        Some(cmd) => satsconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

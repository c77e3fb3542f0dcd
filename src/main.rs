use clap::Parser;
use std::process::ExitCode;
use tradebook::args::{Args, Command};
use tradebook::{commands, Client, Config, Result, Store};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.base_url()).await?.print(),

        Command::Login(login_args) => {
            let config = Config::load(home).await?;
            commands::login(&config, login_args.username(), login_args.password())
                .await?
                .print()
        }

        Command::Logout => {
            let config = Config::load(home).await?;
            commands::logout(&config).await?.print()
        }

        Command::Dashboard => {
            let store = store(home).await?;
            commands::dashboard(&store).await?.print()
        }

        Command::Stock => {
            let store = store(home).await?;
            commands::stock(&store).await?.print()
        }

        Command::Ledger(ledger_args) => {
            let store = store(home).await?;
            commands::ledger(&store, ledger_args.customer()).await?.print()
        }

        Command::List(list_args) => {
            let store = store(home).await?;
            commands::list(&store, list_args.collection()).await?.print()
        }

        Command::Add(add_args) => {
            use tradebook::args::AddSubcommand;
            let store = store(home).await?;
            match add_args.entity() {
                AddSubcommand::Material(a) => commands::add_material(&store, a).await?.print(),
                AddSubcommand::Customer(a) => commands::add_customer(&store, a).await?.print(),
                AddSubcommand::Purchase(a) => commands::add_purchase(&store, a).await?.print(),
                AddSubcommand::Sale(a) => commands::add_sale(&store, a).await?.print(),
                AddSubcommand::Payment(a) => commands::add_payment(&store, a).await?.print(),
                AddSubcommand::Expense(a) => commands::add_expense(&store, a).await?.print(),
            }
        }

        Command::Delete(delete_args) => {
            let store = store(home).await?;
            commands::delete(&store, delete_args.collection(), delete_args.id())
                .await?
                .print()
        }
    };
    Ok(())
}

async fn store(home: &std::path::Path) -> Result<Store> {
    let config = Config::load(home).await?;
    Ok(Store::new(Client::from_config(&config).await?))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

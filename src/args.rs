//! These structs provide the CLI interface for the tradebook CLI.

use crate::model::ExpenseKind;
use crate::Collection;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// tradebook: a command-line ledger for a small trading business.
///
/// This program talks to a remote bookkeeping backend. It tracks material inventory, customer
/// accounts, purchase/sale transactions and operating expenses, and derives profit-and-loss
/// metrics from them: weighted-average-cost inventory valuation, per-customer balances, and a
/// business-wide dashboard (net profit, available cash, outstanding receivables).
///
/// Run 'tradebook init' once to point it at your backend, then 'tradebook login'. All data lives
/// on the backend; this tool keeps nothing locally except your configuration and credentials.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initial configuration.
    ///
    /// This is the first command you should run. Decide what directory you want configuration
    /// and credentials stored in and pass it as --home (default $HOME/tradebook), and pass the
    /// base URL of your bookkeeping backend's API as --base-url.
    Init(InitArgs),
    /// Log in to the backend and store the issued credential pair.
    Login(LoginArgs),
    /// Clear the stored credential pair.
    Logout,
    /// Show the business-wide dashboard: revenue, profit, stock value, available cash.
    Dashboard,
    /// Show the per-material stock valuation table.
    Stock,
    /// Show one customer's ledger: billed, collected, outstanding, gross profit.
    Ledger(LedgerArgs),
    /// List the raw records of a collection.
    List(ListArgs),
    /// Create a record: a material, customer, purchase, sale, payment or expense.
    Add(AddArgs),
    /// Delete a record by id.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where tradebook configuration and credentials are held.
    /// Defaults to ~/tradebook
    #[arg(long, env = "TRADEBOOK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the bookkeeping backend's API, e.g. https://books.example.com/api
    #[arg(long)]
    base_url: String,
}

impl InitArgs {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    /// The backend account username.
    #[arg(long)]
    username: String,

    /// The backend account password. Prefer setting TRADEBOOK_PASSWORD over passing this on the
    /// command line.
    #[arg(long, env = "TRADEBOOK_PASSWORD")]
    password: String,
}

impl LoginArgs {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Parser, Clone)]
pub struct LedgerArgs {
    /// The id of the customer whose ledger to show.
    #[arg(long)]
    customer: i64,
}

impl LedgerArgs {
    pub fn customer(&self) -> i64 {
        self.customer
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Which collection to list.
    #[arg(value_enum)]
    collection: Collection,
}

impl ListArgs {
    pub fn collection(&self) -> Collection {
        self.collection
    }
}

#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// Which collection to delete from.
    #[arg(value_enum)]
    collection: Collection,

    /// The id of the record to delete.
    #[arg(long)]
    id: i64,
}

impl DeleteArgs {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[command(subcommand)]
    entity: AddSubcommand,
}

impl AddArgs {
    pub fn entity(&self) -> &AddSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Add a material (a stock keeping unit).
    Material(AddMaterialArgs),
    /// Add a customer.
    Customer(AddCustomerArgs),
    /// Record a purchase of inventory (a CR transaction).
    Purchase(AddPurchaseArgs),
    /// Record a sale to a customer (a DB transaction).
    Sale(AddSaleArgs),
    /// Record a payment received from a customer (an RC transaction).
    Payment(AddPaymentArgs),
    /// Record an operating expense or owner drawing.
    Expense(AddExpenseArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct AddMaterialArgs {
    /// The material's name.
    #[arg(long)]
    name: String,

    /// An optional color or short description.
    #[arg(long)]
    color: Option<String>,
}

impl AddMaterialArgs {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddCustomerArgs {
    /// The customer's name.
    #[arg(long)]
    name: String,
}

impl AddCustomerArgs {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddPurchaseArgs {
    /// The id of the material purchased.
    #[arg(long)]
    material: i64,

    /// The quantity purchased.
    #[arg(long)]
    quantity: Decimal,

    /// The total price paid for the whole quantity.
    #[arg(long)]
    total_price: Decimal,

    /// Optional notes.
    #[arg(long)]
    description: Option<String>,
}

impl AddPurchaseArgs {
    pub fn material(&self) -> i64 {
        self.material
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddSaleArgs {
    /// The id of the material sold.
    #[arg(long)]
    material: i64,

    /// The id of the customer buying.
    #[arg(long)]
    customer: i64,

    /// The quantity sold.
    #[arg(long)]
    quantity: Decimal,

    /// The total price billed for the whole quantity.
    #[arg(long)]
    total_price: Decimal,

    /// The amount the customer paid at sale time; the rest becomes their outstanding balance.
    #[arg(long, default_value = "0")]
    money_received: Decimal,

    /// Optional notes.
    #[arg(long)]
    description: Option<String>,
}

impl AddSaleArgs {
    pub fn material(&self) -> i64 {
        self.material
    }

    pub fn customer(&self) -> i64 {
        self.customer
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn money_received(&self) -> Decimal {
        self.money_received
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddPaymentArgs {
    /// The id of the paying customer.
    #[arg(long)]
    customer: i64,

    /// The amount received.
    #[arg(long)]
    amount: Decimal,

    /// Optional notes.
    #[arg(long)]
    description: Option<String>,
}

impl AddPaymentArgs {
    pub fn customer(&self) -> i64 {
        self.customer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// What the expense was for.
    #[arg(long)]
    description: String,

    /// The amount spent.
    #[arg(long)]
    amount: Decimal,

    /// The date incurred (YYYY-MM-DD). Defaults to today; backdating is allowed.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Operative (reduces profit) or Personal (an owner drawing).
    #[arg(long)]
    expense_type: ExpenseKind,
}

impl AddExpenseArgs {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn expense_type(&self) -> ExpenseKind {
        self.expense_type
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("tradebook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or TRADEBOOK_HOME instead of relying on the default \
                tradebook home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("tradebook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DisplayPath(PathBuf::from(s)))
    }
}

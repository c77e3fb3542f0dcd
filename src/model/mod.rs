//! The record types fetched from (and submitted to) the bookkeeping backend, plus the immutable
//! `Snapshot` bundle that the derivation engines read.

mod amount;
mod capital;
mod customer;
mod expense;
mod material;
mod snapshot;
mod transaction;

pub use amount::Amount;
pub use capital::CapitalEntry;
pub use customer::{Customer, NewCustomer};
pub use expense::{Expense, ExpenseKind, NewExpense};
pub use material::{Material, NewMaterial};
pub use snapshot::Snapshot;
pub use transaction::{NewTransaction, Transaction, TxKind};

/// Rendered in place of a name we cannot resolve, e.g. a transaction whose material was deleted.
pub const NOT_AVAILABLE: &str = "N/A";

//! The derived-financial-metrics engines.
//!
//! Everything in this module is a pure function of an immutable snapshot of the record
//! collections: no caching, no running balances, no I/O. The collections are small and are
//! refetched wholesale after every mutation, so the engines simply recompute from scratch each
//! time and are trivially idempotent.

mod customer;
mod dashboard;
mod valuation;

pub use customer::{customer_ledger, CustomerLedger};
pub use dashboard::{dashboard, DashboardMetrics};
pub use valuation::{value_materials, wac_table, MaterialValuation, WacTable};

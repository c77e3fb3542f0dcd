use crate::model::{Amount, CapitalEntry, Customer, Expense, Material, Transaction, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};

/// The wholesale in-memory copy of the backend's collections. The store owns exactly one of
/// these at a time and every engine reads it immutably; mutations invalidate it and force a
/// fresh fetch, so nothing derived from a `Snapshot` can go stale without being recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub materials: Vec<Material>,
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
    pub expenses: Vec<Expense>,
    pub capital: Vec<CapitalEntry>,
}

impl Snapshot {
    /// The owner's total cash injection: the sum over all capital rows, so that later top-ups
    /// are counted alongside the initial amount.
    pub fn starting_capital(&self) -> Amount {
        self.capital.iter().map(|entry| entry.amount).sum()
    }

    pub fn material(&self, id: i64) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// The material's name, or the `N/A` sentinel when the id does not resolve.
    pub fn material_name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.material(id))
            .map(|m| m.name.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// The customer's name, or the `N/A` sentinel when the id does not resolve.
    pub fn customer_name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.customer(id))
            .map(|c| c.name.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }
}

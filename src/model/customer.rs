use serde::{Deserialize, Serialize};

/// A counterparty who buys materials (debit) or pays down their balance (credit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

/// Create payload for a customer.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub name: String,
}

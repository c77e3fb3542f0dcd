use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification of an expense. This is the one field that decides whether an outflow hits
/// operating profit or is an owner drawing, so an unknown code fails deserialization loudly
/// rather than being guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseKind {
    /// A cost of running the business; reduces net profit.
    Operative,
    /// An owner drawing; reduces available cash but not operating profit.
    Personal,
}

serde_plain::derive_display_from_serialize!(ExpenseKind);
serde_plain::derive_fromstr_from_deserialize!(ExpenseKind);

/// An operating expense or owner drawing. Dated rather than timestamped because expenses may be
/// backdated when entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub amount: Amount,
    pub date: NaiveDate,
    pub expense_type: ExpenseKind,
}

/// Create payload for an expense.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub expense_type: ExpenseKind,
}

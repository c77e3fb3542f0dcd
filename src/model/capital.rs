use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One injection of owner capital. The backend stores these as dated rows; the dashboard uses
/// their sum as the scalar starting capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEntry {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub amount: Amount,
    pub date: NaiveDate,
}

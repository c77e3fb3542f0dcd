//! Per-customer revenue, receivables and gross profit.

use crate::model::{Amount, Transaction, TxKind};
use crate::report::WacTable;
use serde::Serialize;

/// The derived position of one customer against the business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLedger {
    pub customer_id: i64,
    /// Total revenue billed to the customer: the sum of sale prices.
    pub sell_value: Amount,
    /// Cash actually collected from the customer, whether at sale time or as later payments.
    pub actual_value: Amount,
    /// Outstanding receivable: billed minus collected. Negative when the customer has overpaid.
    pub borrowings: Amount,
    /// Cost of the goods sold to this customer, at each material's current all-time WAC.
    pub total_cogs: Amount,
    /// `sell_value - total_cogs`.
    pub gross_profit: Amount,
}

/// Derives one customer's ledger from the transaction log and the current WAC table. Pure: the
/// result is re-derivable at any time from its inputs alone, and a material id that is missing
/// from the WAC table simply contributes zero cost.
pub fn customer_ledger(
    customer_id: i64,
    transactions: &[Transaction],
    wac: &WacTable,
) -> CustomerLedger {
    let mut sell_value = Amount::ZERO;
    let mut money_received_from_sales = Amount::ZERO;
    let mut payments_received = Amount::ZERO;
    let mut total_cogs = Amount::ZERO;

    for tx in transactions {
        if tx.customer != Some(customer_id) {
            continue;
        }
        match tx.transaction_type {
            TxKind::Db => {
                sell_value += tx.total_price;
                money_received_from_sales += tx.money_received;
                let unit_cost = tx
                    .material
                    .and_then(|id| wac.get(&id))
                    .copied()
                    .unwrap_or(Amount::ZERO);
                total_cogs += tx.quantity * unit_cost;
            }
            // For RC rows the paid amount travels in total_price.
            TxKind::Rc => payments_received += tx.total_price,
            TxKind::Cr => {}
        }
    }

    let actual_value = money_received_from_sales + payments_received;
    CustomerLedger {
        customer_id,
        sell_value,
        actual_value,
        borrowings: sell_value - actual_value,
        total_cogs,
        gross_profit: sell_value - total_cogs,
    }
}

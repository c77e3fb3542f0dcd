//! Business-wide dashboard metrics.
//!
//! The profit figure here is not a textbook accrual P&L: revenue that has been billed but not
//! yet collected (`borrowings`) is deducted from net profit until it comes in. That adjustment
//! is what makes `available_cash` reconcile against the raw cash movements, so it is part of the
//! contract, not a quirk to clean up.

use crate::model::{Amount, ExpenseKind, Snapshot, TxKind};
use crate::report::{value_materials, wac_table};
use serde::Serialize;

/// Everything the dashboard shows, derived in one pass from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// Revenue billed across all sales.
    pub total_revenue: Amount,
    /// Cash collected from customers: at sale time plus standalone payments.
    pub money_received: Amount,
    /// Cost of all goods sold, at each material's all-time WAC.
    pub total_cogs: Amount,
    /// Cash spent purchasing inventory.
    pub total_purchase_value: Amount,
    /// Operating expenses.
    pub total_operating_expenses: Amount,
    /// Owner drawings.
    pub total_cash_withdrawal: Amount,
    /// Value of inventory currently on hand.
    pub total_current_stock_value: Amount,
    /// Revenue summed independently over the sale rows. Always equals `total_revenue`; both are
    /// kept because the accounting identity between them is a tested invariant.
    pub total_sell_value: Amount,
    /// Outstanding receivables across all customers.
    pub borrowings: Amount,
    /// Revenue minus COGS, operating expenses and uncollected revenue.
    pub net_profit: Amount,
    /// `net_profit` minus owner drawings.
    pub adjusted_net_profit: Amount,
    /// Starting capital plus cash in, minus purchases, operating expenses and drawings.
    pub available_cash: Amount,
}

/// Derives the business-wide metrics from a snapshot. Pure and idempotent: equal snapshots
/// produce equal metrics.
pub fn dashboard(snapshot: &Snapshot) -> DashboardMetrics {
    let valuations = value_materials(&snapshot.materials, &snapshot.transactions);
    let wac = wac_table(&valuations);

    // One fold over the log for the cash and revenue aggregates.
    let mut total_revenue = Amount::ZERO;
    let mut money_received = Amount::ZERO;
    let mut total_cogs = Amount::ZERO;
    let mut total_purchase_value = Amount::ZERO;
    for tx in &snapshot.transactions {
        match tx.transaction_type {
            TxKind::Db => {
                total_revenue += tx.total_price;
                money_received += tx.money_received;
                let unit_cost = tx
                    .material
                    .and_then(|id| wac.get(&id))
                    .copied()
                    .unwrap_or(Amount::ZERO);
                total_cogs += tx.quantity * unit_cost;
            }
            TxKind::Rc => money_received += tx.total_price,
            TxKind::Cr => total_purchase_value += tx.total_price,
        }
    }

    let mut total_operating_expenses = Amount::ZERO;
    let mut total_cash_withdrawal = Amount::ZERO;
    for expense in &snapshot.expenses {
        match expense.expense_type {
            ExpenseKind::Operative => total_operating_expenses += expense.amount,
            ExpenseKind::Personal => total_cash_withdrawal += expense.amount,
        }
    }

    let total_current_stock_value = valuations.iter().map(|v| v.stock_value).sum();

    // Recomputed independently of the fold above; the two must agree.
    let total_sell_value: Amount = snapshot
        .transactions
        .iter()
        .filter(|tx| tx.transaction_type == TxKind::Db)
        .map(|tx| tx.total_price)
        .sum();

    let borrowings = total_sell_value - money_received;
    let net_profit = total_revenue - total_cogs - total_operating_expenses - borrowings;
    let adjusted_net_profit = net_profit - total_cash_withdrawal;
    let available_cash = snapshot.starting_capital() + money_received
        - total_purchase_value
        - total_operating_expenses
        - total_cash_withdrawal;

    DashboardMetrics {
        total_revenue,
        money_received,
        total_cogs,
        total_purchase_value,
        total_operating_expenses,
        total_cash_withdrawal,
        total_current_stock_value,
        total_sell_value,
        borrowings,
        net_profit,
        adjusted_net_profit,
        available_cash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CapitalEntry, Expense, ExpenseKind, Snapshot};
    use crate::report::fixtures::{material, payment, purchase, sale};
    use chrono::NaiveDate;

    fn expense(id: i64, kind: ExpenseKind, amount: i64) -> Expense {
        Expense {
            id,
            description: format!("expense {id}"),
            amount: amount.into(),
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            expense_type: kind,
        }
    }

    fn capital(amount: i64) -> CapitalEntry {
        CapitalEntry {
            id: 1,
            description: "Initial".to_string(),
            amount: amount.into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_scenario_c_available_cash() {
        // Capital 1000, CR 100, DB 80 fully received, operating 20, drawing 10.
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper")],
            transactions: vec![purchase(1, 1, 10, 100), sale(2, 1, 2, 4, 80, 80)],
            expenses: vec![
                expense(1, ExpenseKind::Operative, 20),
                expense(2, ExpenseKind::Personal, 10),
            ],
            capital: vec![capital(1000)],
            ..Snapshot::default()
        };

        let metrics = dashboard(&snapshot);
        assert_eq!(metrics.available_cash, Amount::from(950));
        // Fully-collected revenue means no borrowings deduction.
        assert_eq!(metrics.borrowings, Amount::ZERO);
        assert_eq!(metrics.net_profit, Amount::from(80 - 40 - 20));
        assert_eq!(metrics.adjusted_net_profit, Amount::from(80 - 40 - 20 - 10));
    }

    #[test]
    fn test_accounting_identity_revenue_vs_sell_value() {
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper"), material(2, "Tin")],
            transactions: vec![
                purchase(1, 1, 10, 100),
                purchase(2, 2, 3, 90),
                sale(3, 1, 2, 4, 80, 50),
                sale(4, 2, 5, 1, 45, 0),
                payment(5, 2, 30),
            ],
            ..Snapshot::default()
        };

        let metrics = dashboard(&snapshot);
        assert_eq!(metrics.total_revenue, metrics.total_sell_value);
        assert_eq!(metrics.total_revenue, Amount::from(125));
    }

    #[test]
    fn test_uncollected_revenue_reduces_net_profit() {
        // One sale of 80 with only 50 received: the outstanding 30 is deducted from profit.
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper")],
            transactions: vec![purchase(1, 1, 10, 100), sale(2, 1, 2, 4, 80, 50)],
            ..Snapshot::default()
        };

        let metrics = dashboard(&snapshot);
        assert_eq!(metrics.borrowings, Amount::from(30));
        // 80 revenue - 40 cogs - 0 expenses - 30 borrowings.
        assert_eq!(metrics.net_profit, Amount::from(10));
    }

    #[test]
    fn test_payment_moves_profit_not_revenue() {
        // Collecting the receivable later restores the profit without touching revenue.
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper")],
            transactions: vec![
                purchase(1, 1, 10, 100),
                sale(2, 1, 2, 4, 80, 50),
                payment(3, 2, 30),
            ],
            ..Snapshot::default()
        };

        let metrics = dashboard(&snapshot);
        assert_eq!(metrics.total_revenue, Amount::from(80));
        assert_eq!(metrics.money_received, Amount::from(80));
        assert_eq!(metrics.borrowings, Amount::ZERO);
        assert_eq!(metrics.net_profit, Amount::from(40));
    }

    #[test]
    fn test_stock_value_aggregation() {
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper"), material(2, "Tin")],
            transactions: vec![
                purchase(1, 1, 10, 100),
                purchase(2, 2, 5, 200),
                sale(3, 1, 2, 4, 80, 80),
            ],
            ..Snapshot::default()
        };

        let metrics = dashboard(&snapshot);
        // Copper: 6 left at wac 10 = 60. Tin: 5 at wac 40 = 200.
        assert_eq!(metrics.total_current_stock_value, Amount::from(260));
    }

    #[test]
    fn test_idempotent_recomputation() {
        let snapshot = Snapshot {
            materials: vec![material(1, "Copper")],
            transactions: vec![
                purchase(1, 1, 10, 100),
                sale(2, 1, 2, 4, 80, 50),
                payment(3, 2, 10),
            ],
            expenses: vec![expense(1, ExpenseKind::Operative, 5)],
            capital: vec![capital(500)],
            ..Snapshot::default()
        };

        assert_eq!(dashboard(&snapshot), dashboard(&snapshot));
    }

    #[test]
    fn test_empty_snapshot() {
        let metrics = dashboard(&Snapshot::default());
        assert_eq!(metrics.total_revenue, Amount::ZERO);
        assert_eq!(metrics.net_profit, Amount::ZERO);
        assert_eq!(metrics.available_cash, Amount::ZERO);
    }
}

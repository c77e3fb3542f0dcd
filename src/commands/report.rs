//! Handlers for the derived-metrics views: `dashboard`, `stock` and `ledger`.

use crate::commands::{render_table, Out};
use crate::report::{self, CustomerLedger, DashboardMetrics, MaterialValuation};
use crate::{Result, Store};
use anyhow::Context;

/// Shows the business-wide dashboard.
pub async fn dashboard(store: &Store) -> Result<Out<DashboardMetrics>> {
    let snapshot = store.snapshot().await?;
    let metrics = report::dashboard(&snapshot);

    let message = format!(
        "Dashboard\n\
         \x20 Revenue (billed):     {:>14}\n\
         \x20 Money received:       {:>14}\n\
         \x20 Outstanding:          {:>14}\n\
         \x20 Cost of goods sold:   {:>14}\n\
         \x20 Purchases:            {:>14}\n\
         \x20 Operating expenses:   {:>14}\n\
         \x20 Owner drawings:       {:>14}\n\
         \x20 Stock on hand:        {:>14}\n\
         \x20 Net profit:           {:>14}\n\
         \x20 Adjusted net profit:  {:>14}\n\
         \x20 Available cash:       {:>14}",
        metrics.total_revenue.to_string(),
        metrics.money_received.to_string(),
        metrics.borrowings.to_string(),
        metrics.total_cogs.to_string(),
        metrics.total_purchase_value.to_string(),
        metrics.total_operating_expenses.to_string(),
        metrics.total_cash_withdrawal.to_string(),
        metrics.total_current_stock_value.to_string(),
        metrics.net_profit.to_string(),
        metrics.adjusted_net_profit.to_string(),
        metrics.available_cash.to_string(),
    );
    Ok(Out::new(message, metrics))
}

/// Shows the per-material valuation table.
pub async fn stock(store: &Store) -> Result<Out<Vec<MaterialValuation>>> {
    let snapshot = store.snapshot().await?;
    let valuations = report::value_materials(&snapshot.materials, &snapshot.transactions);

    let mut rows = vec![vec![
        "Id".to_string(),
        "Material".to_string(),
        "WAC".to_string(),
        "On hand".to_string(),
        "Stock value".to_string(),
    ]];
    for v in &valuations {
        rows.push(vec![
            v.material_id.to_string(),
            v.name.clone(),
            v.wac.to_string(),
            v.current_quantity.to_string(),
            v.stock_value.to_string(),
        ]);
    }
    Ok(Out::new(render_table(&rows), valuations))
}

/// Shows one customer's ledger.
pub async fn ledger(store: &Store, customer_id: i64) -> Result<Out<CustomerLedger>> {
    let snapshot = store.snapshot().await?;
    let customer = snapshot
        .customer(customer_id)
        .with_context(|| format!("No customer with id {customer_id}"))?;

    let valuations = report::value_materials(&snapshot.materials, &snapshot.transactions);
    let wac = report::wac_table(&valuations);
    let ledger = report::customer_ledger(customer_id, &snapshot.transactions, &wac);

    let message = format!(
        "Ledger for {} (id {})\n\
         \x20 Billed:               {:>14}\n\
         \x20 Collected:            {:>14}\n\
         \x20 Outstanding:          {:>14}\n\
         \x20 Cost of goods sold:   {:>14}\n\
         \x20 Gross profit:         {:>14}",
        customer.name,
        customer_id,
        ledger.sell_value.to_string(),
        ledger.actual_value.to_string(),
        ledger.borrowings.to_string(),
        ledger.total_cogs.to_string(),
        ledger.gross_profit.to_string(),
    );
    Ok(Out::new(message, ledger))
}

//! Handler for the `tradebook list` command.

use crate::commands::{render_table, Out};
use crate::model::NOT_AVAILABLE;
use crate::{Collection, Result, Store};

/// Lists the raw records of one collection as a table.
pub async fn list(store: &Store, collection: Collection) -> Result<Out<serde_json::Value>> {
    let snapshot = store.snapshot().await?;

    let (rows, structure) = match collection {
        Collection::Materials => {
            let mut rows = vec![vec![
                "Id".to_string(),
                "Name".to_string(),
                "Color".to_string(),
            ]];
            for m in &snapshot.materials {
                rows.push(vec![
                    m.id.to_string(),
                    m.name.clone(),
                    m.color.clone().unwrap_or_default(),
                ]);
            }
            (rows, serde_json::to_value(&snapshot.materials)?)
        }
        Collection::Customers => {
            let mut rows = vec![vec!["Id".to_string(), "Name".to_string()]];
            for c in &snapshot.customers {
                rows.push(vec![c.id.to_string(), c.name.clone()]);
            }
            (rows, serde_json::to_value(&snapshot.customers)?)
        }
        Collection::Transactions => {
            let mut rows = vec![vec![
                "Id".to_string(),
                "Type".to_string(),
                "Material".to_string(),
                "Customer".to_string(),
                "Qty".to_string(),
                "Total".to_string(),
                "Received".to_string(),
                "Date".to_string(),
            ]];
            for tx in &snapshot.transactions {
                rows.push(vec![
                    tx.id.to_string(),
                    tx.transaction_type.to_string(),
                    snapshot.material_name(tx.material).to_string(),
                    snapshot.customer_name(tx.customer).to_string(),
                    tx.quantity.to_string(),
                    tx.total_price.to_string(),
                    tx.money_received.to_string(),
                    tx.timestamp
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ]);
            }
            (rows, serde_json::to_value(&snapshot.transactions)?)
        }
        Collection::Expenses => {
            let mut rows = vec![vec![
                "Id".to_string(),
                "Description".to_string(),
                "Amount".to_string(),
                "Date".to_string(),
                "Type".to_string(),
            ]];
            for e in &snapshot.expenses {
                rows.push(vec![
                    e.id.to_string(),
                    e.description.clone(),
                    e.amount.to_string(),
                    e.date.to_string(),
                    e.expense_type.to_string(),
                ]);
            }
            (rows, serde_json::to_value(&snapshot.expenses)?)
        }
    };

    Ok(Out::new(render_table(&rows), structure))
}

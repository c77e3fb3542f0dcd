//! Handlers for the `tradebook add` subcommands.

use crate::args::{
    AddCustomerArgs, AddExpenseArgs, AddMaterialArgs, AddPaymentArgs, AddPurchaseArgs, AddSaleArgs,
};
use crate::commands::Out;
use crate::model::{
    Amount, Customer, Expense, Material, NewCustomer, NewExpense, NewMaterial, NewTransaction,
    Transaction,
};
use crate::report::value_materials;
use crate::{Result, Store};
use anyhow::ensure;
use chrono::Utc;

pub async fn add_material(store: &Store, args: &AddMaterialArgs) -> Result<Out<Material>> {
    let record = store
        .create_material(&NewMaterial {
            name: args.name().to_string(),
            color: args.color().map(String::from),
        })
        .await?;
    Ok(Out::new(
        format!("Created material '{}' with id {}", record.name, record.id),
        record,
    ))
}

pub async fn add_customer(store: &Store, args: &AddCustomerArgs) -> Result<Out<Customer>> {
    let record = store
        .create_customer(&NewCustomer {
            name: args.name().to_string(),
        })
        .await?;
    Ok(Out::new(
        format!("Created customer '{}' with id {}", record.name, record.id),
        record,
    ))
}

pub async fn add_purchase(store: &Store, args: &AddPurchaseArgs) -> Result<Out<Transaction>> {
    let mut payload = NewTransaction::purchase(
        args.material(),
        args.quantity().into(),
        args.total_price().into(),
    );
    if let Some(description) = args.description() {
        payload = payload.with_description(description);
    }
    let record = store.create_transaction(&payload).await?;
    Ok(Out::new(
        format!("Recorded purchase transaction {}", record.id),
        record,
    ))
}

/// Records a sale. Before submitting, checks that the material has sufficient on-hand quantity
/// at the current state of the log; the backend remains the ultimate authority.
pub async fn add_sale(store: &Store, args: &AddSaleArgs) -> Result<Out<Transaction>> {
    let quantity = Amount::from(args.quantity());
    let snapshot = store.snapshot().await?;
    let material = snapshot
        .material(args.material())
        .ok_or_else(|| anyhow::anyhow!("No material with id {}", args.material()))?;
    ensure!(
        snapshot.customer(args.customer()).is_some(),
        "No customer with id {}",
        args.customer()
    );

    let valuations = value_materials(&snapshot.materials, &snapshot.transactions);
    let on_hand = valuations
        .iter()
        .find(|v| v.material_id == material.id)
        .map(|v| v.current_quantity)
        .unwrap_or(Amount::ZERO);
    ensure!(
        on_hand >= quantity,
        "Insufficient stock of '{}': {} on hand, {} requested",
        material.name,
        on_hand,
        quantity
    );

    let mut payload = NewTransaction::sale(
        args.material(),
        args.customer(),
        quantity,
        args.total_price().into(),
        args.money_received().into(),
    );
    if let Some(description) = args.description() {
        payload = payload.with_description(description);
    }
    let record = store.create_transaction(&payload).await?;
    Ok(Out::new(
        format!("Recorded sale transaction {}", record.id),
        record,
    ))
}

pub async fn add_payment(store: &Store, args: &AddPaymentArgs) -> Result<Out<Transaction>> {
    let mut payload = NewTransaction::payment(args.customer(), args.amount().into());
    if let Some(description) = args.description() {
        payload = payload.with_description(description);
    }
    let record = store.create_transaction(&payload).await?;
    Ok(Out::new(
        format!("Recorded payment transaction {}", record.id),
        record,
    ))
}

pub async fn add_expense(store: &Store, args: &AddExpenseArgs) -> Result<Out<Expense>> {
    let record = store
        .create_expense(&NewExpense {
            description: args.description().to_string(),
            amount: args.amount().into(),
            date: args.date().unwrap_or_else(|| Utc::now().date_naive()),
            expense_type: args.expense_type(),
        })
        .await?;
    Ok(Out::new(
        format!("Recorded {} expense {}", record.expense_type, record.id),
        record,
    ))
}

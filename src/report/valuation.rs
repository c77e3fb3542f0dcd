//! Weighted-average-cost inventory valuation.
//!
//! The cost model is deliberately simple: every sale of a material is costed at the same
//! all-time average purchase cost, recomputed fresh from the full log each time. This is not a
//! rolling or FIFO cost.

use crate::model::{Amount, Material, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;

/// Maps a material id to its weighted-average cost per unit.
pub type WacTable = BTreeMap<i64, Amount>;

/// The derived valuation of one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialValuation {
    pub material_id: i64,
    pub name: String,
    /// Weighted-average cost per unit over the material's entire purchase history. Zero when
    /// nothing has ever been purchased.
    pub wac: Amount,
    /// Units purchased minus units sold. Not clamped: sales recorded ahead of their purchase
    /// history legitimately drive this negative.
    pub current_quantity: Amount,
    /// `current_quantity * wac` when the quantity is positive, otherwise zero. A negative
    /// quantity never contributes negative value.
    pub stock_value: Amount,
}

/// Values every material against the transaction log.
pub fn value_materials(
    materials: &[Material],
    transactions: &[Transaction],
) -> Vec<MaterialValuation> {
    materials
        .iter()
        .map(|material| value_material(material, transactions))
        .collect()
}

/// Collapses valuations into the `material id -> wac` lookup used by the customer ledger and
/// dashboard engines.
pub fn wac_table(valuations: &[MaterialValuation]) -> WacTable {
    valuations
        .iter()
        .map(|valuation| (valuation.material_id, valuation.wac))
        .collect()
}

fn value_material(material: &Material, transactions: &[Transaction]) -> MaterialValuation {
    let mut total_cost_of_purchases = Amount::ZERO;
    let mut total_quantity_purchased = Amount::ZERO;
    let mut total_quantity_sold = Amount::ZERO;

    for tx in transactions {
        if tx.is_purchase_of(material.id) {
            total_cost_of_purchases += tx.total_price;
            total_quantity_purchased += tx.quantity;
        } else if tx.is_sale_of(material.id) {
            total_quantity_sold += tx.quantity;
        }
    }

    let wac = total_cost_of_purchases.div_or_zero(total_quantity_purchased);
    let current_quantity = total_quantity_purchased - total_quantity_sold;
    let stock_value = if current_quantity.is_positive() {
        current_quantity * wac
    } else {
        Amount::ZERO
    };

    MaterialValuation {
        material_id: material.id,
        name: material.name.clone(),
        wac,
        current_quantity,
        stock_value,
    }
}

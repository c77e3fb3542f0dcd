use crate::model::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of transaction type codes used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    /// Credit / purchase: inventory bought into stock. Requires material, quantity, total_price.
    #[serde(rename = "CR")]
    Cr,
    /// Debit / sale: inventory sold to a customer. Requires material, customer, quantity,
    /// total_price and money_received (the portion collected at sale time).
    #[serde(rename = "DB")]
    Db,
    /// Reconciliation / customer payment not tied to a sale. Requires customer and total_price,
    /// which carries the amount paid.
    #[serde(rename = "RC")]
    Rc,
}

serde_plain::derive_display_from_serialize!(TxKind);
serde_plain::derive_fromstr_from_deserialize!(TxKind);

/// A single row of the append-mostly event log that drives all derived state. Records are
/// immutable once created; the only mutation is deletion by id.
///
/// Which optional fields are populated depends on `transaction_type`; the numeric fields
/// deserialize leniently to zero so that malformed rows degrade instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: TxKind,
    #[serde(default)]
    pub material: Option<i64>,
    #[serde(default)]
    pub customer: Option<i64>,
    /// Echoed by the backend for display; not used in any calculation.
    #[serde(default)]
    pub material_name: Option<String>,
    /// Echoed by the backend for display; not used in any calculation.
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub quantity: Amount,
    #[serde(default)]
    pub total_price: Amount,
    #[serde(default)]
    pub money_received: Amount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Transaction {
    /// True when this is a purchase of `material_id`.
    pub fn is_purchase_of(&self, material_id: i64) -> bool {
        self.transaction_type == TxKind::Cr && self.material == Some(material_id)
    }

    /// True when this is a sale of `material_id`.
    pub fn is_sale_of(&self, material_id: i64) -> bool {
        self.transaction_type == TxKind::Db && self.material == Some(material_id)
    }
}

/// Create payload for a transaction. Build one through the constructors so that the field
/// combinations the backend validates are right by construction.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub transaction_type: TxKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Amount>,
    pub total_price: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money_received: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTransaction {
    /// A `CR`: inventory purchased into stock.
    pub fn purchase(material: i64, quantity: Amount, total_price: Amount) -> Self {
        Self {
            transaction_type: TxKind::Cr,
            material: Some(material),
            customer: None,
            quantity: Some(quantity),
            total_price,
            money_received: None,
            description: None,
        }
    }

    /// A `DB`: inventory sold to a customer, with `money_received` collected up front (possibly
    /// zero, possibly the full price).
    pub fn sale(
        material: i64,
        customer: i64,
        quantity: Amount,
        total_price: Amount,
        money_received: Amount,
    ) -> Self {
        Self {
            transaction_type: TxKind::Db,
            material: Some(material),
            customer: Some(customer),
            quantity: Some(quantity),
            total_price,
            money_received: Some(money_received),
            description: None,
        }
    }

    /// An `RC`: a customer paying down their balance. The backend carries the paid amount in
    /// `total_price` for this type.
    pub fn payment(customer: i64, amount: Amount) -> Self {
        Self {
            transaction_type: TxKind::Rc,
            material: None,
            customer: Some(customer),
            quantity: None,
            total_price: amount,
            money_received: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_codes() {
        assert_eq!(TxKind::Cr.to_string(), "CR");
        assert_eq!(TxKind::Db.to_string(), "DB");
        assert_eq!(TxKind::Rc.to_string(), "RC");
        assert_eq!(TxKind::from_str("RC").unwrap(), TxKind::Rc);
        assert!(TxKind::from_str("XX").is_err());
    }

    #[test]
    fn test_deserialize_sale_row() {
        let json = r#"{
            "id": 7,
            "transaction_type": "DB",
            "material": 1,
            "customer": 2,
            "material_name": "Copper",
            "customer_name": "Acme",
            "quantity": "4.00",
            "total_price": "80.00",
            "money_received": "50.00",
            "description": null,
            "timestamp": "2026-01-15T09:30:00Z"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.transaction_type, TxKind::Db);
        assert!(tx.is_sale_of(1));
        assert!(!tx.is_purchase_of(1));
        assert_eq!(tx.quantity, Amount::from(4));
        assert_eq!(tx.money_received, Amount::from(50));
    }

    #[test]
    fn test_deserialize_payment_row_missing_fields() {
        // RC rows come back with no material and null quantity.
        let json = r#"{
            "id": 8,
            "transaction_type": "RC",
            "customer": 2,
            "quantity": null,
            "total_price": "30.00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.transaction_type, TxKind::Rc);
        assert_eq!(tx.material, None);
        assert_eq!(tx.quantity, Amount::ZERO);
        assert_eq!(tx.total_price, Amount::from(30));
    }

    #[test]
    fn test_payment_payload_shape() {
        let payload = NewTransaction::payment(2, Amount::from(30));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["transaction_type"], "RC");
        assert_eq!(json["customer"], 2);
        assert_eq!(json["total_price"], "30");
        // Fields that do not apply to an RC must be absent, not null.
        assert!(json.get("material").is_none());
        assert!(json.get("quantity").is_none());
    }
}

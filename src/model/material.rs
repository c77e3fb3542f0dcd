use serde::{Deserialize, Serialize};

/// A stock keeping unit. The record carries no quantity or cost; both are always derived from
/// the transaction log by the valuation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Create payload for a material.
#[derive(Debug, Clone, Serialize)]
pub struct NewMaterial {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

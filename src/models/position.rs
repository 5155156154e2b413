use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{Exchange, Product};

/// Open position per (user_id, symbol). Same bookkeeping as a Holding but
/// scoped to a product and carrying live valuation fields that get
/// recomputed and persisted on each read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub product: Product,
    pub name: String,
    pub symbol: String,

    pub qty: i64,
    pub avg: f64,
    pub last_price: f64,

    pub exchange: Exchange,
    #[serde(default = "default_instrument")]
    pub instrument: String,

    #[serde(default)]
    pub live_price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percentage: f64,
    #[serde(default)]
    pub pnl: f64,
    #[serde(default)]
    pub pnl_percentage: f64,
    #[serde(default)]
    pub day_pnl: f64,
    #[serde(default)]
    pub day_pnl_percentage: f64,
    #[serde(default)]
    pub is_loss: bool,

    pub last_updated: i64,
    pub created_at: i64,
}

fn default_instrument() -> String {
    "EQUITY".to_string()
}

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Exchange;

/// Delivery-settled aggregate long position per symbol, carried across days.
/// One document per (user_id, symbol); deleted when qty reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub name: String,
    pub symbol: String,

    pub qty: i64,
    // Volume-weighted average cost, kept at full precision. Rounded only
    // when serialized into a view.
    pub avg: f64,
    pub last_price: f64,

    pub exchange: Exchange,
    #[serde(default = "default_instrument")]
    pub instrument: String,

    pub created_at: i64,
    pub updated_at: i64,
}

fn default_instrument() -> String {
    "EQUITY".to_string()
}

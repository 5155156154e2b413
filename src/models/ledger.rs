use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKind {
    #[serde(rename = "add")]
    Add,
    #[serde(rename = "withdraw")]
    Withdraw,
    #[serde(rename = "investment")]
    Investment,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Withdraw => "withdraw",
            Self::Investment => "investment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

/// One cash movement in the funds ledger. Append-only; entries are never
/// mutated or deleted, balances are always derived by aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: LedgerKind,

    // Absent (not null) when there is no payment reference, so the sparse
    // unique index only ever sees real ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    pub description: String,
    pub status: LedgerStatus,

    pub created_at: i64,
}

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{LedgerEntry, LedgerKind, LedgerStatus},
    AppState,
};

/// Sums of completed ledger entries, grouped by movement type.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsBreakdown {
    pub total_added: f64,
    pub total_withdrawn: f64,
    pub total_investment: f64,
}

impl FundsBreakdown {
    pub fn total_funds(&self) -> f64 {
        self.total_added - self.total_withdrawn
    }

    pub fn available_balance(&self) -> f64 {
        self.total_funds() - self.total_investment
    }
}

fn bson_to_f64(v: &Bson) -> f64 {
    match v {
        Bson::Double(d) => *d,
        Bson::Int32(i) => *i as f64,
        Bson::Int64(i) => *i as f64,
        _ => 0.0,
    }
}

/// Ledger balances are never stored; they are re-derived from the completed
/// entries on every read.
pub async fn breakdown(state: &AppState, user_id: ObjectId) -> Result<FundsBreakdown> {
    let funds = state.db.collection::<LedgerEntry>("funds");

    let pipeline = vec![
        doc! { "$match": { "user_id": user_id, "status": "completed" } },
        doc! { "$group": { "_id": "$type", "total": { "$sum": "$amount" } } },
    ];

    let mut cursor = funds.aggregate(pipeline, None).await?;
    let mut out = FundsBreakdown::default();

    while let Some(res) = cursor.next().await {
        let row: Document = res?;
        let total = row.get("total").map(bson_to_f64).unwrap_or(0.0);
        match row.get_str("_id").unwrap_or_default() {
            "add" => out.total_added = total,
            "withdraw" => out.total_withdrawn = total,
            "investment" => out.total_investment = total,
            _ => {}
        }
    }

    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub status: String,
}

fn entry_view(e: LedgerEntry) -> LedgerEntryView {
    LedgerEntryView {
        id: e.id.to_hex(),
        amount: e.amount,
        kind: e.kind.as_str().to_string(),
        description: e.description,
        date: e.created_at,
        payment_intent_id: e.payment_intent_id,
        status: match e.status {
            LedgerStatus::Pending => "pending".to_string(),
            LedgerStatus::Completed => "completed".to_string(),
            LedgerStatus::Failed => "failed".to_string(),
        },
    }
}

pub struct FundsSummary {
    pub breakdown: FundsBreakdown,
    pub history: Vec<LedgerEntryView>,
}

pub async fn funds_summary(state: &AppState, user_id: ObjectId) -> Result<FundsSummary> {
    let bd = breakdown(state, user_id).await?;

    let funds = state.db.collection::<LedgerEntry>("funds");
    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(50)
        .build();

    let mut cursor = funds.find(doc! { "user_id": user_id }, find_opts).await?;
    let mut history: Vec<LedgerEntryView> = vec![];
    while let Some(res) = cursor.next().await {
        history.push(entry_view(res?));
    }

    Ok(FundsSummary {
        breakdown: bd,
        history,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFundsRequest {
    pub amount: Option<f64>,
    pub payment_intent_id: Option<String>,
    pub description: Option<String>,
}

pub struct AddFundsResult {
    pub added_amount: f64,
    pub total_funds: f64,
    pub transaction_id: String,
}

pub async fn add_funds(
    state: &AppState,
    user_id: ObjectId,
    req: AddFundsRequest,
) -> Result<AddFundsResult> {
    let amount = req.amount.unwrap_or_default();
    if amount <= 0.0 || !amount.is_finite() {
        return Err(AppError::Validation("Valid amount is required".to_string()));
    }

    let entry = LedgerEntry {
        id: ObjectId::new(),
        user_id,
        // Deposits settle in whole currency units.
        amount: amount.round(),
        kind: LedgerKind::Add,
        payment_intent_id: req
            .payment_intent_id
            .filter(|s| !s.trim().is_empty()),
        description: req
            .description
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Funds added via payment".to_string()),
        status: LedgerStatus::Completed,
        created_at: Utc::now().timestamp(),
    };

    let funds = state.db.collection::<LedgerEntry>("funds");
    funds.insert_one(&entry, None).await?;

    let bd = breakdown(state, user_id).await?;

    Ok(AddFundsResult {
        added_amount: amount,
        total_funds: bd.total_funds(),
        transaction_id: entry.id.to_hex(),
    })
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
}

pub struct WithdrawResult {
    pub withdrawn_amount: f64,
    pub total_funds: f64,
    pub available_balance: f64,
    pub transaction_id: String,
}

/// Withdrawal re-derives the available balance immediately before
/// accepting. There is no lock against a concurrent withdrawal racing the
/// read; two near-simultaneous requests can both pass the check.
pub async fn withdraw(
    state: &AppState,
    user_id: ObjectId,
    req: WithdrawRequest,
) -> Result<WithdrawResult> {
    let amount = req.amount.unwrap_or_default();
    if amount <= 0.0 || !amount.is_finite() {
        return Err(AppError::Validation(
            "Valid withdrawal amount is required".to_string(),
        ));
    }

    let bd = breakdown(state, user_id).await?;
    let available = bd.available_balance();
    if available < amount {
        return Err(AppError::InsufficientFunds {
            available,
            requested: amount,
        });
    }

    let entry = LedgerEntry {
        id: ObjectId::new(),
        user_id,
        amount,
        kind: LedgerKind::Withdraw,
        payment_intent_id: None,
        description: req
            .description
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Funds withdrawal".to_string()),
        status: LedgerStatus::Completed,
        created_at: Utc::now().timestamp(),
    };

    let funds = state.db.collection::<LedgerEntry>("funds");
    funds.insert_one(&entry, None).await?;

    let updated = breakdown(state, user_id).await?;

    Ok(WithdrawResult {
        withdrawn_amount: amount,
        total_funds: updated.total_funds(),
        available_balance: updated.available_balance(),
        transaction_id: entry.id.to_hex(),
    })
}

/// Idempotent credit used by the payment bridge: exactly one `add` entry
/// per payment intent, no matter how many times the intent is re-checked.
pub async fn credit_payment(
    state: &AppState,
    user_id: ObjectId,
    payment_intent_id: &str,
    amount: f64,
    description: String,
) -> Result<bool> {
    let funds = state.db.collection::<LedgerEntry>("funds");

    let existing = funds
        .find_one(doc! { "payment_intent_id": payment_intent_id }, None)
        .await?;
    if existing.is_some() {
        tracing::info!(payment_intent_id, "payment already credited");
        return Ok(false);
    }

    let entry = LedgerEntry {
        id: ObjectId::new(),
        user_id,
        amount,
        kind: LedgerKind::Add,
        payment_intent_id: Some(payment_intent_id.to_string()),
        description,
        status: LedgerStatus::Completed,
        created_at: Utc::now().timestamp(),
    };

    funds.insert_one(&entry, None).await?;
    Ok(true)
}

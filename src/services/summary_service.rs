use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::User,
    services::{holdings_service, valuation::round2},
    AppState,
};

const OPENING_BALANCE: f64 = 100_000.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub user_name: String,
    pub user_id: String,

    pub margin_available: f64,
    pub margin_used: f64,
    pub opening_balance: f64,

    pub holdings_count: usize,
    pub total_invested: f64,
    pub current_value: f64,

    pub pnl: f64,
    pub pnl_percent: f64,
    pub is_loss: bool,

    pub day_change: f64,
    pub day_change_percent: f64,
    pub is_day_positive: bool,

    pub available_cash: f64,
    pub collateral_value: f64,

    pub last_updated: i64,
}

/// Dashboard aggregate: user profile, margin figures derived from the
/// portfolio, and the holdings valuation rollup.
pub async fn get_summary(state: &AppState, user_id: ObjectId) -> Result<AccountSummary> {
    let users = state.db.collection::<User>("users");
    let user = users
        .find_one(doc! { "_id": user_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let (views, summary) = holdings_service::list_holdings(state, user_id).await?;

    let current_value = summary.total_current_value;
    let total_invested = summary.total_investment;
    let pnl = summary.total_pnl;
    let pnl_percent = summary.total_pnl_percentage();

    let day_change = summary.total_day_pnl;
    let day_change_percent = if current_value - day_change > 0.0 {
        day_change / (current_value - day_change) * 100.0
    } else {
        0.0
    };

    // Margin is modeled off the portfolio: a tenth of the current value is
    // held against it.
    let margin_used = current_value * 0.1;
    let margin_available = (OPENING_BALANCE - margin_used).max(0.0);

    Ok(AccountSummary {
        user_name: user.username,
        user_id: user.id.to_hex(),
        margin_available: round2(margin_available),
        margin_used: round2(margin_used),
        opening_balance: OPENING_BALANCE,
        holdings_count: views.len(),
        total_invested: round2(total_invested),
        current_value: round2(current_value),
        pnl: round2(pnl),
        pnl_percent: round2(pnl_percent),
        is_loss: pnl < 0.0,
        day_change: round2(day_change),
        day_change_percent: round2(day_change_percent),
        is_day_positive: day_change >= 0.0,
        available_cash: round2(margin_available + current_value * 0.5),
        collateral_value: round2(current_value * 0.8),
        last_updated: Utc::now().timestamp(),
    })
}

use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::Holding,
    services::{
        quotes,
        valuation::{round2, valuate, PortfolioSummary},
    },
    AppState,
};

// Holdings tolerate staler quotes than the intraday positions book.
const QUOTE_MAX_AGE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub quantity: i64,
    pub average_price: f64,
    pub last_price: f64,
    pub live_price: f64,
    pub change: f64,
    pub change_percentage: f64,
    pub investment: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percentage: f64,
    pub day_pnl: f64,
    pub exchange: String,
    pub instrument: String,
    pub using_fallback: bool,
}

pub async fn list_holdings(
    state: &AppState,
    user_id: ObjectId,
) -> Result<(Vec<HoldingView>, PortfolioSummary)> {
    let holdings = state.db.collection::<Holding>("holdings");
    let mut cursor = holdings.find(doc! { "user_id": user_id }, None).await?;

    let mut rows: Vec<Holding> = vec![];
    while let Some(res) = cursor.next().await {
        rows.push(res?);
    }

    let mut summary = PortfolioSummary::default();
    let mut views: Vec<HoldingView> = vec![];

    for h in rows {
        // NSE listing suffix, matching what the quote provider indexes.
        let quote = quotes::cached_quote(state, &format!("{}.NS", h.symbol), QUOTE_MAX_AGE).await;

        let (live_price, change, percent_change, using_fallback) = match &quote {
            Some(q) => (q.price, q.change, q.percent_change, false),
            None => {
                let stored = if h.last_price > 0.0 { h.last_price } else { h.avg };
                (stored, 0.0, 0.0, true)
            }
        };

        let v = valuate(h.qty, h.avg, h.last_price, live_price, change);
        summary.add(&v);

        views.push(HoldingView {
            id: h.id.to_hex(),
            name: h.name,
            symbol: h.symbol,
            quantity: h.qty,
            average_price: round2(h.avg),
            last_price: h.last_price,
            live_price,
            change,
            change_percentage: percent_change,
            investment: round2(v.investment),
            current_value: round2(v.current_value),
            pnl: round2(v.pnl),
            pnl_percentage: round2(v.pnl_percentage),
            day_pnl: round2(v.day_pnl),
            exchange: h.exchange.as_str().to_string(),
            instrument: h.instrument,
            using_fallback,
        });
    }

    Ok((views, summary))
}

#[derive(Debug, Deserialize)]
pub struct AddHoldingRequest {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub qty: Option<i64>,
    pub avg: Option<f64>,
    pub exchange: Option<String>,
    pub instrument: Option<String>,
}

pub async fn add_holding(
    state: &AppState,
    user_id: ObjectId,
    req: AddHoldingRequest,
) -> Result<Holding> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let symbol = req.symbol.as_deref().map(str::trim).unwrap_or_default();

    if name.is_empty() || symbol.is_empty() || req.qty.is_none() || req.avg.is_none() {
        return Err(AppError::Validation(
            "Missing required fields: name, symbol, qty, avg".to_string(),
        ));
    }

    let qty = req.qty.unwrap_or_default();
    let avg = req.avg.unwrap_or_default();
    if qty < 0 {
        return Err(AppError::Validation("qty cannot be negative".to_string()));
    }
    if avg < 0.0 {
        return Err(AppError::Validation("avg cannot be negative".to_string()));
    }

    let exchange = match req.exchange.as_deref() {
        None | Some("") => crate::models::Exchange::default(),
        Some(s) => crate::models::Exchange::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Unknown exchange: {s}")))?,
    };

    let now = Utc::now().timestamp();
    let holding = Holding {
        id: ObjectId::new(),
        user_id,
        name: name.to_string(),
        symbol: symbol.to_uppercase(),
        qty,
        avg,
        last_price: avg,
        exchange,
        instrument: req
            .instrument
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "EQUITY".to_string()),
        created_at: now,
        updated_at: now,
    };

    let holdings = state.db.collection::<Holding>("holdings");
    holdings.insert_one(&holding, None).await?;

    Ok(holding)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHoldingRequest {
    pub name: Option<String>,
    pub qty: Option<i64>,
    pub avg: Option<f64>,
    pub last_price: Option<f64>,
    pub instrument: Option<String>,
}

pub async fn update_holding(
    state: &AppState,
    user_id: ObjectId,
    id: &str,
    req: UpdateHoldingRequest,
) -> Result<Holding> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation("Invalid holding id".to_string()))?;

    let mut set: Document = doc! { "updated_at": Utc::now().timestamp() };
    if let Some(name) = req.name.filter(|s| !s.trim().is_empty()) {
        set.insert("name", name);
    }
    if let Some(qty) = req.qty {
        if qty < 0 {
            return Err(AppError::Validation("qty cannot be negative".to_string()));
        }
        set.insert("qty", qty);
    }
    if let Some(avg) = req.avg {
        if avg < 0.0 {
            return Err(AppError::Validation("avg cannot be negative".to_string()));
        }
        set.insert("avg", avg);
    }
    if let Some(last_price) = req.last_price {
        set.insert("last_price", last_price);
    }
    if let Some(instrument) = req.instrument.filter(|s| !s.trim().is_empty()) {
        set.insert("instrument", instrument);
    }

    let holdings = state.db.collection::<Holding>("holdings");
    holdings
        .update_one(doc! { "_id": oid, "user_id": user_id }, doc! { "$set": set }, None)
        .await?;

    holdings
        .find_one(doc! { "_id": oid, "user_id": user_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Holding not found".to_string()))
}

pub async fn delete_holding(state: &AppState, user_id: ObjectId, id: &str) -> Result<()> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation("Invalid holding id".to_string()))?;

    let holdings = state.db.collection::<Holding>("holdings");
    let deleted = holdings
        .delete_one(doc! { "_id": oid, "user_id": user_id }, None)
        .await?;

    if deleted.deleted_count == 0 {
        return Err(AppError::NotFound("Holding not found".to_string()));
    }
    Ok(())
}

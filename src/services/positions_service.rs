use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::Position,
    services::{
        quotes,
        valuation::{round2, valuate, PortfolioSummary},
    },
    AppState,
};

// The intraday book refreshes twice as often as holdings.
const QUOTE_MAX_AGE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub product: String,
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
    pub day_pnl_percentage: f64,
    pub is_loss: bool,
    pub exchange: String,
    pub instrument: String,
    pub last_updated: i64,
    pub using_fallback: bool,
}

/// Lists positions with fresh valuation, writing the computed live fields
/// back onto each document so stored rows stay warm for fallback reads.
pub async fn list_positions(
    state: &AppState,
    user_id: ObjectId,
) -> Result<(Vec<PositionView>, PortfolioSummary)> {
    let positions = state.db.collection::<Position>("positions");
    let mut cursor = positions.find(doc! { "user_id": user_id }, None).await?;

    let mut rows: Vec<Position> = vec![];
    while let Some(res) = cursor.next().await {
        rows.push(res?);
    }

    let mut summary = PortfolioSummary::default();
    let mut views: Vec<PositionView> = vec![];

    for p in rows {
        let quote = quotes::cached_quote(state, &format!("{}.NS", p.symbol), QUOTE_MAX_AGE).await;

        let (live_price, change, percent_change, using_fallback) = match &quote {
            Some(q) => (q.price, q.change, q.percent_change, false),
            None => {
                let stored = if p.live_price > 0.0 { p.live_price } else { p.last_price };
                (stored, p.change, p.change_percentage, true)
            }
        };

        let v = valuate(p.qty, p.avg, p.last_price, live_price, change);
        summary.add(&v);

        let now = Utc::now().timestamp();

        if !using_fallback {
            positions
                .update_one(
                    doc! { "_id": p.id },
                    doc! { "$set": {
                        "live_price": live_price,
                        "change": change,
                        "change_percentage": percent_change,
                        "pnl": v.pnl,
                        "pnl_percentage": v.pnl_percentage,
                        "day_pnl": v.day_pnl,
                        "day_pnl_percentage": v.day_pnl_percentage,
                        "is_loss": v.is_loss,
                        "last_updated": now,
                    }},
                    None,
                )
                .await?;
        }

        views.push(PositionView {
            id: p.id.to_hex(),
            name: p.name,
            symbol: p.symbol,
            product: p.product.as_str().to_string(),
            quantity: p.qty,
            average_price: round2(p.avg),
            last_price: p.last_price,
            live_price,
            change,
            change_percentage: percent_change,
            investment: round2(v.investment),
            current_value: round2(v.current_value),
            pnl: round2(v.pnl),
            pnl_percentage: round2(v.pnl_percentage),
            day_pnl: round2(v.day_pnl),
            day_pnl_percentage: round2(v.day_pnl_percentage),
            is_loss: v.is_loss,
            exchange: p.exchange.as_str().to_string(),
            instrument: p.instrument,
            last_updated: now,
            using_fallback,
        });
    }

    Ok((views, summary))
}

pub async fn get_position_by_symbol(
    state: &AppState,
    user_id: ObjectId,
    symbol: &str,
) -> Result<Position> {
    let sym = symbol.to_uppercase();
    let positions = state.db.collection::<Position>("positions");

    let position = positions
        .find_one(doc! { "user_id": user_id, "symbol": &sym }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Position not found".to_string()))?;

    // Best effort live refresh; a provider failure keeps the stored fields.
    if let Some(q) = quotes::cached_quote(state, &format!("{sym}.NS"), QUOTE_MAX_AGE).await {
        positions
            .update_one(
                doc! { "_id": position.id },
                doc! { "$set": {
                    "live_price": q.price,
                    "change": q.change,
                    "change_percentage": q.percent_change,
                    "last_updated": Utc::now().timestamp(),
                }},
                None,
            )
            .await?;

        return Ok(Position {
            live_price: q.price,
            change: q.change,
            change_percentage: q.percent_change,
            ..position
        });
    }

    Ok(position)
}

#[derive(Debug, Deserialize)]
pub struct SquareOffRequest {
    pub symbol: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareOffResult {
    pub symbol: String,
    pub quantity: i64,
    pub average_price: f64,
    pub square_off_price: f64,
    pub pnl: f64,
    pub pnl_percentage: f64,
}

/// Closes an open position at the given price (default: last live price),
/// realizing its final P&L. The position document is deleted.
pub async fn square_off(
    state: &AppState,
    user_id: ObjectId,
    req: SquareOffRequest,
) -> Result<SquareOffResult> {
    let symbol = req
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("symbol is required".to_string()))?
        .to_uppercase();

    let positions = state.db.collection::<Position>("positions");
    let position = positions
        .find_one(doc! { "user_id": user_id, "symbol": &symbol }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Position not found".to_string()))?;

    let square_off_price = req.price.unwrap_or(position.live_price);
    let investment = position.avg * position.qty as f64;
    let current_value = square_off_price * position.qty as f64;
    let final_pnl = current_value - investment;
    let pnl_percentage = if investment > 0.0 {
        final_pnl / investment * 100.0
    } else {
        0.0
    };

    positions.delete_one(doc! { "_id": position.id }, None).await?;

    tracing::info!(symbol = %symbol, pnl = final_pnl, "position squared off");

    Ok(SquareOffResult {
        symbol: position.symbol,
        quantity: position.qty,
        average_price: position.avg,
        square_off_price,
        pnl: round2(final_pnl),
        pnl_percentage: round2(pnl_percentage),
    })
}

use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{models::CurrentUser, services::payment_service, AppState};

use super::unauthorized;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentBody {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

// POST /payment/create-payment-intent
pub async fn post_create_payment_intent(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<CreatePaymentBody>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let amount = body.amount.unwrap_or_default();
    let currency = body.currency.unwrap_or_else(|| "inr".to_string());

    match payment_service::create_payment_intent(&state, u.id, amount, &currency).await {
        Ok(intent) => Json(json!({
            "success": true,
            "clientSecret": intent.client_secret,
            "paymentIntentId": intent.payment_intent_id,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// GET /payment/payment-intent/:id
pub async fn get_payment_intent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    match payment_service::settle_payment_intent(&state, &id).await {
        Ok(intent) => Json(json!({
            "success": true,
            "id": intent.id,
            "amount": intent.amount,
            "currency": intent.currency,
            "status": intent.status,
            "created": intent.created,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    services::funds_service,
    AppState,
};
use mongodb::bson::oid::ObjectId;

const STRIPE_API: &str = "https://api.stripe.com/v1";

#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    // smallest currency unit (paise)
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
    #[serde(default)]
    pub created: i64,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: Client::new(),
            secret_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.secret_key.trim().is_empty()
    }

    pub async fn create_intent(
        &self,
        amount_paise: i64,
        currency: &str,
        user_id: &str,
        original_amount: f64,
    ) -> Result<PaymentIntent> {
        if !self.has_key() {
            return Err(AppError::Upstream(
                "STRIPE_SECRET_KEY is missing in .env".to_string(),
            ));
        }

        let params = [
            ("amount", amount_paise.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("metadata[userId]", user_id.to_string()),
            ("metadata[originalAmountRupees]", original_amount.to_string()),
        ];

        let res = self
            .http
            .post(format!("{STRIPE_API}/payment_intents"))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "payment intent creation failed: {status} {body}"
            )));
        }

        res.json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))
    }

    pub async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent> {
        if !self.has_key() {
            return Err(AppError::Upstream(
                "STRIPE_SECRET_KEY is missing in .env".to_string(),
            ));
        }

        let res = self
            .http
            .get(format!("{STRIPE_API}/payment_intents/{id}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "payment intent retrieval failed: {status} {body}"
            )));
        }

        res.json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))
    }
}

pub struct CreatedIntent {
    pub payment_intent_id: String,
    pub client_secret: String,
}

/// The client sends rupees; Stripe settles in paise.
pub async fn create_payment_intent(
    state: &AppState,
    user_id: ObjectId,
    amount: f64,
    currency: &str,
) -> Result<CreatedIntent> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(AppError::Validation("Valid amount is required".to_string()));
    }

    let amount_paise = (amount * 100.0).round() as i64;
    if amount_paise < 100 {
        return Err(AppError::Validation("Amount must be at least ₹1".to_string()));
    }

    let intent = state
        .stripe
        .create_intent(amount_paise, currency, &user_id.to_hex(), amount)
        .await?;

    let client_secret = intent
        .client_secret
        .ok_or_else(|| AppError::Upstream("payment intent missing client secret".to_string()))?;

    Ok(CreatedIntent {
        payment_intent_id: intent.id,
        client_secret,
    })
}

pub struct RetrievedIntent {
    pub id: String,
    // rupees, converted back from Stripe's paise
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub created: i64,
}

/// Re-checks an intent with Stripe and, when it has succeeded, credits the
/// ledger exactly once for that intent.
pub async fn settle_payment_intent(state: &AppState, id: &str) -> Result<RetrievedIntent> {
    let intent = state.stripe.retrieve_intent(id).await?;

    let amount_rupees = intent.amount as f64 / 100.0;

    if intent.status == "succeeded" {
        let user_id = intent
            .metadata
            .get("userId")
            .and_then(|s| ObjectId::parse_str(s).ok())
            .ok_or_else(|| {
                AppError::Upstream("payment intent missing userId metadata".to_string())
            })?;

        funds_service::credit_payment(
            state,
            user_id,
            &intent.id,
            amount_rupees,
            format!("Funds added via Stripe - ₹{amount_rupees}"),
        )
        .await?;
    }

    Ok(RetrievedIntent {
        id: intent.id,
        amount: amount_rupees,
        currency: intent.currency,
        status: intent.status,
        created: intent.created,
    })
}

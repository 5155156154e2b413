use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::{CurrentUser, Order},
    services::order_service::{self, CreateOrderRequest, OrderListQuery},
    AppState,
};

use super::unauthorized;

fn order_data(order: &Order) -> Value {
    json!({
        "orderId": order.order_id,
        "symbol": order.symbol,
        "quantity": order.qty,
        "price": order.price,
        "mode": order.mode.as_str(),
        "totalAmount": order.total_amount,
        "status": order.status.as_str(),
        "createdAt": order.created_at,
    })
}

// Listing rows never expose the payment reference.
fn order_row(order: &Order) -> Value {
    json!({
        "id": order.id.to_hex(),
        "orderId": order.order_id,
        "name": order.name,
        "symbol": order.symbol,
        "qty": order.qty,
        "price": order.price,
        "mode": order.mode,
        "orderType": order.order_type,
        "product": order.product,
        "exchange": order.exchange,
        "totalAmount": order.total_amount,
        "status": order.status,
        "createdAt": order.created_at,
    })
}

// POST /orders/create
pub async fn post_create_order(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<CreateOrderRequest>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match order_service::create_order(&state, u.id, body).await {
        Ok((order, created)) => {
            let (status, message) = if created {
                (StatusCode::CREATED, "Order executed successfully")
            } else {
                (StatusCode::OK, "Order already exists")
            };

            (
                status,
                Json(json!({
                    "success": true,
                    "message": message,
                    "data": order_data(&order),
                })),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

// GET /orders
pub async fn get_all_orders(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Query(query): Query<OrderListQuery>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match order_service::list_orders(&state, u.id, &query).await {
        Ok(page) => Json(json!({
            "success": true,
            "data": page.orders.iter().map(order_row).collect::<Vec<_>>(),
            "pagination": {
                "current": page.current,
                "pages": page.pages,
                "total": page.total,
            },
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// GET /orders/:id
pub async fn get_order_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match order_service::get_order_by_id(&state, u.id, &id).await {
        Ok(order) => Json(json!({
            "success": true,
            "data": order_row(&order),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

// PUT /orders/:id/cancel
pub async fn put_cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match order_service::cancel_order(&state, u.id, &id).await {
        Ok(order) => Json(json!({
            "success": true,
            "message": "Order cancelled successfully",
            "data": order_row(&order),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

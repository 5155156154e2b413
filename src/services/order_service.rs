use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::{
        Exchange, Holding, LedgerEntry, LedgerKind, LedgerStatus, Order, OrderMode, OrderStatus,
        OrderType, Position, Product, Settlement,
    },
    AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub qty: Option<i64>,
    pub price: Option<f64>,
    pub mode: Option<String>,
    pub order_type: Option<String>,
    pub product: Option<String>,
    pub exchange: Option<String>,
    pub payment_intent_id: Option<String>,
}

/// A fully validated order request. Settlement is decided here, once, and
/// drives whether the holdings book is touched at all.
#[derive(Debug, Clone)]
struct ValidatedOrder {
    name: String,
    symbol: String,
    qty: i64,
    price: f64,
    mode: OrderMode,
    order_type: OrderType,
    product: Product,
    exchange: Exchange,
    settlement: Settlement,
    payment_intent_id: Option<String>,
}

fn validate(req: &CreateOrderRequest) -> Result<ValidatedOrder> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let symbol = req.symbol.as_deref().map(str::trim).unwrap_or_default();

    if name.is_empty() || symbol.is_empty() || req.qty.is_none() || req.price.is_none()
        || req.mode.as_deref().map(str::trim).unwrap_or_default().is_empty()
    {
        return Err(AppError::Validation(
            "Missing required fields: name, symbol, qty, price, mode".to_string(),
        ));
    }

    let qty = req.qty.unwrap_or_default();
    let price = req.price.unwrap_or_default();

    if qty <= 0 {
        return Err(AppError::Validation("qty must be greater than zero".to_string()));
    }
    if price < 0.0 || !price.is_finite() {
        return Err(AppError::Validation("price must be a non-negative number".to_string()));
    }

    let mode = OrderMode::parse(req.mode.as_deref().unwrap_or_default())
        .ok_or_else(|| AppError::Validation("Mode must be either BUY or SELL".to_string()))?;

    let order_type = match req.order_type.as_deref() {
        None | Some("") => OrderType::default(),
        Some(s) => OrderType::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Unknown order type: {s}")))?,
    };

    let product = match req.product.as_deref() {
        None | Some("") => Product::default(),
        Some(s) => Product::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Unknown product: {s}")))?,
    };

    let exchange = match req.exchange.as_deref() {
        None | Some("") => Exchange::default(),
        Some(s) => Exchange::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Unknown exchange: {s}")))?,
    };

    Ok(ValidatedOrder {
        name: name.to_string(),
        symbol: symbol.to_uppercase(),
        qty,
        price,
        mode,
        order_type,
        product,
        exchange,
        settlement: product.settlement(),
        payment_intent_id: req
            .payment_intent_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
    })
}

/// Volume-weighted average merge for a BUY against an existing lot.
pub fn merge_buy(qty_old: i64, avg_old: f64, qty_new: i64, price: f64) -> (i64, f64) {
    let total_qty = qty_old + qty_new;
    let total_cost = avg_old * qty_old as f64 + price * qty_new as f64;
    (total_qty, total_cost / total_qty as f64)
}

/// Order total, rounded to 2 decimals as stored on the order row.
pub fn order_total(qty: i64, price: f64) -> f64 {
    let total = qty as f64 * price;
    (total * 100.0).round() / 100.0
}

async fn find_by_payment_intent(
    state: &AppState,
    user_id: ObjectId,
    payment_intent_id: &str,
) -> Result<Option<Order>> {
    let orders = state.db.collection::<Order>("orders");
    Ok(orders
        .find_one(
            doc! { "user_id": user_id, "payment_intent_id": payment_intent_id },
            None,
        )
        .await?)
}

async fn find_holding(
    state: &AppState,
    user_id: ObjectId,
    symbol: &str,
) -> Result<Option<Holding>> {
    let holdings = state.db.collection::<Holding>("holdings");
    Ok(holdings
        .find_one(doc! { "user_id": user_id, "symbol": symbol }, None)
        .await?)
}

/// `create_order` is the sole trading-side writer of holdings, positions,
/// and the funds ledger. Business rules are checked before the first write;
/// the returned bool is false when an idempotent replay matched an existing
/// order and nothing was touched.
pub async fn create_order(
    state: &AppState,
    user_id: ObjectId,
    req: CreateOrderRequest,
) -> Result<(Order, bool)> {
    // Idempotent replay: same payment intent => hand back the stored order,
    // no side effects re-applied.
    if let Some(pi) = req
        .payment_intent_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if let Some(existing) = find_by_payment_intent(state, user_id, pi).await? {
            tracing::info!(order_id = %existing.order_id, "order already exists for payment intent");
            return Ok((existing, false));
        }
    }

    let v = validate(&req)?;

    // All business rules are checked before anything is persisted. A
    // delivery SELL needs enough settled inventory.
    if v.settlement == Settlement::Delivery && v.mode == OrderMode::Sell {
        match find_holding(state, user_id, &v.symbol).await? {
            None => {
                return Err(AppError::NotFound(
                    "No holdings found for this symbol".to_string(),
                ));
            }
            Some(h) if h.qty < v.qty => {
                return Err(AppError::InsufficientHoldings {
                    available: h.qty,
                    requested: v.qty,
                });
            }
            Some(_) => {}
        }
    }

    let now = Utc::now().timestamp();
    let id = ObjectId::new();

    let order = Order {
        id,
        user_id,
        order_id: format!("ORD{}", id.to_hex().to_uppercase()),
        name: v.name.clone(),
        symbol: v.symbol.clone(),
        qty: v.qty,
        price: v.price,
        mode: v.mode,
        order_type: v.order_type,
        product: v.product,
        exchange: v.exchange,
        total_amount: order_total(v.qty, v.price),
        status: OrderStatus::Completed,
        payment_intent_id: v.payment_intent_id.clone(),
        created_at: now,
        updated_at: now,
    };

    let orders = state.db.collection::<Order>("orders");
    orders.insert_one(&order, None).await?;

    if v.settlement == Settlement::Delivery {
        apply_to_holdings(state, user_id, &order).await?;
    }

    apply_to_positions(state, user_id, &order).await?;

    append_ledger_entry(state, user_id, &order).await?;

    tracing::info!(order_id = %order.order_id, symbol = %order.symbol, mode = order.mode.as_str(), "order created");

    Ok((order, true))
}

/// Holdings bookkeeping for delivery orders. BUY merges into the
/// volume-weighted average; SELL decrements and deletes the row at zero.
async fn apply_to_holdings(state: &AppState, user_id: ObjectId, order: &Order) -> Result<()> {
    let holdings = state.db.collection::<Holding>("holdings");
    let existing = find_holding(state, user_id, &order.symbol).await?;
    let now = Utc::now().timestamp();

    match order.mode {
        OrderMode::Buy => match existing {
            Some(h) => {
                let (qty, avg) = merge_buy(h.qty, h.avg, order.qty, order.price);
                holdings
                    .update_one(
                        doc! { "_id": h.id },
                        doc! { "$set": {
                            "qty": qty,
                            "avg": avg,
                            "last_price": order.price,
                            "updated_at": now,
                        }},
                        None,
                    )
                    .await?;
            }
            None => {
                let holding = Holding {
                    id: ObjectId::new(),
                    user_id,
                    name: order.name.clone(),
                    symbol: order.symbol.clone(),
                    qty: order.qty,
                    avg: order.price,
                    last_price: order.price,
                    exchange: order.exchange,
                    instrument: "EQUITY".to_string(),
                    created_at: now,
                    updated_at: now,
                };
                holdings.insert_one(&holding, None).await?;
            }
        },
        OrderMode::Sell => {
            // Availability was validated before the order row was written;
            // re-check here so a concurrent sell cannot drive qty negative.
            let Some(h) = existing else {
                return Err(AppError::NotFound(
                    "No holdings found for this symbol".to_string(),
                ));
            };
            if h.qty < order.qty {
                return Err(AppError::InsufficientHoldings {
                    available: h.qty,
                    requested: order.qty,
                });
            }

            let remaining = h.qty - order.qty;
            if remaining == 0 {
                holdings.delete_one(doc! { "_id": h.id }, None).await?;
            } else {
                holdings
                    .update_one(
                        doc! { "_id": h.id },
                        doc! { "$set": {
                            "qty": remaining,
                            "last_price": order.price,
                            "updated_at": now,
                        }},
                        None,
                    )
                    .await?;
            }
        }
    }

    Ok(())
}

/// Position bookkeeping for every product. Same merge rules as holdings,
/// but a SELL never errors: a missing position is a no-op and the quantity
/// is clipped at zero-then-deleted.
async fn apply_to_positions(state: &AppState, user_id: ObjectId, order: &Order) -> Result<()> {
    let positions = state.db.collection::<Position>("positions");
    let existing = positions
        .find_one(doc! { "user_id": user_id, "symbol": &order.symbol }, None)
        .await?;
    let now = Utc::now().timestamp();

    match existing {
        Some(p) => match order.mode {
            OrderMode::Buy => {
                let (qty, avg) = merge_buy(p.qty, p.avg, order.qty, order.price);
                positions
                    .update_one(
                        doc! { "_id": p.id },
                        doc! { "$set": {
                            "qty": qty,
                            "avg": avg,
                            "last_price": order.price,
                            "last_updated": now,
                        }},
                        None,
                    )
                    .await?;
            }
            OrderMode::Sell => {
                let remaining = p.qty - order.qty;
                if remaining <= 0 {
                    positions.delete_one(doc! { "_id": p.id }, None).await?;
                } else {
                    positions
                        .update_one(
                            doc! { "_id": p.id },
                            doc! { "$set": {
                                "qty": remaining,
                                "last_price": order.price,
                                "last_updated": now,
                            }},
                            None,
                        )
                        .await?;
                }
            }
        },
        None => {
            if order.mode == OrderMode::Buy {
                let position = Position {
                    id: ObjectId::new(),
                    user_id,
                    product: order.product,
                    name: order.name.clone(),
                    symbol: order.symbol.clone(),
                    qty: order.qty,
                    avg: order.price,
                    last_price: order.price,
                    exchange: order.exchange,
                    instrument: "EQUITY".to_string(),
                    live_price: 0.0,
                    change: 0.0,
                    change_percentage: 0.0,
                    pnl: 0.0,
                    pnl_percentage: 0.0,
                    day_pnl: 0.0,
                    day_pnl_percentage: 0.0,
                    is_loss: false,
                    last_updated: now,
                    created_at: now,
                };
                positions.insert_one(&position, None).await?;
            }
        }
    }

    Ok(())
}

/// One ledger movement per order: BUY debits available cash as an
/// `investment`, SELL credits the proceeds as `add`. A payment intent that
/// already produced a ledger entry is never credited twice.
async fn append_ledger_entry(state: &AppState, user_id: ObjectId, order: &Order) -> Result<()> {
    let funds = state.db.collection::<LedgerEntry>("funds");

    if let Some(pi) = order.payment_intent_id.as_deref() {
        let existing = funds
            .find_one(doc! { "payment_intent_id": pi }, None)
            .await?;
        if existing.is_some() {
            tracing::info!(payment_intent_id = %pi, "ledger entry already exists for payment intent");
            return Ok(());
        }
    }

    let description = format!(
        "{} {} {} @ {}",
        order.mode.as_str(),
        order.qty,
        order.symbol,
        order.price
    );

    let (kind, payment_intent_id) = match order.mode {
        OrderMode::Buy => (LedgerKind::Investment, order.payment_intent_id.clone()),
        OrderMode::Sell => (LedgerKind::Add, None),
    };

    let entry = LedgerEntry {
        id: ObjectId::new(),
        user_id,
        amount: order.total_amount,
        kind,
        payment_intent_id,
        description,
        status: LedgerStatus::Completed,
        created_at: Utc::now().timestamp(),
    };

    funds.insert_one(&entry, None).await?;
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub symbol: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
}

pub struct OrderPage {
    pub orders: Vec<Order>,
    pub current: i64,
    pub pages: i64,
    pub total: i64,
}

pub async fn list_orders(
    state: &AppState,
    user_id: ObjectId,
    query: &OrderListQuery,
) -> Result<OrderPage> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let mut filter: Document = doc! { "user_id": user_id };
    if let Some(symbol) = query.symbol.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("symbol", symbol.to_uppercase());
    }
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("status", status.to_uppercase());
    }
    if let Some(mode) = query.mode.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("mode", mode.to_uppercase());
    }

    let orders = state.db.collection::<Order>("orders");
    let total = orders.count_documents(filter.clone(), None).await? as i64;

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .skip(((page - 1) * limit) as u64)
        .limit(limit)
        .build();

    let mut cursor = orders.find(filter, find_opts).await?;
    let mut out: Vec<Order> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }

    Ok(OrderPage {
        orders: out,
        current: page,
        pages: (total + limit - 1) / limit,
        total,
    })
}

pub async fn get_order_by_id(state: &AppState, user_id: ObjectId, id: &str) -> Result<Order> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation("Invalid order id".to_string()))?;

    let orders = state.db.collection::<Order>("orders");
    orders
        .find_one(doc! { "_id": oid, "user_id": user_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

pub async fn cancel_order(state: &AppState, user_id: ObjectId, id: &str) -> Result<Order> {
    let order = get_order_by_id(state, user_id, id).await?;

    if order.status != OrderStatus::Pending {
        return Err(AppError::Validation(
            "Only pending orders can be cancelled".to_string(),
        ));
    }

    let orders = state.db.collection::<Order>("orders");
    orders
        .update_one(
            doc! { "_id": order.id },
            doc! { "$set": {
                "status": OrderStatus::Cancelled.as_str(),
                "updated_at": Utc::now().timestamp(),
            }},
            None,
        )
        .await?;

    Ok(Order {
        status: OrderStatus::Cancelled,
        ..order
    })
}

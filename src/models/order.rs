use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderMode {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl OrderMode {
    /// Case-insensitive parse; clients send "buy"/"BUY"/"Buy" alike.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "MARKET")]
    Market,
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "SL")]
    Sl,
    #[serde(rename = "SL-M")]
    SlM,
}

impl OrderType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MARKET" => Some(Self::Market),
            "LIMIT" => Some(Self::Limit),
            "SL" => Some(Self::Sl),
            "SL-M" => Some(Self::SlM),
            _ => None,
        }
    }
}

impl Default for OrderType {
    fn default() -> Self {
        Self::Market
    }
}

/// How an order settles. Decided once at validation time; Delivery orders
/// touch Holdings, Intraday orders only touch Positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Delivery,
    Intraday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "MIS")]
    Mis,
    #[serde(rename = "CNC")]
    Cnc,
    #[serde(rename = "NRML")]
    Nrml,
}

impl Product {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MIS" => Some(Self::Mis),
            "CNC" => Some(Self::Cnc),
            "NRML" => Some(Self::Nrml),
            _ => None,
        }
    }

    pub fn settlement(&self) -> Settlement {
        match self {
            Self::Cnc => Settlement::Delivery,
            Self::Mis | Self::Nrml => Settlement::Intraday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mis => "MIS",
            Self::Cnc => "CNC",
            Self::Nrml => "NRML",
        }
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::Mis
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    #[serde(rename = "NSE")]
    Nse,
    #[serde(rename = "BSE")]
    Bse,
}

impl Exchange {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NSE" => Some(Self::Nse),
            "BSE" => Some(Self::Bse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Bse => "BSE",
        }
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::Nse
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
    #[serde(rename = "FAILED")]
    Failed,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }
}

/// A persisted trade order. Immutable after creation except for the
/// PENDING -> CANCELLED status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub order_id: String,

    pub name: String,
    pub symbol: String,
    pub qty: i64,
    pub price: f64,
    pub mode: OrderMode,
    pub order_type: OrderType,
    pub product: Product,
    pub exchange: Exchange,
    pub total_amount: f64,
    pub status: OrderStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

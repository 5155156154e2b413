pub mod quotes;
pub mod price_cache;
pub mod valuation;
pub mod db_init;

pub mod auth_service;
pub mod order_service;
pub mod holdings_service;
pub mod positions_service;
pub mod funds_service;
pub mod payment_service;
pub mod watchlist_service;
pub mod indices_service;
pub mod summary_service;

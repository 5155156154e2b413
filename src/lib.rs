//! Library entrypoint for papertrade.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

// Kept at crate root because the codebase references it as `crate::auth`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;
pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub quotes: services::quotes::QuoteClient,
    pub stripe: services::payment_service::StripeClient,
    pub price_cache: Arc<services::price_cache::PriceCache>,
}

use std::net::SocketAddr;
use std::sync::Arc;

use mongodb::Client;
use papertrade::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!(error = %e, "index creation failed");
    }

    let state = AppState {
        db,
        quotes: services::quotes::QuoteClient::new(settings.quote_api_key.clone()),
        stripe: services::payment_service::StripeClient::new(settings.stripe_secret_key.clone()),
        price_cache: Arc::new(services::price_cache::PriceCache::new()),
        settings,
    };

    let app = routes::app(state.clone());

    let addr = SocketAddr::from((
        state.settings.host.parse::<std::net::IpAddr>().unwrap(),
        state.settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

//! HTTP gateway: router, shared state, response envelope and handlers.

pub mod handlers;
pub mod openapi;
pub mod response;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::db::Database;
use openapi::ApiDoc;
use state::AppState;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Everything except health, public market prices and the API docs sits
    // behind the bearer-token middleware.
    let protected = Router::new()
        .route("/accounts", get(handlers::list_accounts))
        .route(
            "/accounts/{account_id}/topup",
            post(handlers::top_up_account),
        )
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/crypto-positions", get(handlers::list_crypto_positions))
        .route(
            "/market/assets/{asset_identifier}",
            get(handlers::get_market_asset),
        )
        .route("/market/orders", post(handlers::process_crypto_order))
        .route("/otp/send", post(handlers::send_otp))
        .route("/otp/verify", post(handlers::verify_otp))
        .route(
            "/payouts/withdrawal-methods",
            get(handlers::list_withdrawal_methods).post(handlers::create_withdrawal_method),
        )
        .route(
            "/payouts/withdrawal-methods/{method_id}",
            delete(handlers::delete_withdrawal_method),
        )
        .route(
            "/payouts/withdrawals",
            get(handlers::list_withdrawals).post(handlers::create_withdrawal),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let cors = cors_layer(&state.config.gateway.cors_allowed_origins);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health_check))
        .route("/market/prices", get(handlers::list_market_prices))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP gateway and serve until shutdown.
pub async fn run_server(config: AppConfig, db: Database) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(AppState::new(config, db));
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on {addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

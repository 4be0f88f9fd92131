//! Routing module for the fee service

use crate::cart::state::SharedState;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: CORS (Permissive, storefront scripts call from shop domains)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes
    Router::new()
        .route("/health", get(health))
        .merge(crate::fees::routes())
        .merge(crate::cart::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Endpoint: GET /health
async fn health(State(state): State<SharedState>) -> Json<Value> {
    let rules = state.rules.read().await.len();
    Json(json!({
        "status": "ok",
        "rules": rules,
        "carts": state.carts.len(),
    }))
}

//! REST API handlers for cart operations
//!
//! This module implements HTTP endpoints for cart synchronization and for
//! recalculating the fees that apply to a cart.

use super::{helpers::*, models::*, state::SharedState, storefront::StorefrontCart};
use crate::error::AppError;
use crate::fees::calculator::{applicable_fees, total_amount};
use crate::fees::models::FeeLine;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/sync_cart", post(sync_cart))
        .route("/sync_cart/:id", delete(forget_cart))
        .route("/api/cart/update", post(update_cart_fees))
}

/// Input for `POST /api/cart/update`.
///
/// The cart is taken from `storefrontCart`, then `cart`, then the cart
/// previously synced under `cartId`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFeesInput {
    pub cart_id: Option<String>,
    pub cart: Option<CartInput>,
    pub storefront_cart: Option<StorefrontCart>,
}

/// Fees to apply to a cart
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFeesResponse {
    pub success: bool,
    pub cart_id: Option<String>,
    pub fees: Vec<FeeLine>,
    /// Sum of `fees`, rounded to cents
    pub total: f64,
}

/// Endpoint: POST /sync_cart
/// Stores the cart under its identifier, replacing any previous contents.
async fn sync_cart(
    State(state): State<SharedState>,
    Json(payload): Json<SyncCartInput>,
) -> Json<SyncResponse> {
    let cart_id = get_or_create_cart_id(payload.cart_id);
    let cart = CartSnapshot::from(payload.cart);

    debug!(%cart_id, summary = %format_cart_summary(&cart), "cart synced");
    state.carts.insert(cart_id.clone(), cart);

    Json(SyncResponse {
        status: "updated".to_string(),
        cart_id,
    })
}

/// Endpoint: DELETE /sync_cart/:id
/// Drops a synced cart once the storefront no longer needs it.
async fn forget_cart(
    State(state): State<SharedState>,
    Path(cart_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .carts
        .remove(&cart_id)
        .ok_or_else(|| AppError::NotFound(format!("cart {}", cart_id)))?;

    debug!(%cart_id, "cart removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Endpoint: POST /api/cart/update
/// Recalculates which fees apply to a cart.
async fn update_cart_fees(
    State(state): State<SharedState>,
    Json(payload): Json<CartFeesInput>,
) -> Result<Json<CartFeesResponse>, AppError> {
    let cart = resolve_cart(&state, &payload)?;
    let rules = state.rules_snapshot().await;

    let fees = applicable_fees(&rules, &cart);
    let total = total_amount(&fees);

    info!(
        cart_id = payload.cart_id.as_deref().unwrap_or("-"),
        applied = fees.len(),
        total,
        "fees recalculated"
    );

    Ok(Json(CartFeesResponse {
        success: true,
        cart_id: payload.cart_id.clone(),
        fees: fees.iter().map(FeeLine::from).collect(),
        total,
    }))
}

fn resolve_cart(state: &SharedState, payload: &CartFeesInput) -> Result<CartSnapshot, AppError> {
    if let Some(storefront) = &payload.storefront_cart {
        return Ok(CartSnapshot::from(storefront.clone()));
    }
    if let Some(cart) = &payload.cart {
        return Ok(CartSnapshot::from(cart.clone()));
    }

    let cart_id = payload
        .cart_id
        .as_deref()
        .ok_or_else(|| AppError::InvalidRequest("Cart ID is required".to_string()))?;

    state
        .carts
        .get(cart_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("cart {}", cart_id)))
}

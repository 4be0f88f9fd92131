//! Shopping Cart Domain Models
//!
//! This module contains the cart snapshot the fee engine evaluates against,
//! together with the loose input shape it is built from.

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Physical dimensions of a line item. Each side is optional.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
}

/// A single line of the cart as seen by the fee engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: u64,
    /// Unit price
    pub price: f64,
    /// Unit weight
    pub weight: f64,
    pub collection_ids: Vec<String>,
    /// Inventory level, when the platform reports one
    pub stock: Option<f64>,
    pub stock_status: Option<String>,
    pub dimensions: Dimensions,
}

/// Shipping destination of the cart. Missing fields are empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    pub country: String,
    pub state: String,
    pub city: String,
    pub zipcode: String,
}

/// Point-in-time, fully defaulted view of a cart.
///
/// Built once per evaluation by one of the adapters in
/// [`helpers`](super::helpers) or [`storefront`](super::storefront); the fee
/// engine only ever borrows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub subtotal: f64,
    pub subtotal_ex_tax: f64,
    pub tax: f64,
    pub total_quantity: u64,
    pub total_weight: f64,
    pub product_ids: Vec<String>,
    pub coupon_codes: Vec<String>,
    pub customer_tags: Vec<String>,
    pub shipping: ShippingAddress,
    pub line_items: Vec<LineItem>,
}

// =============================================================================
// Cart Input
// =============================================================================

/// Dimensions as sent by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionsInput {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
}

/// Line item as sent by a client; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub quantity: Option<u64>,
    pub price: Option<f64>,
    pub weight: Option<f64>,
    pub collection_ids: Option<Vec<String>>,
    pub stock: Option<f64>,
    pub stock_status: Option<String>,
    pub dimensions: Option<DimensionsInput>,
}

/// Loose cart representation accepted by the REST API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    pub subtotal: Option<f64>,
    pub subtotal_ex_tax: Option<f64>,
    pub tax: Option<f64>,
    pub quantity: Option<u64>,
    pub weight: Option<f64>,
    pub product_ids: Option<Vec<String>>,
    pub coupon_codes: Option<Vec<String>>,
    pub shipping_country: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_zipcode: Option<String>,
    pub customer_tags: Option<Vec<String>>,
    pub line_items: Option<Vec<LineItemInput>>,
}

// =============================================================================
// Requests and Responses
// =============================================================================

/// Input for `POST /sync_cart`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCartInput {
    /// Optional cart identifier
    pub cart_id: Option<String>,

    /// Cart contents to remember under `cart_id`
    pub cart: CartInput,
}

/// Response for cart synchronization operations
#[derive(Serialize)]
pub struct SyncResponse {
    /// Status of the operation
    pub status: String,

    /// Cart identifier
    #[serde(rename = "cartId")]
    pub cart_id: String,
}

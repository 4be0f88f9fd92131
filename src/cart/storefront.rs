//! Storefront Cart Adapter
//!
//! Converts the host platform's GraphQL cart document into a
//! [`CartSnapshot`]. Only the fields the fee engine reads are modelled;
//! everything else in the document is ignored.

use super::models::{CartSnapshot, Dimensions, LineItem, ShippingAddress};
use serde::Deserialize;

/// Stock status reported for variants that can be sold
pub const IN_STOCK: &str = "in_stock";
/// Stock status reported for variants that cannot be sold
pub const OUT_OF_STOCK: &str = "out_of_stock";

// =============================================================================
// GraphQL Document Shape
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoneyV2 {
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeId {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metafield {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontProduct {
    pub id: Option<String>,
    pub collections: Option<Connection<NodeId>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontVariant {
    pub id: Option<String>,
    pub price: Option<String>,
    pub weight: Option<String>,
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub available_for_sale: bool,
    pub metafields: Option<Connection<Metafield>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontLine {
    pub quantity: Option<u64>,
    pub product: Option<StorefrontProduct>,
    pub variant: Option<StorefrontVariant>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountCode {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontAddress {
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontCustomer {
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The `cart` object returned by the storefront cart query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCart {
    pub subtotal_price: Option<MoneyV2>,
    pub total_tax: Option<MoneyV2>,
    pub line_items: Option<Connection<StorefrontLine>>,
    pub discount_codes: Option<Vec<DiscountCode>>,
    pub shipping_address: Option<StorefrontAddress>,
    pub customer: Option<StorefrontCustomer>,
}

// =============================================================================
// Conversion
// =============================================================================

/// Parses a decimal string from the platform, treating garbage as zero
fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn money(value: &Option<MoneyV2>) -> f64 {
    parse_amount(value.as_ref().and_then(|m| m.amount.as_deref()))
}

/// Reads a dimension metafield; missing, unparsable and zero all mean "unknown"
fn dimension(metafields: &[Metafield], key: &str) -> Option<f64> {
    let raw = metafields
        .iter()
        .find(|m| m.key == key)
        .and_then(|m| m.value.as_deref());
    Some(parse_amount(raw)).filter(|v| *v != 0.0)
}

impl From<StorefrontLine> for LineItem {
    fn from(line: StorefrontLine) -> Self {
        let product = line.product.unwrap_or_default();
        let variant = line.variant.unwrap_or_default();
        let metafields: Vec<Metafield> = variant
            .metafields
            .map(|c| c.edges.into_iter().map(|e| e.node).collect())
            .unwrap_or_default();

        LineItem {
            product_id: product.id.unwrap_or_default(),
            variant_id: variant.id.unwrap_or_default(),
            quantity: line.quantity.unwrap_or(0),
            price: parse_amount(variant.price.as_deref()),
            weight: parse_amount(variant.weight.as_deref()),
            collection_ids: product
                .collections
                .map(|c| c.edges.into_iter().map(|e| e.node.id).collect())
                .unwrap_or_default(),
            stock: variant
                .inventory_quantity
                .filter(|q| *q != 0)
                .map(|q| q as f64),
            stock_status: Some(
                if variant.available_for_sale {
                    IN_STOCK
                } else {
                    OUT_OF_STOCK
                }
                .to_string(),
            ),
            dimensions: Dimensions {
                width: dimension(&metafields, "width"),
                height: dimension(&metafields, "height"),
                length: dimension(&metafields, "length"),
            },
        }
    }
}

impl From<StorefrontCart> for CartSnapshot {
    fn from(cart: StorefrontCart) -> Self {
        let subtotal = money(&cart.subtotal_price);
        let tax = money(&cart.total_tax);

        let line_items: Vec<LineItem> = cart
            .line_items
            .map(|c| c.edges.into_iter().map(|e| LineItem::from(e.node)).collect())
            .unwrap_or_default();

        let total_quantity = line_items.iter().map(|l| l.quantity).sum();
        let total_weight = line_items
            .iter()
            .map(|l| l.weight * l.quantity as f64)
            .sum();
        let product_ids = line_items.iter().map(|l| l.product_id.clone()).collect();

        let address = cart.shipping_address.unwrap_or_default();

        CartSnapshot {
            subtotal,
            subtotal_ex_tax: subtotal,
            tax,
            total_quantity,
            total_weight,
            product_ids,
            coupon_codes: cart
                .discount_codes
                .unwrap_or_default()
                .into_iter()
                .map(|d| d.code)
                .collect(),
            customer_tags: cart.customer.map(|c| c.tags).unwrap_or_default(),
            shipping: ShippingAddress {
                country: address.country.unwrap_or_default(),
                state: address.province.unwrap_or_default(),
                city: address.city.unwrap_or_default(),
                zipcode: address.zip.unwrap_or_default(),
            },
            line_items,
        }
    }
}

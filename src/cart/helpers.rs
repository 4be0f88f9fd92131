//! Shopping Cart Helpers
//!
//! This module contains the adapter from the loose [`CartInput`] shape to a
//! [`CartSnapshot`], plus small helpers shared by the handlers.

use super::models::{CartInput, CartSnapshot, Dimensions, LineItem, LineItemInput, ShippingAddress};
use uuid::Uuid;

/// Returns the provided `cart_id` or creates a new UUID string when `None`.
///
/// This guarantees that every cart operation works with a non-empty identifier.
pub fn get_or_create_cart_id(cart_id: Option<String>) -> String {
    cart_id.unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

impl From<LineItemInput> for LineItem {
    fn from(input: LineItemInput) -> Self {
        let dimensions = input
            .dimensions
            .map(|d| Dimensions {
                width: d.width,
                height: d.height,
                length: d.length,
            })
            .unwrap_or_default();

        LineItem {
            product_id: input.product_id.unwrap_or_default(),
            variant_id: input.variant_id.unwrap_or_default(),
            quantity: input.quantity.unwrap_or(0),
            price: input.price.unwrap_or(0.0),
            weight: input.weight.unwrap_or(0.0),
            collection_ids: input.collection_ids.unwrap_or_default(),
            stock: input.stock,
            stock_status: input.stock_status,
            dimensions,
        }
    }
}

/// Applies every documented default exactly once.
///
/// * numbers default to `0`, except `subtotalExTax` which falls back to the
///   subtotal
/// * strings default to `""`
/// * sequences default to empty
impl From<CartInput> for CartSnapshot {
    fn from(input: CartInput) -> Self {
        let subtotal = input.subtotal.unwrap_or(0.0);

        CartSnapshot {
            subtotal,
            subtotal_ex_tax: input.subtotal_ex_tax.unwrap_or(subtotal),
            tax: input.tax.unwrap_or(0.0),
            total_quantity: input.quantity.unwrap_or(0),
            total_weight: input.weight.unwrap_or(0.0),
            product_ids: input.product_ids.unwrap_or_default(),
            coupon_codes: input.coupon_codes.unwrap_or_default(),
            customer_tags: input.customer_tags.unwrap_or_default(),
            shipping: ShippingAddress {
                country: input.shipping_country.unwrap_or_default(),
                state: input.shipping_state.unwrap_or_default(),
                city: input.shipping_city.unwrap_or_default(),
                zipcode: input.shipping_zipcode.unwrap_or_default(),
            },
            line_items: input
                .line_items
                .unwrap_or_default()
                .into_iter()
                .map(LineItem::from)
                .collect(),
        }
    }
}

/// Produces a human-readable one-line summary of a cart for logs.
///
/// Example output: `"3 item(s), subtotal 42.50, 2 line(s)"`.
pub fn format_cart_summary(cart: &CartSnapshot) -> String {
    format!(
        "{} item(s), subtotal {:.2}, {} line(s)",
        cart.total_quantity,
        cart.subtotal,
        cart.line_items.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_input_defaults() {
        let input: CartInput = serde_json::from_value(json!({})).unwrap();
        let cart = CartSnapshot::from(input);

        assert_eq!(cart, CartSnapshot::default());
        assert_eq!(cart.shipping.country, "");
        assert!(cart.line_items.is_empty());
    }

    #[test]
    fn test_subtotal_ex_tax_falls_back_to_subtotal() {
        let input: CartInput = serde_json::from_value(json!({ "subtotal": 80.0 })).unwrap();
        let cart = CartSnapshot::from(input);
        assert_eq!(cart.subtotal_ex_tax, 80.0);

        let input: CartInput =
            serde_json::from_value(json!({ "subtotal": 80.0, "subtotalExTax": 70.0 })).unwrap();
        let cart = CartSnapshot::from(input);
        assert_eq!(cart.subtotal_ex_tax, 70.0);
    }

    #[test]
    fn test_line_items_are_converted() {
        let input: CartInput = serde_json::from_value(json!({
            "quantity": 2,
            "shippingCountry": "US",
            "lineItems": [{
                "productId": "p1",
                "quantity": 2,
                "price": 9.5,
                "collectionIds": ["c1"],
                "stock": 4,
                "dimensions": { "width": 10 }
            }]
        }))
        .unwrap();
        let cart = CartSnapshot::from(input);

        assert_eq!(cart.total_quantity, 2);
        assert_eq!(cart.shipping.country, "US");

        let line = &cart.line_items[0];
        assert_eq!(line.product_id, "p1");
        assert_eq!(line.variant_id, "");
        assert_eq!(line.weight, 0.0);
        assert_eq!(line.collection_ids, vec!["c1".to_string()]);
        assert_eq!(line.stock, Some(4.0));
        assert_eq!(line.stock_status, None);
        assert_eq!(line.dimensions.width, Some(10.0));
        assert_eq!(line.dimensions.height, None);
    }

    #[test]
    fn test_get_or_create_cart_id() {
        assert_eq!(get_or_create_cart_id(Some("abc".into())), "abc");
        let generated = get_or_create_cart_id(None);
        assert_eq!(generated.len(), 32);
    }

    #[test]
    fn test_format_cart_summary() {
        let cart = CartSnapshot {
            subtotal: 42.5,
            total_quantity: 3,
            ..Default::default()
        };
        assert_eq!(format_cart_summary(&cart), "3 item(s), subtotal 42.50, 0 line(s)");
    }
}

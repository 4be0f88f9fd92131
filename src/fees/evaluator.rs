//! Condition evaluation.
//!
//! [`evaluate`] decides a single condition, [`evaluate_group`] and
//! [`evaluate_rule`] fold those results with the declared combinator. All
//! three are pure functions of their inputs.

use super::condition::{Aggregate, CartSet, LineMeasure, Predicate, ShippingField};
use super::models::{Combinator, Condition, ConditionGroup, FeeRule};
use crate::cart::models::{CartSnapshot, LineItem};

impl Predicate<'_> {
    /// Decides this predicate against `cart`. Missing operators, thresholds
    /// or values make the predicate false.
    pub fn holds(&self, cart: &CartSnapshot) -> bool {
        match *self {
            Predicate::Aggregate {
                field,
                op,
                threshold,
            } => match (op, threshold) {
                (Some(op), Some(expected)) => op.apply(aggregate(cart, field), expected),
                _ => false,
            },

            Predicate::Shipping {
                field,
                op,
                expected,
            } => match (op, expected) {
                (Some(op), Some(expected)) => op.apply(shipping(cart, field), expected),
                _ => false,
            },

            Predicate::Membership { set, op, values } => match (op, values) {
                (Some(op), Some(values)) => match set {
                    CartSet::Products => op.apply(values, &cart.product_ids),
                    CartSet::Coupons => op.apply(values, &cart.coupon_codes),
                    CartSet::CustomerTags => op.apply(values, &cart.customer_tags),
                    CartSet::Collections => {
                        let collections: Vec<&str> = cart
                            .line_items
                            .iter()
                            .flat_map(|item| item.collection_ids.iter().map(String::as_str))
                            .collect();
                        op.apply(values, &collections)
                    }
                },
                _ => false,
            },

            Predicate::AnyLineMeasure {
                measure,
                op,
                threshold,
            } => match (op, threshold) {
                (Some(op), Some(expected)) => cart
                    .line_items
                    .iter()
                    .filter_map(|item| line_measure(item, measure))
                    .any(|actual| op.apply(actual, expected)),
                _ => false,
            },

            Predicate::AnyLineStockStatus { op, expected } => match (op, expected) {
                (Some(op), Some(expected)) => cart
                    .line_items
                    .iter()
                    .filter_map(|item| item.stock_status.as_deref())
                    .filter(|status| !status.is_empty())
                    .any(|status| op.apply(status, expected)),
                _ => false,
            },
        }
    }
}

fn aggregate(cart: &CartSnapshot, field: Aggregate) -> f64 {
    match field {
        Aggregate::Subtotal => cart.subtotal,
        Aggregate::SubtotalExTax => cart.subtotal_ex_tax,
        Aggregate::Tax => cart.tax,
        Aggregate::Quantity => cart.total_quantity as f64,
        Aggregate::Weight => cart.total_weight,
    }
}

fn shipping(cart: &CartSnapshot, field: ShippingField) -> &str {
    match field {
        ShippingField::Country => &cart.shipping.country,
        ShippingField::State => &cart.shipping.state,
        ShippingField::City => &cart.shipping.city,
        ShippingField::Zipcode => &cart.shipping.zipcode,
    }
}

fn line_measure(item: &LineItem, measure: LineMeasure) -> Option<f64> {
    match measure {
        LineMeasure::Stock => item.stock,
        LineMeasure::Width => item.dimensions.width,
        LineMeasure::Height => item.dimensions.height,
        LineMeasure::Length => item.dimensions.length,
    }
}

/// Folds results under `combinator`. Both AND and OR are true for an empty
/// sequence, meaning "no restriction".
fn fold<I>(combinator: Combinator, results: I) -> bool
where
    I: Iterator<Item = bool>,
{
    let mut results = results.peekable();
    if results.peek().is_none() {
        return true;
    }
    match combinator {
        Combinator::And => results.all(|r| r),
        Combinator::Or => results.any(|r| r),
    }
}

/// Evaluates one condition against the cart
pub fn evaluate(condition: &Condition, cart: &CartSnapshot) -> bool {
    Predicate::compile(condition).holds(cart)
}

/// Evaluates every condition of a group and folds with the group combinator
pub fn evaluate_group(group: &ConditionGroup, cart: &CartSnapshot) -> bool {
    fold(
        group.combinator,
        group.conditions.iter().map(|c| evaluate(c, cart)),
    )
}

/// Evaluates every group of a rule and folds with the rule's combinator.
///
/// A rule without groups applies to every cart.
pub fn evaluate_rule(rule: &FeeRule, cart: &CartSnapshot) -> bool {
    fold(
        rule.group_combinator,
        rule.condition_groups.iter().map(|g| evaluate_group(g, cart)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::models::{Dimensions, ShippingAddress};
    use crate::fees::models::{CalculationType, ConditionType, RuleStatus, Sign};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_cart() -> CartSnapshot {
        CartSnapshot {
            subtotal: 150.0,
            subtotal_ex_tax: 130.0,
            tax: 20.0,
            total_quantity: 3,
            total_weight: 4.5,
            product_ids: strings(&["p1", "p2"]),
            coupon_codes: strings(&["SAVE10"]),
            customer_tags: strings(&["vip"]),
            shipping: ShippingAddress {
                country: "US".into(),
                state: "California".into(),
                city: "San Francisco".into(),
                zipcode: "94103".into(),
            },
            line_items: vec![
                LineItem {
                    product_id: "p1".into(),
                    quantity: 2,
                    collection_ids: strings(&["summer"]),
                    stock: Some(3.0),
                    stock_status: Some("in_stock".into()),
                    dimensions: Dimensions {
                        width: Some(40.0),
                        height: None,
                        length: Some(10.0),
                    },
                    ..Default::default()
                },
                LineItem {
                    product_id: "p2".into(),
                    quantity: 1,
                    collection_ids: strings(&["sale"]),
                    stock: None,
                    stock_status: Some("out_of_stock".into()),
                    ..Default::default()
                },
            ],
        }
    }

    fn rule(combinator: Combinator, groups: Vec<ConditionGroup>) -> FeeRule {
        FeeRule {
            id: "r1".into(),
            title: "Test".into(),
            amount: 1.0,
            calculation_type: CalculationType::Fixed,
            sign: Sign::Plus,
            tax_class: None,
            status: RuleStatus::Published,
            priority: 0,
            group_combinator: combinator,
            condition_groups: groups,
            created_at: chrono::Utc::now(),
        }
    }

    fn group(combinator: Combinator, conditions: Vec<Condition>) -> ConditionGroup {
        ConditionGroup {
            combinator,
            conditions,
        }
    }

    #[test]
    fn test_numeric_aggregates() {
        let cart = sample_cart();
        assert!(evaluate(&Condition::new(ConditionType::Subtotal, ">=", "100"), &cart));
        assert!(!evaluate(&Condition::new(ConditionType::Subtotal, "<", "100"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::SubtotalExTax, "==", "130"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::Tax, ">", "19.99"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::Quantity, "==", "3"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::Weight, "<=", "4.5"), &cart));
    }

    #[test]
    fn test_unparsable_threshold_is_false_for_every_operator() {
        let cart = sample_cart();
        for op in [">=", "<=", ">", "<", "==", "!="] {
            let condition = Condition::new(ConditionType::Subtotal, op, "lots");
            assert!(!evaluate(&condition, &cart), "operator {op}");
        }
    }

    #[test]
    fn test_set_membership_conditions() {
        let cart = sample_cart();
        let contains = |op: &str, values: &[&str]| {
            Condition::new(ConditionType::ContainsProduct, op, strings(values))
        };

        assert!(evaluate(&contains("in", &["p2", "p9"]), &cart));
        assert!(!evaluate(&contains("in", &["p9"]), &cart));
        assert!(evaluate(&contains("not_in", &["p9"]), &cart));
        assert!(!evaluate(&contains("not_in", &["p1"]), &cart));

        assert!(evaluate(
            &Condition::new(ConditionType::Coupon, "in", strings(&["SAVE10"])),
            &cart
        ));
        assert!(evaluate(
            &Condition::new(ConditionType::CustomerTag, "not_in", strings(&["wholesale"])),
            &cart
        ));
        assert!(evaluate(
            &Condition::new(ConditionType::Collection, "in", strings(&["sale"])),
            &cart
        ));
    }

    #[test]
    fn test_set_membership_is_conservative() {
        let empty = CartSnapshot::default();
        let values = strings(&["p1"]);

        assert!(!evaluate(
            &Condition::new(ConditionType::ContainsProduct, "in", values.clone()),
            &empty
        ));
        assert!(!evaluate(
            &Condition::new(ConditionType::ContainsProduct, "not_in", values.clone()),
            &empty
        ));
        assert!(!evaluate(
            &Condition::new(ConditionType::Collection, "not_in", values),
            &empty
        ));

        // Scalar value where a list is expected
        let cart = sample_cart();
        assert!(!evaluate(&Condition::new(ConditionType::ContainsProduct, "not_in", "p9"), &cart));
        assert!(!evaluate(&Condition::new(ConditionType::ContainsProduct, "in", "p1"), &cart));

        // Empty list
        assert!(!evaluate(
            &Condition::new(ConditionType::ContainsProduct, "not_in", Vec::<String>::new()),
            &cart
        ));
    }

    #[test]
    fn test_shipping_fields() {
        let cart = sample_cart();
        assert!(evaluate(&Condition::new(ConditionType::Country, "==", "us"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::State, "contains", "CALI"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::City, "not_contains", "los"), &cart));
        assert!(!evaluate(&Condition::new(ConditionType::Zipcode, "!=", "94103"), &cart));
        assert!(!evaluate(
            &Condition::new(ConditionType::Country, "==", strings(&["US"])),
            &cart
        ));

        let nowhere = CartSnapshot::default();
        assert!(evaluate(&Condition::new(ConditionType::City, "==", ""), &nowhere));
    }

    #[test]
    fn test_line_item_conditions_are_existential() {
        let cart = sample_cart();
        assert!(evaluate(&Condition::new(ConditionType::Stock, "<", "5"), &cart));
        assert!(!evaluate(&Condition::new(ConditionType::Stock, ">", "5"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::Width, ">=", "40"), &cart));
        assert!(evaluate(&Condition::new(ConditionType::Length, "==", "10"), &cart));
        assert!(evaluate(
            &Condition::new(ConditionType::StockStatus, "==", "OUT_OF_STOCK"),
            &cart
        ));
        assert!(evaluate(
            &Condition::new(ConditionType::StockStatus, "!=", "in_stock"),
            &cart
        ));
    }

    #[test]
    fn test_missing_line_item_fields_are_skipped() {
        let cart = sample_cart();
        // No line item has a height, so even "!=" cannot match
        assert!(!evaluate(&Condition::new(ConditionType::Height, "!=", "1"), &cart));
        assert!(!evaluate(&Condition::new(ConditionType::Height, ">=", "0"), &cart));

        let empty = CartSnapshot::default();
        assert!(!evaluate(&Condition::new(ConditionType::Stock, ">=", "0"), &empty));
        assert!(!evaluate(&Condition::new(ConditionType::StockStatus, "!=", "x"), &empty));

        // An empty stock status counts as unreported
        let blank_status = CartSnapshot {
            line_items: vec![LineItem {
                product_id: "p9".into(),
                quantity: 1,
                stock_status: Some(String::new()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(!evaluate(
            &Condition::new(ConditionType::StockStatus, "!=", "in_stock"),
            &blank_status
        ));
        assert!(!evaluate(&Condition::new(ConditionType::StockStatus, "==", ""), &blank_status));
    }

    #[test]
    fn test_empty_groups_are_vacuously_true() {
        let cart = CartSnapshot::default();
        assert!(evaluate_group(&group(Combinator::And, vec![]), &cart));
        assert!(evaluate_group(&group(Combinator::Or, vec![]), &cart));
        assert!(evaluate_rule(&rule(Combinator::And, vec![]), &cart));
        assert!(evaluate_rule(&rule(Combinator::Or, vec![]), &cart));
    }

    #[test]
    fn test_group_combinators() {
        let cart = sample_cart();
        let pass = Condition::new(ConditionType::Subtotal, ">=", "100");
        let fail = Condition::new(ConditionType::Subtotal, ">=", "1000");

        assert!(evaluate_group(&group(Combinator::And, vec![pass.clone(), pass.clone()]), &cart));
        assert!(!evaluate_group(&group(Combinator::And, vec![pass.clone(), fail.clone()]), &cart));
        assert!(evaluate_group(&group(Combinator::Or, vec![fail.clone(), pass.clone()]), &cart));
        assert!(!evaluate_group(&group(Combinator::Or, vec![fail.clone(), fail]), &cart));
    }

    #[test]
    fn test_rule_combinators() {
        let cart = sample_cart();
        let matching = group(
            Combinator::And,
            vec![Condition::new(ConditionType::Country, "==", "US")],
        );
        let failing = group(
            Combinator::And,
            vec![Condition::new(ConditionType::Country, "==", "CA")],
        );

        assert!(evaluate_rule(
            &rule(Combinator::Or, vec![failing.clone(), matching.clone()]),
            &cart
        ));
        assert!(!evaluate_rule(
            &rule(Combinator::And, vec![failing.clone(), matching.clone()]),
            &cart
        ));
        // An empty group inside an AND rule imposes no restriction
        assert!(evaluate_rule(
            &rule(Combinator::And, vec![matching, group(Combinator::Or, vec![])]),
            &cart
        ));
        assert!(!evaluate_rule(&rule(Combinator::Or, vec![failing]), &cart));
    }
}

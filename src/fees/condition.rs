//! Typed predicates.
//!
//! A [`Condition`] is compiled into a [`Predicate`] before evaluation. This is
//! the single place where operator strings are parsed and where numeric
//! thresholds are coerced from their authored string form. Anything that does
//! not fit the expected shape becomes `None` and evaluates to false.

use super::compare::{NumericOp, SetOp, StringOp};
use super::models::{Condition, ConditionType, ConditionValue};

/// Cart-level numeric aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Subtotal,
    SubtotalExTax,
    Tax,
    Quantity,
    Weight,
}

/// Shipping destination fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    Country,
    State,
    City,
    Zipcode,
}

/// Identifier collections observable on the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartSet {
    Products,
    Coupons,
    CustomerTags,
    /// Union of the collections of every line item
    Collections,
}

/// Per-line-item numeric measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMeasure {
    Stock,
    Width,
    Height,
    Length,
}

/// A condition with its payload resolved to the type its domain needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate<'a> {
    Aggregate {
        field: Aggregate,
        op: Option<NumericOp>,
        threshold: Option<f64>,
    },
    Shipping {
        field: ShippingField,
        op: Option<StringOp>,
        expected: Option<&'a str>,
    },
    Membership {
        set: CartSet,
        op: Option<SetOp>,
        values: Option<&'a [String]>,
    },
    /// True when any line item's measure satisfies the comparison
    AnyLineMeasure {
        measure: LineMeasure,
        op: Option<NumericOp>,
        threshold: Option<f64>,
    },
    /// True when any line item's stock status satisfies the comparison
    AnyLineStockStatus {
        op: Option<StringOp>,
        expected: Option<&'a str>,
    },
}

/// Coerces an authored value into a numeric threshold.
///
/// Lists, unparsable strings and NaN all yield `None`.
pub fn parse_threshold(value: &ConditionValue) -> Option<f64> {
    value
        .as_single()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

impl<'a> Predicate<'a> {
    pub fn compile(condition: &'a Condition) -> Self {
        let operator = condition.operator.as_str();
        let value = &condition.value;

        let aggregate = |field| Predicate::Aggregate {
            field,
            op: operator.parse().ok(),
            threshold: parse_threshold(value),
        };
        let shipping = |field| Predicate::Shipping {
            field,
            op: operator.parse().ok(),
            expected: value.as_single(),
        };
        let membership = |set| Predicate::Membership {
            set,
            op: operator.parse().ok(),
            values: value.as_list(),
        };
        let line_measure = |measure| Predicate::AnyLineMeasure {
            measure,
            op: operator.parse().ok(),
            threshold: parse_threshold(value),
        };

        match condition.kind {
            ConditionType::Subtotal => aggregate(Aggregate::Subtotal),
            ConditionType::SubtotalExTax => aggregate(Aggregate::SubtotalExTax),
            ConditionType::Tax => aggregate(Aggregate::Tax),
            ConditionType::Quantity => aggregate(Aggregate::Quantity),
            ConditionType::Weight => aggregate(Aggregate::Weight),
            ConditionType::ContainsProduct => membership(CartSet::Products),
            ConditionType::Coupon => membership(CartSet::Coupons),
            ConditionType::CustomerTag => membership(CartSet::CustomerTags),
            ConditionType::Collection => membership(CartSet::Collections),
            ConditionType::Country => shipping(ShippingField::Country),
            ConditionType::State => shipping(ShippingField::State),
            ConditionType::City => shipping(ShippingField::City),
            ConditionType::Zipcode => shipping(ShippingField::Zipcode),
            ConditionType::Stock => line_measure(LineMeasure::Stock),
            ConditionType::Width => line_measure(LineMeasure::Width),
            ConditionType::Height => line_measure(LineMeasure::Height),
            ConditionType::Length => line_measure(LineMeasure::Length),
            ConditionType::StockStatus => Predicate::AnyLineStockStatus {
                op: operator.parse().ok(),
                expected: value.as_single(),
            },
        }
    }
}

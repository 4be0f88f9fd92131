//! Fee resolution.
//!
//! Turns a rule set and a cart snapshot into the ordered list of fees that
//! apply to that cart.

use super::evaluator::evaluate_rule;
use super::models::{ApplicableFee, CalculationType, FeeRule, Sign};
use crate::cart::models::CartSnapshot;
use tracing::{debug, warn};

/// Rounds half away from zero to two decimals. Never returns `-0.0`.
pub fn round_to_cents(amount: f64) -> f64 {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Computes the signed, rounded amount a matching rule contributes.
pub fn calculate_fee_amount(rule: &FeeRule, cart: &CartSnapshot) -> f64 {
    let amount = match rule.calculation_type {
        CalculationType::Fixed => rule.amount,
        CalculationType::Percentage => cart.subtotal * rule.amount / 100.0,
        CalculationType::Multiple => rule.amount * cart.total_quantity as f64,
        CalculationType::Unrecognized => {
            // TODO: decide with product whether such rules should be rejected
            // at authoring time instead of applying a zero fee.
            warn!(
                rule_id = %rule.id,
                "fee rule has an unrecognized calculation type, applying a zero amount"
            );
            0.0
        }
    };

    let signed = match rule.sign {
        Sign::Plus => amount,
        Sign::Minus => -amount,
    };

    round_to_cents(signed)
}

/// Selects the published rules that match `cart`, in priority order.
///
/// Rules with equal priority keep their relative input order.
pub fn applicable_fees<'a>(rules: &'a [FeeRule], cart: &CartSnapshot) -> Vec<ApplicableFee<'a>> {
    let mut active: Vec<&FeeRule> = rules.iter().filter(|r| r.is_published()).collect();
    active.sort_by_key(|r| r.priority);

    active
        .into_iter()
        .filter(|rule| {
            let matched = evaluate_rule(rule, cart);
            debug!(rule_id = %rule.id, priority = rule.priority, matched, "evaluated fee rule");
            matched
        })
        .map(|rule| ApplicableFee {
            rule,
            amount: calculate_fee_amount(rule, cart),
        })
        .collect()
}

/// Sum of the amounts of `fees`, rounded to cents
pub fn total_amount(fees: &[ApplicableFee<'_>]) -> f64 {
    round_to_cents(fees.iter().map(|f| f.amount).sum())
}

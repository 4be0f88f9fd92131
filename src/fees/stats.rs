//! Rule set summaries for the authoring dashboard

use super::calculator::round_to_cents;
use super::models::{CalculationType, FeeRule, RuleStatus};
use serde::Serialize;
use std::cmp::Reverse;

/// How many rules the "top" and "recent" lists hold
pub const SUMMARY_LIST_LEN: usize = 5;

/// Number of rules per publication state
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub published: usize,
    pub draft: usize,
}

/// Number of rules per calculation type. Unrecognized types only count
/// towards [`StatusCounts::all`].
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalculationCounts {
    pub fixed: usize,
    pub percentage: usize,
    pub multiple: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    pub counts: StatusCounts,
    /// Sum of the unsigned amounts of published rules
    pub total_published_amount: f64,
    pub calculation_types: CalculationCounts,
    /// Published rules with the most condition groups
    pub top: Vec<FeeRule>,
    /// Newest rules first
    pub recent: Vec<FeeRule>,
}

/// Orders rules the way the authoring list shows them: priority ascending,
/// newest first among equal priorities.
pub fn sort_for_listing(rules: &mut [FeeRule]) {
    rules.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

impl RuleStats {
    pub fn from_rules(rules: &[FeeRule]) -> Self {
        let mut newest_first: Vec<&FeeRule> = rules.iter().collect();
        newest_first.sort_by_key(|r| Reverse(r.created_at));

        let mut counts = StatusCounts::default();
        let mut calculation_types = CalculationCounts::default();
        let mut total_published_amount = 0.0;

        for rule in rules {
            counts.all += 1;
            match rule.status {
                RuleStatus::Published => {
                    counts.published += 1;
                    total_published_amount += rule.amount;
                }
                RuleStatus::Draft => counts.draft += 1,
                RuleStatus::Inactive => {}
            }
            match rule.calculation_type {
                CalculationType::Fixed => calculation_types.fixed += 1,
                CalculationType::Percentage => calculation_types.percentage += 1,
                CalculationType::Multiple => calculation_types.multiple += 1,
                CalculationType::Unrecognized => {}
            }
        }

        let mut top: Vec<&FeeRule> = newest_first
            .iter()
            .copied()
            .filter(|r| r.is_published())
            .collect();
        top.sort_by_key(|r| Reverse(r.condition_groups.len()));

        RuleStats {
            counts,
            total_published_amount: round_to_cents(total_published_amount),
            calculation_types,
            top: top.into_iter().take(SUMMARY_LIST_LEN).cloned().collect(),
            recent: newest_first
                .into_iter()
                .take(SUMMARY_LIST_LEN)
                .cloned()
                .collect(),
        }
    }
}

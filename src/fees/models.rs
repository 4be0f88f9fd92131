//! Fee Rule Domain Models
//!
//! Rules are authored outside the engine (REST API, seed file) and only read
//! during evaluation. Field names follow the JSON produced by the rule editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// How child results fold into their parent
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

/// Every condition type the engine knows how to evaluate.
///
/// Unknown tags are rejected when a rule is deserialized, so they never
/// reach evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Subtotal,
    SubtotalExTax,
    Tax,
    Quantity,
    Weight,
    ContainsProduct,
    Coupon,
    Country,
    State,
    City,
    Zipcode,
    CustomerTag,
    Collection,
    Stock,
    StockStatus,
    Width,
    Height,
    Length,
}

/// How a rule's amount turns into money
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    /// Flat amount
    Fixed,
    /// Percent of the cart subtotal
    Percentage,
    /// Amount per unit in the cart
    Multiple,
    /// Any tag the engine does not understand; computes to zero
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sign {
    #[default]
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

/// Publication state. Only published rules are ever applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    #[default]
    Draft,
    Published,
    /// Any other status coming from storage; treated as not published
    #[serde(other)]
    Inactive,
}

// =============================================================================
// Conditions
// =============================================================================

/// Value of a condition, kept in the shape it was authored in.
///
/// JSON numbers are accepted and stored in their textual form, so a
/// threshold written as `100` behaves like `"100"`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Single(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConditionValue {
    Single(Scalar),
    List(Vec<Scalar>),
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawConditionValue::deserialize(deserializer)? {
            RawConditionValue::Single(scalar) => ConditionValue::Single(scalar.into_text()),
            RawConditionValue::List(items) => {
                ConditionValue::List(items.into_iter().map(Scalar::into_text).collect())
            }
        })
    }
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Single(String::new())
    }
}

impl ConditionValue {
    /// The scalar form, if this value is a single string
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ConditionValue::Single(s) => Some(s),
            ConditionValue::List(_) => None,
        }
    }

    /// The sequence form, if this value is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConditionValue::Single(_) => None,
            ConditionValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(value: Vec<String>) -> Self {
        ConditionValue::List(value)
    }
}

/// A single comparison against one cart attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionType,
    pub operator: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: ConditionValue,
}

/// Stored conditions without a value carry `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<ConditionValue, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ConditionValue>::deserialize(deserializer)?.unwrap_or_default())
}

impl Condition {
    pub fn new(kind: ConditionType, operator: &str, value: impl Into<ConditionValue>) -> Self {
        Condition {
            kind,
            operator: operator.to_string(),
            value: value.into(),
        }
    }
}

/// Conditions sharing one combinator
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConditionGroup {
    #[serde(rename = "andOr", default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

// =============================================================================
// Rules
// =============================================================================

/// A merchant-authored conditional fee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeRule {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub calculation_type: CalculationType,
    #[serde(default)]
    pub sign: Sign,
    #[serde(default)]
    pub tax_class: Option<String>,
    #[serde(default)]
    pub status: RuleStatus,
    /// Lower values are applied first
    #[serde(default)]
    pub priority: i32,
    #[serde(default, alias = "parentAndOr")]
    pub group_combinator: Combinator,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
    /// Seeded rules without a timestamp are stamped when loaded
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl FeeRule {
    pub fn is_published(&self) -> bool {
        self.status == RuleStatus::Published
    }

    /// Flips a published rule back to draft; anything else gets published
    pub fn toggle_status(&mut self) {
        self.status = match self.status {
            RuleStatus::Published => RuleStatus::Draft,
            RuleStatus::Draft | RuleStatus::Inactive => RuleStatus::Published,
        };
    }

    /// Draft copy of this rule under a new id, conditions included
    pub fn duplicate(&self, id: String) -> FeeRule {
        FeeRule {
            id,
            title: format!("{} (Copy)", self.title),
            status: RuleStatus::Draft,
            created_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// Rule payload accepted by the authoring endpoints; the id is assigned by
/// the server
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRuleInput {
    pub title: String,
    pub amount: f64,
    pub calculation_type: CalculationType,
    #[serde(default)]
    pub sign: Sign,
    #[serde(default)]
    pub tax_class: Option<String>,
    #[serde(default)]
    pub status: RuleStatus,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, alias = "parentAndOr")]
    pub group_combinator: Combinator,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
}

impl FeeRuleInput {
    pub fn into_rule(self, id: String) -> FeeRule {
        FeeRule {
            id,
            title: self.title,
            amount: self.amount,
            calculation_type: self.calculation_type,
            sign: self.sign,
            tax_class: self.tax_class.filter(|t| !t.is_empty()),
            status: self.status,
            priority: self.priority,
            group_combinator: self.group_combinator,
            condition_groups: self.condition_groups,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// A rule selected for the current cart, with its computed amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicableFee<'a> {
    pub rule: &'a FeeRule,
    /// Signed, rounded to cents
    pub amount: f64,
}

/// Serializable view of an [`ApplicableFee`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeLine {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub tax_class: Option<String>,
}

impl From<&ApplicableFee<'_>> for FeeLine {
    fn from(fee: &ApplicableFee<'_>) -> Self {
        FeeLine {
            id: fee.rule.id.clone(),
            title: fee.rule.title.clone(),
            amount: fee.amount,
            tax_class: fee.rule.tax_class.clone(),
        }
    }
}

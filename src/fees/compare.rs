//! Comparison utilities used by the predicate evaluator.
//!
//! Operators arrive as strings from the rule editor. They are parsed into
//! small enums; an operator that does not parse makes the comparison false.

use std::str::FromStr;

/// Two amounts closer than this compare as equal. Prices and fees are
/// rounded to cents, so raw float equality would be too strict.
pub const EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Gte,
    Lte,
    Gt,
    Lt,
    Eq,
    Ne,
}

impl FromStr for NumericOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(NumericOp::Gte),
            "<=" => Ok(NumericOp::Lte),
            ">" => Ok(NumericOp::Gt),
            "<" => Ok(NumericOp::Lt),
            "==" => Ok(NumericOp::Eq),
            "!=" => Ok(NumericOp::Ne),
            _ => Err(()),
        }
    }
}

impl NumericOp {
    /// Applies the operator. NaN on either side is false for every operator.
    pub fn apply(self, actual: f64, expected: f64) -> bool {
        if actual.is_nan() || expected.is_nan() {
            return false;
        }
        match self {
            NumericOp::Gte => actual >= expected,
            NumericOp::Lte => actual <= expected,
            NumericOp::Gt => actual > expected,
            NumericOp::Lt => actual < expected,
            NumericOp::Eq => (actual - expected).abs() < EPSILON,
            NumericOp::Ne => (actual - expected).abs() >= EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Eq,
    Ne,
    Contains,
    NotContains,
}

impl FromStr for StringOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(StringOp::Eq),
            "!=" => Ok(StringOp::Ne),
            "contains" => Ok(StringOp::Contains),
            "not_contains" => Ok(StringOp::NotContains),
            _ => Err(()),
        }
    }
}

impl StringOp {
    /// Case-insensitive comparison
    pub fn apply(self, actual: &str, expected: &str) -> bool {
        let actual = actual.to_lowercase();
        let expected = expected.to_lowercase();
        match self {
            StringOp::Eq => actual == expected,
            StringOp::Ne => actual != expected,
            StringOp::Contains => actual.contains(&expected),
            StringOp::NotContains => !actual.contains(&expected),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    In,
    NotIn,
}

impl FromStr for SetOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(SetOp::In),
            "not_in" => Ok(SetOp::NotIn),
            _ => Err(()),
        }
    }
}

impl SetOp {
    /// `In` holds when any wanted value is present, `NotIn` when none is.
    ///
    /// An empty cart collection or an empty wanted list never matches: a
    /// rule cannot match on data it cannot observe.
    pub fn apply<S: AsRef<str>>(self, wanted: &[String], present: &[S]) -> bool {
        if wanted.is_empty() || present.is_empty() {
            return false;
        }
        let any_present = wanted
            .iter()
            .any(|w| present.iter().any(|p| p.as_ref() == w.as_str()));
        match self {
            SetOp::In => any_present,
            SetOp::NotIn => !any_present,
        }
    }
}

/// Compares two numbers with a textual operator
pub fn compare_numeric(actual: f64, operator: &str, expected: f64) -> bool {
    operator
        .parse::<NumericOp>()
        .map(|op| op.apply(actual, expected))
        .unwrap_or(false)
}

/// Compares two strings, ignoring case, with a textual operator
pub fn compare_string(actual: &str, operator: &str, expected: &str) -> bool {
    operator
        .parse::<StringOp>()
        .map(|op| op.apply(actual, expected))
        .unwrap_or(false)
}

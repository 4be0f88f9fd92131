//! REST API handlers for fee rule authoring

use super::models::{FeeRule, FeeRuleInput};
use super::stats::{sort_for_listing, RuleStats};
use crate::cart::state::SharedState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

/// Creates routes for fee rule operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/fees", get(list_rules).post(create_rule))
        .route("/fees/stats", get(rule_stats))
        .route("/fees/:id", get(get_rule).put(update_rule).delete(delete_rule))
        .route("/fees/:id/toggle", post(toggle_rule))
        .route("/fees/:id/duplicate", post(duplicate_rule))
}

/// Rejects rules the editor would not let a merchant save
pub fn validate_rule_input(input: &FeeRuleInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("Title is required".to_string()));
    }
    if !input.amount.is_finite() {
        return Err(AppError::InvalidRequest("Amount must be a finite number".to_string()));
    }
    Ok(())
}

/// Endpoint: GET /fees
/// Lists every rule by priority, newest first among equal priorities.
async fn list_rules(State(state): State<SharedState>) -> Json<Vec<FeeRule>> {
    let mut rules = state.rules_snapshot().await;
    sort_for_listing(&mut rules);
    Json(rules)
}

/// Endpoint: GET /fees/stats
async fn rule_stats(State(state): State<SharedState>) -> Json<RuleStats> {
    let rules = state.rules.read().await;
    Json(RuleStats::from_rules(&rules))
}

/// Endpoint: POST /fees
async fn create_rule(
    State(state): State<SharedState>,
    Json(input): Json<FeeRuleInput>,
) -> Result<(StatusCode, Json<FeeRule>), AppError> {
    validate_rule_input(&input)?;

    let rule = input.into_rule(Uuid::new_v4().simple().to_string());
    info!(rule_id = %rule.id, title = %rule.title, "fee rule created");

    state.rules.write().await.push(rule.clone());
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Endpoint: GET /fees/:id
async fn get_rule(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<FeeRule>, AppError> {
    state
        .rules
        .read()
        .await
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("fee rule {}", id)))
}

/// Endpoint: PUT /fees/:id
/// Replaces every field of the rule except its id and creation time.
async fn update_rule(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<FeeRuleInput>,
) -> Result<Json<FeeRule>, AppError> {
    validate_rule_input(&input)?;

    let mut rules = state.rules.write().await;
    let slot = rules
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound(format!("fee rule {}", id)))?;

    *slot = FeeRule {
        created_at: slot.created_at,
        ..input.into_rule(id)
    };
    info!(rule_id = %slot.id, "fee rule updated");
    Ok(Json(slot.clone()))
}

/// Endpoint: POST /fees/:id/toggle
/// Switches a rule between published and draft.
async fn toggle_rule(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<FeeRule>, AppError> {
    let mut rules = state.rules.write().await;
    let rule = rules
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound(format!("fee rule {}", id)))?;

    rule.toggle_status();
    info!(rule_id = %rule.id, status = ?rule.status, "fee rule status toggled");
    Ok(Json(rule.clone()))
}

/// Endpoint: POST /fees/:id/duplicate
/// Stores a draft copy of the rule under a fresh id.
async fn duplicate_rule(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FeeRule>), AppError> {
    let mut rules = state.rules.write().await;
    let copy = rules
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.duplicate(Uuid::new_v4().simple().to_string()))
        .ok_or_else(|| AppError::NotFound(format!("fee rule {}", id)))?;

    info!(rule_id = %copy.id, source = %id, "fee rule duplicated");
    rules.push(copy.clone());
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Endpoint: DELETE /fees/:id
async fn delete_rule(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut rules = state.rules.write().await;
    let before = rules.len();
    rules.retain(|r| r.id != id);

    if rules.len() == before {
        return Err(AppError::NotFound(format!("fee rule {}", id)));
    }

    info!(rule_id = %id, "fee rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> FeeRuleInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_validate_rule_input() {
        let ok = input(json!({ "title": "Handling", "amount": 2, "calculationType": "fixed" }));
        assert!(validate_rule_input(&ok).is_ok());

        let blank = input(json!({ "title": "  ", "amount": 2, "calculationType": "fixed" }));
        assert!(matches!(
            validate_rule_input(&blank),
            Err(AppError::InvalidRequest(_))
        ));

        let mut infinite = ok.clone();
        infinite.amount = f64::INFINITY;
        assert!(validate_rule_input(&infinite).is_err());
    }
}

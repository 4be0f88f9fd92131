//! Application State Management
//!
//! This module holds the carts synced by storefronts and the fee rules
//! authored through the API. Both live in memory only.

use super::models::CartSnapshot;
use crate::error::AppError;
use crate::fees::models::FeeRule;
use dashmap::DashMap;
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state containing carts and fee rules
pub struct AppState {
    /// In-memory storage for carts, keyed by cart_id.
    /// DashMap allows concurrent access without external Mutexes.
    pub carts: DashMap<String, CartSnapshot>,

    /// Fee rules in authoring order. Evaluation order is decided by the
    /// pipeline, not by this vector.
    pub rules: RwLock<Vec<FeeRule>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new AppState with no carts and no rules
    pub fn new() -> Self {
        Self::with_rules(Vec::new())
    }

    /// Creates a new AppState seeded with `rules`
    pub fn with_rules(rules: Vec<FeeRule>) -> Self {
        Self {
            carts: DashMap::new(),
            rules: RwLock::new(rules),
        }
    }

    /// Creates a new AppState seeded from a JSON file holding an array of
    /// fee rules
    pub async fn from_rules_file(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let rules: Vec<FeeRule> = serde_json::from_str(&raw)?;

        info!(count = rules.len(), path = %path.display(), "loaded fee rules");

        Ok(Self::with_rules(rules))
    }

    /// Copy of the current rule set, so evaluation happens outside the lock
    pub async fn rules_snapshot(&self) -> Vec<FeeRule> {
        self.rules.read().await.clone()
    }
}

//! Shopping Cart Domain Module
//!
//! This module contains everything the service knows about carts:
//! - Domain models (CartSnapshot, inputs, responses)
//! - Adapters building snapshots from client and storefront payloads
//! - Application state management
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;
pub mod storefront;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::CartSnapshot;
pub use state::{AppState, SharedState};

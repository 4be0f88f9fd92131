//! Flexible Fees Library
//!
//! This library provides a fee rule engine that decides which
//! merchant-defined fees apply to a shopping cart, and a small HTTP service
//! around it.

// Domain modules
pub mod cart;
pub mod fees;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;

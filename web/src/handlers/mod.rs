//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource.

pub mod events;
pub mod health;
pub mod metrics;
pub mod orders;

// Re-export common handler utilities
pub use health::health_check;

//! Business logic services for the analytics API.
//!
//! # Services
//!
//! - `analytics` - Report construction over the order store

pub mod analytics;

pub use analytics::{AnalyticsParams, AnalyticsQuery, AnalyticsReporter};

//! Tally Core - Shared domain types.
//!
//! This crate provides the types used across all Tally components:
//! - `admin` - Order analytics service (admin-only JSON API)
//! - `cli` - Command-line tools for migrations and reports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Anything that depends on the wall clock takes "now" as an
//! argument so callers (and tests) decide what time it is.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, order/user enums, currency rounding and date ranges

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Core types for Tally.
//!
//! This module provides type-safe wrappers for the order analytics domain.

pub mod date_range;
pub mod id;
pub mod money;
pub mod status;

pub use date_range::{RangeToken, resolve_range_start};
pub use id::*;
pub use money::round_to_cents;
pub use status::*;

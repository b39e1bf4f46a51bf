//! Tally admin analytics library.
//!
//! Read-only order analytics for store administrators, exposed as a JSON
//! API. The crate is a library so the router and reporter can be exercised
//! in tests against an in-memory order store.
//!
//! # Security
//!
//! Every analytics route requires an authenticated admin session. The
//! session is established by the login service and shared through the
//! `admin.session` table.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

//! Loanbook Core - Shared domain types.
//!
//! This crate provides the common types used across the Loanbook workspace:
//! - `server` - loan application service (lifecycle engine + API)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, loan statuses, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

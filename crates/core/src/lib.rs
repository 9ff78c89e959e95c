//! Bazaar Core - Shared types library.
//!
//! This crate provides the pure building blocks of the Bazaar cart UI,
//! shared by:
//! - `storefront` - Cart UI controller, HTTP cart client and page port
//! - `cli` - Command-line driver for the controller
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no page access. This keeps it lightweight and trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, quantities, prices and alert severities
//! - [`cookie`] - `document.cookie` string parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cookie;
pub mod types;

pub use cookie::get_cookie;
pub use types::*;

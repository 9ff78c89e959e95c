//! Bazaar storefront cart library.
//!
//! The cart UI controller, the page it drives and the HTTP client for the
//! cart service, packaged as a library so the CLI and the integration tests
//! can share them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod controller;
pub mod error;
pub mod page;

pub use cart::{CartService, CartSession, CartSnapshot, HttpCartService};
pub use config::{CartApiConfig, ConfigError, ControllerConfig, StorefrontConfig};
pub use controller::{ActionOutcome, CartUiController, ClickTarget, UiEvent};
pub use error::{CartError, Result};
pub use page::{MemoryPage, Page, PageSelectors};

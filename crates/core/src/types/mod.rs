//! Core types for Simpshopy.
//!
//! This module provides type-safe wrappers for the tenant-routing domain.

pub mod domain;
pub mod hostname;
pub mod id;
pub mod price;
pub mod product;
pub mod slug;
pub mod status;
pub mod store;

pub use domain::{DomainBinding, select_primary};
pub use hostname::{Hostname, HostnameError};
pub use id::*;
pub use price::{CurrencyCode, CurrencyParseError, Price};
pub use product::Product;
pub use slug::{Slug, SlugError};
pub use status::*;
pub use store::StoreTenant;

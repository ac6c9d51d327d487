//! Simpshopy Core - Shared types library.
//!
//! This crate provides the types shared by all Simpshopy components:
//! - `storefront` - Tenant-routing HTTP service
//! - `cli` - Command-line tools for migrations and routing diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. Anything that talks to the outside world lives in
//! the storefront crate behind a trait.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, hostnames, slugs, prices, statuses and the
//!   tenant entities (`StoreTenant`, `DomainBinding`, `Product`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Simpshopy storefront library.
//!
//! Resolves every inbound request's hostname (and path) to the platform or
//! to a tenant store, and serves a small JSON storefront API on top of that.
//! Exposed as a library so the CLI can reuse the resolver and tests can
//! drive the router directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tenancy;

#[cfg(test)]
pub(crate) mod testing;

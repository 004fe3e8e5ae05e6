//! # promptwright-remote
//!
//! Clients for remote prompt registries.

pub mod agenta;

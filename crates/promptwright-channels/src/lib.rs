//! # promptwright-channels
//!
//! Messaging platform integrations for Promptwright.

pub mod telegram;

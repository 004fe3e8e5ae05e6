//! # promptwright-core
//!
//! Core types, the prompt template pipeline, configuration, and error
//! handling for the Promptwright bot.

pub mod config;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod template;
pub mod traits;

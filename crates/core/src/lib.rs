//! Core types for tubeshelf
//!
//! This crate contains domain types shared across all other crates.

pub mod constants;
mod credential;
mod display;
mod env_config;
mod history;
mod identity;

pub use credential::*;
pub use display::*;
pub use env_config::*;
pub use history::*;
pub use identity::*;

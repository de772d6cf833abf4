//! # FIDS Domain
//!
//! Business domain types and models for the flight-information display.
//!
//! This crate contains:
//! - Flight legs, statuses and the pairing between departure and arrival
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Change events and reconciliation result types
//!
//! ## Architecture
//! - No dependencies on other FIDS crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

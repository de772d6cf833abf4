//! Flight persistence
//!
//! This module provides the repository port the engine reads and writes
//! flight legs through.

pub mod ports;

pub use ports::FlightRepository;

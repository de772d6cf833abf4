//! Flight store implementations

pub mod flight_repository;

pub use flight_repository::*;

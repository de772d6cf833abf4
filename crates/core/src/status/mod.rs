//! Pure status decisions
//!
//! - [`StatusCalculator`]: which status a leg should move to at a given time
//! - [`VisibilityFilter`]: whether a leg is hidden from public boards

pub mod calculator;
pub mod visibility;

pub use calculator::{StatusCalculator, StatusThresholds};
pub use visibility::{DisplayWindow, VisibilityFilter};

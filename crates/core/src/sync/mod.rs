//! Status synchronization between paired legs
//!
//! This module provides the [`SyncEngine`], the propagation matrix it applies
//! to the linked leg, and the per-pair lock registry that serializes updates
//! touching the same pair.

pub mod engine;
pub mod pair_locks;

pub use engine::{propagated_status, SyncEngine};
pub use pair_locks::PairLocks;

//! Real-time change notification adapters

pub mod broadcast;

pub use broadcast::{BroadcastNotifier, NotificationEnvelope, DEFAULT_CHANNEL_CAPACITY};

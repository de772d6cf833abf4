//! Notifier port for real-time change events

use fids_domain::Result;

/// Best-effort publisher consumed by the real-time display collaborator.
///
/// Implementations must not block. A failed publish is logged by the caller
/// and never rolls back the state change it describes.
pub trait Notifier: Send + Sync {
    /// Publish `payload` on `topic`.
    fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<()>;
}

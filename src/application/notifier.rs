// Notification port - transient user-facing banners
use std::time::Duration;

/// Shows a message for a bounded duration. Fire-and-forget; no return
/// value is consumed by the pipeline.
pub trait UserNotifier: Send + Sync {
    fn notify(&self, message: &str, duration: Duration);
}

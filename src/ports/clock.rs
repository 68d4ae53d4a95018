//! Clock port.

use crate::domain::foundation::Timestamp;

/// Source of "now" for session and prompt timestamps.
///
/// Injected so that durations can be made deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, time value objects, error types and the state
//! machine trait that the presence and watchdog modules build on.

mod elapsed;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use elapsed::format_hms;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChannelId, ChannelKey, GroupId, MemberId, MemberKey, PromptId, WatchId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

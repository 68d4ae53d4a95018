//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory implementations of every port (tests, single process)
//! - `logging` - Log-only notifier, actuator and status publisher
//! - `postgres` - PostgreSQL persistence (sqlx)
//! - `clock` - Tokio-driven and manual clocks
//! - `confirmation_board` - Outstanding prompts shared by notifier adapters
//! - `json_lines_source` - Presence events and answers read as JSON lines

mod clock;
mod confirmation_board;
mod json_lines_source;
pub mod logging;
pub mod memory;
pub mod postgres;

pub use clock::{ManualClock, TokioClock};
pub use confirmation_board::ConfirmationBoard;
pub use json_lines_source::{JsonLinesSource, SourceSummary};

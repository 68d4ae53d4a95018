//! State machine trait for status enums.
//!
//! Gives status enums a single place to declare their legal transitions and a
//! checked `transition_to` on top of it.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their valid transitions; `transition_to` and
/// `is_terminal` come for free.
///
/// ```ignore
/// let next = WatchState::Lonely.transition_to(WatchState::AwaitingConfirmation)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

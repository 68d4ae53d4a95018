//! Per-channel idle watch lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a channel stands in the idle/auto-mute cycle.
///
/// ```text
/// Normal ──(one occupant)──► Lonely ──(timer, still alone)──► AwaitingConfirmation
///   ▲                          │                                 │          │
///   └───(0 or ≥2 occupants)────┘◄────────(confirmed)─────────────┘          │
///   └──────────────────────────────(mute done)───── Muted ◄──(deadline)─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    Normal,
    Lonely,
    AwaitingConfirmation,
    Muted,
}

impl WatchState {
    /// True while a timer or a prompt is outstanding for the channel.
    pub fn is_armed(&self) -> bool {
        matches!(self, WatchState::Lonely | WatchState::AwaitingConfirmation)
    }
}

impl StateMachine for WatchState {
    fn valid_transitions(&self) -> Vec<Self> {
        use WatchState::*;
        match self {
            Normal => vec![Lonely],
            Lonely => vec![Normal, AwaitingConfirmation],
            AwaitingConfirmation => vec![Normal, Muted],
            Muted => vec![Normal],
        }
    }
}

impl std::fmt::Display for WatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchState::Normal => write!(f, "normal"),
            WatchState::Lonely => write!(f, "lonely"),
            WatchState::AwaitingConfirmation => write!(f, "awaiting_confirmation"),
            WatchState::Muted => write!(f, "muted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WatchState::*;

    const ALL: [WatchState; 4] = [Normal, Lonely, AwaitingConfirmation, Muted];

    #[test]
    fn lonely_can_escalate_or_reset() {
        assert_eq!(Lonely.transition_to(AwaitingConfirmation), Ok(AwaitingConfirmation));
        assert_eq!(Lonely.transition_to(Normal), Ok(Normal));
    }

    #[test]
    fn normal_cannot_jump_to_mute() {
        assert!(Normal.transition_to(Muted).is_err());
        assert!(Normal.transition_to(AwaitingConfirmation).is_err());
    }

    #[test]
    fn lonely_cannot_mute_without_prompt() {
        assert!(Lonely.transition_to(Muted).is_err());
    }

    #[test]
    fn muted_only_returns_to_normal() {
        assert_eq!(Muted.valid_transitions(), vec![Normal]);
    }

    #[test]
    fn no_state_is_terminal() {
        for state in ALL {
            assert!(!state.is_terminal(), "{:?} should not be terminal", state);
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in ALL {
            for target in ALL {
                assert_eq!(
                    state.can_transition_to(&target),
                    state.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }

    #[test]
    fn armed_states() {
        assert!(Lonely.is_armed());
        assert!(AwaitingConfirmation.is_armed());
        assert!(!Normal.is_armed());
        assert!(!Muted.is_armed());
    }
}

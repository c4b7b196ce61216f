// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{PromptGuardError, PromptGuardResult};
use std::sync::{Arc,
                atomic::{AtomicU8, Ordering}};
use strum_macros::{Display, EnumIter, FromRepr};

/// ```text
///            start()            pause()
/// Inactive ──────────► Active ──────────► Suspended
///    ▲                 │  ▲                 │
///    │     stop()      │  └─────────────────┘
///    ├─────────────────┘       resume()     │
///    │                                      │
///    └──────────────────────────────────────┘
///                    stop()
/// ```
///
/// - [`Self::Inactive`]: bindings are the originals. Initial state, and where `stop()`
///   lands. Restartable.
/// - [`Self::Active`]: bindings are installed and resolve to the intercepted devices.
/// - [`Self::Suspended`]: bindings are still installed, but resolve to the originals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, FromRepr)]
#[repr(u8)]
pub enum LifecycleState {
    #[default]
    Inactive,
    Active,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Stop,
}

impl Transition {
    /// Describes which precondition failed when this transition is rejected.
    #[must_use]
    pub fn precondition_message(&self) -> &'static str {
        match self {
            Transition::Start => "interface already started",
            Transition::Pause => "interface stopped or already paused",
            Transition::Resume => "interface not paused",
            Transition::Stop => "interface already stopped",
        }
    }
}

impl LifecycleState {
    /// Returns the state reached by applying `transition`. Pure: callers decide when to
    /// commit the new state, so a rejected transition leaves nothing mutated.
    ///
    /// # Errors
    ///
    /// Returns [`PromptGuardError::IllegalTransition`] if `transition` is not allowed
    /// from `self`. No transition goes from a state to itself.
    pub fn apply(self, transition: Transition) -> PromptGuardResult<LifecycleState> {
        match (self, transition) {
            (LifecycleState::Inactive, Transition::Start)
            | (LifecycleState::Suspended, Transition::Resume) => Ok(LifecycleState::Active),
            (LifecycleState::Active, Transition::Pause) => Ok(LifecycleState::Suspended),
            (LifecycleState::Active | LifecycleState::Suspended, Transition::Stop) => {
                Ok(LifecycleState::Inactive)
            }
            (from, transition) => {
                Err(PromptGuardError::IllegalTransition { transition, from })
            }
        }
    }

    /// `true` while bindings are installed (whether or not they are suspended).
    #[must_use]
    pub fn is_installed(self) -> bool { self != LifecycleState::Inactive }
}

/// The one piece of mutable state that computed bindings read. Every read goes to the
/// atomic, so a binding never sees a stale state.
#[derive(Debug, Clone, Default)]
pub struct SharedLifecycleState(Arc<AtomicU8>);

impl SharedLifecycleState {
    #[must_use]
    pub fn new(state: LifecycleState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    #[must_use]
    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_repr(self.0.load(Ordering::SeqCst)).unwrap_or_default()
    }

    pub fn set(&self, state: LifecycleState) { self.0.store(state as u8, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(LifecycleState::Inactive, Transition::Start, Some(LifecycleState::Active))]
    #[test_case(LifecycleState::Inactive, Transition::Pause, None)]
    #[test_case(LifecycleState::Inactive, Transition::Resume, None)]
    #[test_case(LifecycleState::Inactive, Transition::Stop, None)]
    #[test_case(LifecycleState::Active, Transition::Start, None)]
    #[test_case(LifecycleState::Active, Transition::Pause, Some(LifecycleState::Suspended))]
    #[test_case(LifecycleState::Active, Transition::Resume, None)]
    #[test_case(LifecycleState::Active, Transition::Stop, Some(LifecycleState::Inactive))]
    #[test_case(LifecycleState::Suspended, Transition::Start, None)]
    #[test_case(LifecycleState::Suspended, Transition::Pause, None)]
    #[test_case(LifecycleState::Suspended, Transition::Resume, Some(LifecycleState::Active))]
    #[test_case(LifecycleState::Suspended, Transition::Stop, Some(LifecycleState::Inactive))]
    fn test_transition_table(
        from: LifecycleState,
        transition: Transition,
        expected: Option<LifecycleState>,
    ) {
        match (from.apply(transition), expected) {
            (Ok(to), Some(expected)) => assert_eq!(to, expected),
            (
                Err(PromptGuardError::IllegalTransition {
                    transition: t,
                    from: f,
                }),
                None,
            ) => {
                assert_eq!(t, transition);
                assert_eq!(f, from);
            }
            (actual, expected) => panic!("{from} {transition}: {actual:?} != {expected:?}"),
        }
    }

    #[test]
    fn test_no_transition_is_a_self_loop() {
        for from in LifecycleState::iter() {
            for transition in Transition::iter() {
                if let Ok(to) = from.apply(transition) {
                    assert_ne!(from, to, "{transition} from {from}");
                }
            }
        }
    }

    #[test]
    fn test_shared_lifecycle_state_is_seen_by_all_clones() {
        let state = SharedLifecycleState::default();
        let clone = state.clone();
        assert_eq!(clone.get(), LifecycleState::Inactive);

        for it in LifecycleState::iter() {
            state.set(it);
            assert_eq!(clone.get(), it);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::Suspended.to_string(), "Suspended");
        assert_eq!(Transition::Resume.to_string(), "resume");
        assert!(!LifecycleState::Inactive.is_installed());
        assert!(LifecycleState::Suspended.is_installed());
    }
}

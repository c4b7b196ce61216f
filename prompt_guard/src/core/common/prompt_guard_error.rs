// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Error taxonomy for this crate.
//!
//! | Variant                 | Cause                                                  | Kind   |
//! |-------------------------|--------------------------------------------------------|--------|
//! | [`IllegalTransition`]   | Lifecycle method called from the wrong state           | Misuse |
//! | [`MissingSlot`]         | A binding slot that must exist is not in the registry  | Misuse |
//! | [`ReadOnlySlot`]        | Assignment to a slot that is managed by a guard        | Misuse |
//! | [`SlotTypeMismatch`]    | Typed accessor used on a slot holding the other kind   | Misuse |
//! | [`Io`]                  | The underlying device failed                           | I/O    |
//!
//! Misuse errors are never retried. An operation that returns one of them has not
//! mutated anything: the lifecycle state and every binding slot are exactly as they were
//! before the call.
//!
//! [`IllegalTransition`]: PromptGuardError::IllegalTransition
//! [`MissingSlot`]: PromptGuardError::MissingSlot
//! [`ReadOnlySlot`]: PromptGuardError::ReadOnlySlot
//! [`SlotTypeMismatch`]: PromptGuardError::SlotTypeMismatch
//! [`Io`]: PromptGuardError::Io

use crate::{LifecycleState, SlotKind, SlotName, Transition};

pub type PromptGuardResult<T> = Result<T, PromptGuardError>;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PromptGuardError {
    #[error("can't {transition} prompt guard from state {from}: {}", .transition.precondition_message())]
    #[diagnostic(
        code(r3bl_prompt_guard::lifecycle::illegal_transition),
        help(
            "Legal transitions: start (Inactive), pause (Active), resume (Suspended), \
             stop (Active or Suspended)."
        )
    )]
    IllegalTransition {
        transition: Transition,
        from: LifecycleState,
    },

    #[error("binding slot '{name}' does not exist")]
    #[diagnostic(
        code(r3bl_prompt_guard::bindings::missing_slot),
        help("Define the slot in the BindingRegistry before starting a prompt guard on it.")
    )]
    MissingSlot { name: SlotName },

    #[error("binding slot '{name}' is read-only while a prompt guard manages it")]
    #[diagnostic(
        code(r3bl_prompt_guard::bindings::read_only_slot),
        help("Stop the prompt guard first, then assign the slot.")
    )]
    ReadOnlySlot { name: SlotName },

    #[error("binding slot '{name}' holds a {found}, expected a {expected}")]
    #[diagnostic(code(r3bl_prompt_guard::bindings::slot_type_mismatch))]
    SlotTypeMismatch {
        name: SlotName,
        expected: SlotKind,
        found: SlotKind,
    },

    #[error(transparent)]
    #[diagnostic(code(r3bl_prompt_guard::io))]
    Io(#[from] std::io::Error),
}

impl From<PromptGuardError> for std::io::Error {
    fn from(error: PromptGuardError) -> Self {
        match error {
            PromptGuardError::Io(it) => it,
            other => std::io::Error::other(other),
        }
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Binding, BindingRegistry, InlineVec, LifecycleState, PromptGuardError,
            PromptGuardResult, SharedLifecycleState, SlotName, SlotValue, Transition};
use smallvec::smallvec;
use tracing::debug;

/// One slot to take over: `base` is what it resolves to while suspended, `wrapped` is
/// what it resolves to while active.
#[derive(Debug, Clone)]
pub struct SlotRedirect {
    pub name: SlotName,
    pub base: SlotValue,
    pub wrapped: SlotValue,
}

/// Installs and removes the computed bindings of a [`crate::PromptGuard`].
///
/// - [`Self::activate()`] captures each slot's current descriptor, then replaces it with
///   a read-only computed binding that reads the lifecycle state on every resolve.
/// - [`Self::deactivate()`] puts the captured descriptors back exactly, including any
///   getter or setter they had.
#[derive(Debug)]
pub struct BindingSwapper {
    pub registry: BindingRegistry,
    captured: Option<InlineVec<(SlotName, Binding)>>,
}

impl BindingSwapper {
    #[must_use]
    pub fn new(registry: BindingRegistry) -> Self {
        Self {
            registry,
            captured: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool { self.captured.is_some() }

    /// All slots are checked before any is touched, and the whole swap happens under one
    /// lock of the registry, so either every slot is swapped or none is.
    ///
    /// # Errors
    ///
    /// - [`PromptGuardError::MissingSlot`] if any slot does not exist.
    /// - [`PromptGuardError::IllegalTransition`] if already active.
    pub fn activate(
        &mut self,
        redirects: &[SlotRedirect],
        state: &SharedLifecycleState,
    ) -> PromptGuardResult<()> {
        if self.is_active() {
            return Err(PromptGuardError::IllegalTransition {
                transition: Transition::Start,
                from: LifecycleState::Active,
            });
        }

        let captured = {
            let mut slots = self.registry.lock_slots();

            if let Some(it) = redirects.iter().find(|it| !slots.contains_key(&it.name)) {
                return Err(PromptGuardError::MissingSlot {
                    name: it.name.clone(),
                });
            }

            let mut captured: InlineVec<(SlotName, Binding)> = smallvec![];
            for redirect in redirects {
                let computed = computed_redirect(redirect, state);
                if let Some(original) = slots.insert(redirect.name.clone(), computed) {
                    captured.push((redirect.name.clone(), original));
                }
            }
            captured
        };

        debug!(
            message = "Installed computed bindings",
            slots = ?captured.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>()
        );
        self.captured = Some(captured);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PromptGuardError::IllegalTransition`] if not active.
    pub fn deactivate(&mut self) -> PromptGuardResult<()> {
        let Some(captured) = self.captured.take() else {
            return Err(PromptGuardError::IllegalTransition {
                transition: Transition::Stop,
                from: LifecycleState::Inactive,
            });
        };

        let count = captured.len();
        {
            let mut slots = self.registry.lock_slots();
            for (name, original) in captured {
                slots.insert(name, original);
            }
        }

        debug!(message = "Restored original bindings", count);
        Ok(())
    }
}

fn computed_redirect(redirect: &SlotRedirect, state: &SharedLifecycleState) -> Binding {
    let base = redirect.base.clone();
    let wrapped = redirect.wrapped.clone();
    let state = state.clone();
    Binding::computed(move || match state.get() {
        LifecycleState::Suspended => base.clone(),
        LifecycleState::Active | LifecycleState::Inactive => wrapped.clone(),
    })
}

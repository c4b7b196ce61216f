// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Binding, Console, OutputDevice, PromptGuardError, PromptGuardResult, SlotKind,
            SlotName, SlotValue, StdMutex};
use std::{collections::HashMap,
          fmt::{Debug, Formatter},
          sync::{Arc, LazyLock, MutexGuard, PoisonError}};

static GLOBAL_REGISTRY: LazyLock<BindingRegistry> =
    LazyLock::new(BindingRegistry::with_process_defaults);

/// An explicit indirection table of named slots. Code that wants its output to cooperate
/// with a [`crate::PromptGuard`] asks the registry for the *current* channel at each
/// write (see [`crate::slot_println!`], [`crate::SlotWriter`]) instead of holding on to
/// a device.
///
/// It is safe to clone. Clones share the same table.
///
/// Getters and setters of computed bindings are always called *after* the table lock is
/// released, so they may use the registry themselves.
#[derive(Clone, Default)]
pub struct BindingRegistry {
    slots: Arc<StdMutex<HashMap<SlotName, Binding>>>,
}

impl Debug for BindingRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<SlotName> = self.lock_slots().keys().cloned().collect();
        names.sort();
        f.debug_struct("BindingRegistry")
            .field("slots", &names)
            .finish()
    }
}

impl BindingRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A registry with [`SlotName::STDOUT`], [`SlotName::STDERR`] and
    /// [`SlotName::CONSOLE`] bound to the process `stdout` and `stderr`.
    #[must_use]
    pub fn with_process_defaults() -> Self {
        Self::with_channels(OutputDevice::new_stdout(), OutputDevice::new_stderr())
    }

    /// A registry with the three well known slots bound to the given channels.
    #[must_use]
    pub fn with_channels(stdout: OutputDevice, stderr: OutputDevice) -> Self {
        let it = Self::new();
        let console = Console::new(stdout.clone(), stderr.clone());
        it.define(SlotName::STDOUT, SlotValue::Channel(stdout));
        it.define(SlotName::STDERR, SlotValue::Channel(stderr));
        it.define(SlotName::CONSOLE, SlotValue::Console(console));
        it
    }

    /// The process wide registry, populated lazily on first use with
    /// [`Self::with_process_defaults()`].
    #[must_use]
    pub fn global() -> Self { GLOBAL_REGISTRY.clone() }

    /// `true` if both handles share the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &BindingRegistry) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    pub(crate) fn lock_slots(&self) -> MutexGuard<'_, HashMap<SlotName, Binding>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BindingRegistry {
    /// Creates the slot, or replaces its descriptor. This is the low level operation
    /// that bypasses setters.
    pub fn define(&self, name: SlotName, binding: impl Into<Binding>) {
        self.lock_slots().insert(name, binding.into());
    }

    /// The current descriptor of the slot (not its value).
    #[must_use]
    pub fn descriptor(&self, name: &SlotName) -> Option<Binding> {
        self.lock_slots().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &SlotName) -> bool { self.lock_slots().contains_key(name) }

    /// The value the slot has *now*. Nothing is cached: a computed binding's getter is
    /// called on every resolve.
    ///
    /// # Errors
    ///
    /// Returns [`PromptGuardError::MissingSlot`] if the slot does not exist.
    pub fn resolve(&self, name: &SlotName) -> PromptGuardResult<SlotValue> {
        let binding = self.descriptor(name).ok_or_else(|| missing(name))?;
        Ok(binding.get())
    }

    /// Assigns a new value, like a plain assignment to the slot would. A computed binding
    /// passes the value to its setter.
    ///
    /// # Errors
    ///
    /// - [`PromptGuardError::MissingSlot`] if the slot does not exist.
    /// - [`PromptGuardError::ReadOnlySlot`] if the slot is computed without a setter,
    ///   which is the case while a [`crate::PromptGuard`] manages it.
    pub fn assign(&self, name: &SlotName, value: SlotValue) -> PromptGuardResult<()> {
        let setter = {
            let mut slots = self.lock_slots();
            match slots.get_mut(name) {
                None => return Err(missing(name)),
                Some(Binding::Value(it)) => {
                    *it = value;
                    return Ok(());
                }
                Some(Binding::Computed {
                    setter: Some(setter),
                    ..
                }) => setter.clone(),
                Some(Binding::Computed { setter: None, .. }) => {
                    return Err(PromptGuardError::ReadOnlySlot { name: name.clone() });
                }
            }
        };
        setter(value);
        Ok(())
    }
}

impl BindingRegistry {
    /// # Errors
    ///
    /// Returns an error if the slot does not exist or does not hold a channel.
    pub fn channel(&self, name: &SlotName) -> PromptGuardResult<OutputDevice> {
        match self.resolve(name)? {
            SlotValue::Channel(it) => Ok(it),
            other => Err(mismatch(name, SlotKind::Channel, other.kind())),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the slot does not exist or does not hold a [`Console`].
    pub fn console_in(&self, name: &SlotName) -> PromptGuardResult<Console> {
        match self.resolve(name)? {
            SlotValue::Console(it) => Ok(it),
            other => Err(mismatch(name, SlotKind::Console, other.kind())),
        }
    }

    /// # Errors
    ///
    /// Returns an error if [`SlotName::STDOUT`] is missing or is not a channel.
    pub fn stdout(&self) -> PromptGuardResult<OutputDevice> { self.channel(&SlotName::STDOUT) }

    /// # Errors
    ///
    /// Returns an error if [`SlotName::STDERR`] is missing or is not a channel.
    pub fn stderr(&self) -> PromptGuardResult<OutputDevice> { self.channel(&SlotName::STDERR) }

    /// # Errors
    ///
    /// Returns an error if [`SlotName::CONSOLE`] is missing or is not a console.
    pub fn console(&self) -> PromptGuardResult<Console> { self.console_in(&SlotName::CONSOLE) }
}

fn missing(name: &SlotName) -> PromptGuardError {
    PromptGuardError::MissingSlot { name: name.clone() }
}

fn mismatch(name: &SlotName, expected: SlotKind, found: SlotKind) -> PromptGuardError {
    PromptGuardError::SlotTypeMismatch {
        name: name.clone(),
        expected,
        found,
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Console, OutputDevice};
use std::{fmt::{Debug, Formatter},
          sync::Arc};
use strum_macros::Display;

/// What a slot resolves to.
#[derive(Debug, Clone)]
pub enum SlotValue {
    Channel(OutputDevice),
    Console(Console),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SlotKind {
    #[strum(serialize = "channel")]
    Channel,
    #[strum(serialize = "console")]
    Console,
}

impl SlotValue {
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotValue::Channel(_) => SlotKind::Channel,
            SlotValue::Console(_) => SlotKind::Console,
        }
    }

    /// `true` if both values write into the same sinks.
    #[must_use]
    pub fn ptr_eq(&self, other: &SlotValue) -> bool {
        match (self, other) {
            (SlotValue::Channel(lhs), SlotValue::Channel(rhs)) => lhs.ptr_eq(rhs),
            (SlotValue::Console(lhs), SlotValue::Console(rhs)) => lhs.ptr_eq(rhs),
            _ => false,
        }
    }
}

impl From<OutputDevice> for SlotValue {
    fn from(device: OutputDevice) -> Self { SlotValue::Channel(device) }
}

impl From<Console> for SlotValue {
    fn from(console: Console) -> Self { SlotValue::Console(console) }
}

pub type SlotGetter = Arc<dyn Fn() -> SlotValue + Send + Sync>;
pub type SlotSetter = Arc<dyn Fn(SlotValue) + Send + Sync>;

/// The descriptor of a slot: either a plain value, or a getter (and optional setter)
/// that is called on every access. Cloning a descriptor shares its getter and setter,
/// so a captured descriptor can be put back exactly as it was.
#[derive(Clone)]
pub enum Binding {
    Value(SlotValue),
    Computed {
        getter: SlotGetter,
        setter: Option<SlotSetter>,
    },
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Computed { setter, .. } => f
                .debug_struct("Computed")
                .field("has_setter", &setter.is_some())
                .finish_non_exhaustive(),
        }
    }
}

impl Binding {
    pub fn computed(getter: impl Fn() -> SlotValue + Send + Sync + 'static) -> Self {
        Binding::Computed {
            getter: Arc::new(getter),
            setter: None,
        }
    }

    pub fn computed_with_setter(
        getter: impl Fn() -> SlotValue + Send + Sync + 'static,
        setter: impl Fn(SlotValue) + Send + Sync + 'static,
    ) -> Self {
        Binding::Computed {
            getter: Arc::new(getter),
            setter: Some(Arc::new(setter)),
        }
    }

    /// The current value. A computed binding calls its getter every time.
    #[must_use]
    pub fn get(&self) -> SlotValue {
        match self {
            Binding::Value(value) => value.clone(),
            Binding::Computed { getter, .. } => getter(),
        }
    }

    /// Descriptor identity: same plain value, or same getter and setter.
    #[must_use]
    pub fn ptr_eq(&self, other: &Binding) -> bool {
        match (self, other) {
            (Binding::Value(lhs), Binding::Value(rhs)) => lhs.ptr_eq(rhs),
            (
                Binding::Computed {
                    getter: lhs_getter,
                    setter: lhs_setter,
                },
                Binding::Computed {
                    getter: rhs_getter,
                    setter: rhs_setter,
                },
            ) => {
                Arc::ptr_eq(lhs_getter, rhs_getter)
                    && match (lhs_setter, rhs_setter) {
                        (None, None) => true,
                        (Some(lhs), Some(rhs)) => Arc::ptr_eq(lhs, rhs),
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

impl From<SlotValue> for Binding {
    fn from(value: SlotValue) -> Self { Binding::Value(value) }
}

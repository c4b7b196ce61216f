// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{borrow::Cow,
          fmt::{Display, Formatter}};

/// Name of a slot in a [`crate::BindingRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotName(pub Cow<'static, str>);

impl SlotName {
    /// The current primary output channel.
    pub const STDOUT: SlotName = SlotName(Cow::Borrowed("stdout"));
    /// The current error output channel.
    pub const STDERR: SlotName = SlotName(Cow::Borrowed("stderr"));
    /// The current logging façade, a [`crate::Console`].
    pub const CONSOLE: SlotName = SlotName(Cow::Borrowed("console"));

    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for SlotName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl From<&'static str> for SlotName {
    fn from(name: &'static str) -> Self { SlotName(Cow::Borrowed(name)) }
}

impl From<String> for SlotName {
    fn from(name: String) -> Self { SlotName(Cow::Owned(name)) }
}

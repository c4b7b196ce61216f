// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Debug, Formatter};

pub type LineHandler = Box<dyn FnMut(&str)>;
pub type CloseHandler = Box<dyn FnMut()>;

/// Run in registration order for every line received.
pub enum LineListener {
    Handler(LineHandler),
    /// Show the prompt again (registered by [`crate::PromptGuard::prompt_loop()`]).
    Reprompt,
}

/// Run in registration order when the input source closes.
pub enum CloseListener {
    Handler(CloseHandler),
    /// Stop the guard, unless it is already stopped (registered by
    /// [`crate::PromptGuard::create_interface()`]).
    StopGuard,
}

impl Debug for LineListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LineListener::Handler(_) => write!(f, "Handler"),
            LineListener::Reprompt => write!(f, "Reprompt"),
        }
    }
}

impl Debug for CloseListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseListener::Handler(_) => write!(f, "Handler"),
            CloseListener::StopGuard => write!(f, "StopGuard"),
        }
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Completer, StdMutex};
use std::{io,
          sync::{Arc, MutexGuard, PoisonError, Weak}};

/// The line editing collaborator. It owns the prompt text and whatever the user has
/// typed so far, and knows how to draw both on its own output device.
///
/// This crate never edits lines itself. It only needs to:
/// 1. Change and show the prompt ([`Self::set_prompt()`], [`Self::prompt()`]).
/// 2. Redraw the prompt and the partial input after some other output disturbed it
///    ([`Self::refresh_line()`]). This is called after every intercepted write.
/// 3. Tell the editor that a complete line was received ([`Self::line_received()`]).
///
/// The editor must draw on the *original* (unwrapped) output device. Drawing on an
/// intercepted device would re-enter the interceptor.
pub trait LineEditor: Send {
    fn set_prompt(&mut self, prompt: &str);

    fn get_prompt(&self) -> &str;

    /// Show the prompt now.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output device fails.
    fn prompt(&mut self) -> io::Result<()>;

    /// Re-render the prompt and any partially typed input on the current line. Must be
    /// safe to call in every editor state: no prompt shown yet, empty input, etc.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output device fails.
    fn refresh_line(&mut self) -> io::Result<()>;

    /// A complete line was read from the input source.
    fn line_received(&mut self, line: &str);

    fn completer(&self) -> Option<&Completer>;
}

/// Shared handle to a [`LineEditor`]. [`crate::PromptGuard`] owns one of these.
pub type SafeLineEditor = Arc<StdMutex<dyn LineEditor>>;

/// Non-owning handle to a [`LineEditor`], held by each [`crate::InterceptedWriter`].
pub type WeakLineEditor = Weak<StdMutex<dyn LineEditor>>;

/// Locks the line editor. A poisoned lock is recovered rather than propagated.
pub fn lock_line_editor(line_editor: &SafeLineEditor) -> MutexGuard<'_, dyn LineEditor + 'static> {
    line_editor.lock().unwrap_or_else(PoisonError::into_inner)
}

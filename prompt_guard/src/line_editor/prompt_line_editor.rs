// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Completer, LineEditor, LockedOutputDevice, OutputDevice, SafeLineEditor,
            StdMutex, lock_output_device_as_mut};
use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                style::Print,
                terminal::{Clear, ClearType}};
use std::{io, sync::Arc};

pub const DEFAULT_PROMPT: &str = "> ";

/// A minimal [`LineEditor`] for cooked mode terminals. The terminal itself echoes what
/// the user types, so [`Self::line`] is only known when the program sets it with
/// [`Self::set_line()`]. Rendering is:
/// 1. Move the caret to column 0.
/// 2. Clear from the caret down.
/// 3. Print the prompt, then the partial line.
///
/// It must be given the *original* output device, never an intercepted one.
#[derive(Debug)]
pub struct PromptLineEditor {
    pub output_device: OutputDevice,
    pub prompt: String,
    pub line: String,
    pub completer: Option<Completer>,
}

impl PromptLineEditor {
    #[must_use]
    pub fn new(output_device: OutputDevice, prompt: &str) -> Self {
        Self {
            output_device,
            prompt: prompt.to_owned(),
            line: String::new(),
            completer: None,
        }
    }

    #[must_use]
    pub fn with_completer(mut self, completer: Option<Completer>) -> Self {
        self.completer = completer;
        self
    }

    /// Shares this editor so it can be handed to [`crate::PromptGuard`].
    #[must_use]
    pub fn into_safe(self) -> SafeLineEditor { Arc::new(StdMutex::new(self)) }

    pub fn set_line(&mut self, line: &str) { line.clone_into(&mut self.line); }

    #[must_use]
    pub fn line(&self) -> &str { &self.line }

    fn render(&self) -> io::Result<()> {
        let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(self.output_device);
        term.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::FromCursorDown))?
            .queue(Print(&self.prompt))?
            .queue(Print(&self.line))?;
        term.flush()
    }
}

impl LineEditor for PromptLineEditor {
    fn set_prompt(&mut self, prompt: &str) { prompt.clone_into(&mut self.prompt); }

    fn get_prompt(&self) -> &str { &self.prompt }

    fn prompt(&mut self) -> io::Result<()> { self.render() }

    fn refresh_line(&mut self) -> io::Result<()> { self.render() }

    fn line_received(&mut self, _line: &str) { self.line.clear(); }

    fn completer(&self) -> Option<&Completer> { self.completer.as_ref() }
}

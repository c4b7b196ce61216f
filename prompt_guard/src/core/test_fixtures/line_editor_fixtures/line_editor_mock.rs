// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Completer, LineEditor, LockedOutputDevice, OutputDevice, SafeLineEditor,
            StdMutex, lock_output_device_as_mut};
use std::{io,
          sync::{Arc, PoisonError}};

pub const REDRAW_MARKER: &str = "<redraw>";
pub const PROMPT_MARKER: &str = "<prompt>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditorCall {
    SetPrompt(String),
    Prompt,
    RefreshLine,
    LineReceived(String),
}

/// A [`LineEditor`] that records every call made to it. If it is given a marker device,
/// [`LineEditor::refresh_line()`] writes [`REDRAW_MARKER`] and [`LineEditor::prompt()`]
/// writes [`PROMPT_MARKER`] to it, so a test can check *where* in the output stream the
/// redraw happened.
///
/// You can safely clone this struct. Clones share the same call log.
#[derive(Debug, Clone)]
pub struct LineEditorMock {
    pub calls: Arc<StdMutex<Vec<LineEditorCall>>>,
    pub prompt: String,
    pub marker_device: Option<OutputDevice>,
    pub completer: Option<Completer>,
}

impl Default for LineEditorMock {
    fn default() -> Self { Self::new(None) }
}

impl LineEditorMock {
    #[must_use]
    pub fn new(marker_device: Option<OutputDevice>) -> Self {
        Self {
            calls: Arc::new(StdMutex::new(Vec::new())),
            prompt: String::new(),
            marker_device,
            completer: None,
        }
    }

    /// Returns the mock (to inspect calls), and the shared handle to give to the code
    /// under test.
    #[must_use]
    pub fn new_safe(marker_device: Option<OutputDevice>) -> (Self, SafeLineEditor) {
        let mock = Self::new(marker_device);
        let safe: SafeLineEditor = Arc::new(StdMutex::new(mock.clone()));
        (mock, safe)
    }

    #[must_use]
    pub fn get_copy_of_calls(&self) -> Vec<LineEditorCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn count(&self, call: &LineEditorCall) -> usize {
        self.get_copy_of_calls()
            .iter()
            .filter(|it| *it == call)
            .count()
    }

    fn record(&self, call: LineEditorCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn write_marker(&self, marker: &str) -> io::Result<()> {
        let Some(device) = &self.marker_device else {
            return Ok(());
        };
        let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
        term.write_all(marker.as_bytes())
    }
}

impl LineEditor for LineEditorMock {
    fn set_prompt(&mut self, prompt: &str) {
        prompt.clone_into(&mut self.prompt);
        self.record(LineEditorCall::SetPrompt(prompt.to_owned()));
    }

    fn get_prompt(&self) -> &str { &self.prompt }

    fn prompt(&mut self) -> io::Result<()> {
        self.record(LineEditorCall::Prompt);
        self.write_marker(PROMPT_MARKER)
    }

    fn refresh_line(&mut self) -> io::Result<()> {
        self.record(LineEditorCall::RefreshLine);
        self.write_marker(REDRAW_MARKER)
    }

    fn line_received(&mut self, line: &str) {
        self.record(LineEditorCall::LineReceived(line.to_owned()));
    }

    fn completer(&self) -> Option<&Completer> { self.completer.as_ref() }
}

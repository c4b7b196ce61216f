// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LockedOutputDevice, OutputDevice, SafeLineEditor, StdMutex, WeakLineEditor,
            lock_line_editor, lock_output_device_as_mut};
use std::{fmt::{Debug, Formatter},
          io::{self, Write},
          sync::Arc};
use uuid::Uuid;

/// `ESC [2K` erases the whole display line, `\r` returns the caret to column 0.
pub const CLEAR_LINE_AND_RETURN: &str = "\x1b[2K\r";

/// Delegating adapter around an [`OutputDevice`]. Every write call does, in order:
/// 1. Write [`CLEAR_LINE_AND_RETURN`] to the inner device.
/// 2. Write the payload to the inner device, unchanged.
/// 3. Call [`crate::LineEditor::refresh_line()`].
///
/// Steps 1 and 2 happen under one lock of the inner device, which is released before
/// step 3, since the line editor draws on that same device.
///
/// A zero length write is not special cased: it still clears and redraws.
///
/// Only `write`, `write_all` and `write_fmt` are intercepted. Each one is *one* write
/// call from the caller's point of view, so `writeln!(writer, "{a} {b}")` produces
/// exactly one clear and one redraw, not one per formatted fragment. `flush` is passed
/// through.
///
/// Step 3 always runs, even when step 1 or 2 fails, so the prompt is never left erased.
/// A payload error is returned unchanged. A redraw error is returned only if the
/// payload made it out. If the line editor has been dropped, step 3 is a no-op.
pub struct InterceptedWriter {
    pub inner: OutputDevice,
    pub line_editor: WeakLineEditor,
    pub id: Uuid,
}

impl Debug for InterceptedWriter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptedWriter")
            .field("inner", &self.inner)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl InterceptedWriter {
    #[must_use]
    pub fn new(inner: OutputDevice, line_editor: &SafeLineEditor, id: Uuid) -> Self {
        Self {
            inner,
            line_editor: Arc::downgrade(line_editor),
            id,
        }
    }

    /// The payload is attempted even if the clear fails. Its error wins over the clear's.
    fn clear_and_write(&self, payload: &[u8]) -> io::Result<()> {
        let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(self.inner);
        let clear_result = term.write_all(CLEAR_LINE_AND_RETURN.as_bytes());
        term.write_all(payload)?;
        clear_result
    }

    fn clear_write_and_redraw(&self, payload: &[u8]) -> io::Result<()> {
        let write_result = self.clear_and_write(payload);
        let redraw_result = self.redraw();
        write_result?;
        redraw_result
    }

    fn redraw(&self) -> io::Result<()> {
        match self.line_editor.upgrade() {
            Some(line_editor) => lock_line_editor(&line_editor).refresh_line(),
            None => Ok(()),
        }
    }
}

impl Write for InterceptedWriter {
    /// Reports the whole buffer as written, since the payload is written with
    /// `write_all` and a partial count would make the caller repeat the clear and
    /// redraw for the remainder.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.clear_write_and_redraw(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> { self.clear_write_and_redraw(buf) }

    fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        let payload = std::fmt::format(args);
        self.write_all(payload.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> { self.inner.lock().flush() }
}

/// Wraps `channel` so that writes to the result are intercepted. The result shares the
/// underlying sink with `channel`, and reports the same capabilities (eg:
/// [`OutputDevice::is_tty()`]).
#[must_use]
pub fn wrap_channel(channel: &OutputDevice, line_editor: &SafeLineEditor) -> OutputDevice {
    wrap_channel_with_id(channel, line_editor, Uuid::new_v4())
}

/// Same as [`wrap_channel()`]. The `id` ties the wrapper to the facility that owns it,
/// and shows up in its [Debug] output.
#[must_use]
pub fn wrap_channel_with_id(
    channel: &OutputDevice,
    line_editor: &SafeLineEditor,
    id: Uuid,
) -> OutputDevice {
    let writer = InterceptedWriter::new(channel.clone(), line_editor, id);
    OutputDevice {
        resource: Arc::new(StdMutex::new(writer)),
        is_mock: channel.is_mock,
        is_tty: channel.is_tty,
    }
}

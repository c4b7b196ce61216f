// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BindingRegistry, LockedOutputDevice, OutputDevice, PromptGuardResult, SlotName,
            SlotValue, lock_output_device_as_mut};
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that looks up its slot on *every* call and writes to whatever the slot is
/// bound to right then. A [`crate::Console`] slot is written to through its `out`
/// channel.
///
/// It also implements [`MakeWriter`], so `tracing` output can follow the slot (see
/// [`crate::DisplayPreference::Slot`]).
#[derive(Debug, Clone)]
pub struct SlotWriter {
    pub registry: BindingRegistry,
    pub name: SlotName,
}

impl SlotWriter {
    #[must_use]
    pub fn new(registry: BindingRegistry, name: SlotName) -> Self { Self { registry, name } }

    fn current_device(&self) -> PromptGuardResult<OutputDevice> {
        Ok(match self.registry.resolve(&self.name)? {
            SlotValue::Channel(it) => it,
            SlotValue::Console(it) => it.out,
        })
    }
}

impl Write for SlotWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    /// The device is resolved once, and written to with a single call.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let device = self.current_device()?;
        let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
        term.write_all(buf)
    }

    fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        let payload = std::fmt::format(args);
        self.write_all(payload.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        let device = self.current_device()?;
        let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
        term.flush()
    }
}

impl<'a> MakeWriter<'a> for SlotWriter {
    type Writer = SlotWriter;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

/// Writes one formatted record to the current binding of `name`, as a single write.
///
/// # Errors
///
/// Returns an error if the slot is missing, or the write fails.
pub fn write_to_slot(
    registry: &BindingRegistry,
    name: &SlotName,
    args: std::fmt::Arguments<'_>,
) -> io::Result<()> {
    SlotWriter::new(registry.clone(), name.clone()).write_fmt(args)
}

/// Like [`print!`], but writes to the current binding of [`SlotName::STDOUT`] in the
/// given [`BindingRegistry`]. Returns an [`io::Result`].
#[macro_export]
macro_rules! slot_print {
    ($registry:expr, $($arg:tt)*) => {
        $crate::write_to_slot(
            &$registry,
            &$crate::SlotName::STDOUT,
            format_args!($($arg)*),
        )
    };
}

/// Like [`println!`], but writes to the current binding of [`SlotName::STDOUT`] in the
/// given [`BindingRegistry`]. The text and the newline are a single write.
#[macro_export]
macro_rules! slot_println {
    ($registry:expr, $($arg:tt)*) => {
        $crate::write_to_slot(
            &$registry,
            &$crate::SlotName::STDOUT,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}

/// Like [`eprintln!`], but writes to the current binding of [`SlotName::STDERR`] in the
/// given [`BindingRegistry`].
#[macro_export]
macro_rules! slot_eprintln {
    ($registry:expr, $($arg:tt)*) => {
        $crate::write_to_slot(
            &$registry,
            &$crate::SlotName::STDERR,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LockedOutputDevice, OutputDevice, lock_output_device_as_mut};
use std::{fmt::Display, io};

/// The logging façade that lives in the [`crate::SlotName::CONSOLE`] slot. `log`, `info`
/// and `debug` go to `out`, `warn` and `error` go to `err`. Each call is a single write
/// of the message followed by a newline.
#[derive(Debug, Clone)]
pub struct Console {
    pub out: OutputDevice,
    pub err: OutputDevice,
}

impl Console {
    #[must_use]
    pub fn new(out: OutputDevice, err: OutputDevice) -> Self { Self { out, err } }

    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn log(&self, message: impl Display) -> io::Result<()> {
        write_record(&self.out, message)
    }

    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn info(&self, message: impl Display) -> io::Result<()> {
        write_record(&self.out, message)
    }

    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn debug(&self, message: impl Display) -> io::Result<()> {
        write_record(&self.out, message)
    }

    /// # Errors
    ///
    /// Returns an error if writing to `err` fails.
    pub fn warn(&self, message: impl Display) -> io::Result<()> {
        write_record(&self.err, message)
    }

    /// # Errors
    ///
    /// Returns an error if writing to `err` fails.
    pub fn error(&self, message: impl Display) -> io::Result<()> {
        write_record(&self.err, message)
    }

    /// `true` if both consoles write into the same sinks.
    #[must_use]
    pub fn ptr_eq(&self, other: &Console) -> bool {
        self.out.ptr_eq(&other.out) && self.err.ptr_eq(&other.err)
    }
}

fn write_record(device: &OutputDevice, message: impl Display) -> io::Result<()> {
    let record = format!("{message}\n");
    let term: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
    term.write_all(record.as_bytes())?;
    term.flush()
}

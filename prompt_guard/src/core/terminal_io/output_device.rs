// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex};
use crossterm::tty::IsTty;
use std::{fmt::{Debug, Formatter},
          sync::{Arc, MutexGuard, PoisonError}};

pub type LockedOutputDevice<'a> = &'a mut dyn std::io::Write;

/// Macro to simplify locking and getting a mutable reference to the output device.
/// Don't call this again in the same scope, it will deadlock! A safe approach is
/// to use this macro in a separate block scope.
///
/// Usage example:
/// ```
/// use r3bl_prompt_guard::{lock_output_device_as_mut, OutputDevice, LockedOutputDevice};
/// let device = OutputDevice::new_stdout();
/// { // Start a new block scope to avoid deadlock.
///     let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
///     let _ = mut_ref.write_all(b"Hello, world!\n");
/// } // The lock is released here.
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}

/// This struct represents an output channel that can be written to, eg: `stdout`,
/// `stderr`, a mock, or an intercepted device produced by [`crate::wrap_channel()`].
/// - It is safe to clone. Clones share the same underlying sink.
/// - To write to it, see the examples in [`Self::lock()`] or
///   [`lock_output_device_as_mut`] macro.
/// - Capabilities other than writing (eg: [`Self::is_tty()`]) are plain fields, so a
///   wrapped device reports exactly what the device it wraps reports.
#[derive(Clone)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
    pub is_tty: bool,
}

impl Debug for OutputDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDevice")
            .field("is_mock", &self.is_mock)
            .field("is_tty", &self.is_tty)
            .finish_non_exhaustive()
    }
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        let is_tty = std::io::stdout().is_tty();
        Self::new_with(std::io::stdout(), is_tty)
    }

    #[must_use]
    pub fn new_stderr() -> Self {
        let is_tty = std::io::stderr().is_tty();
        Self::new_with(std::io::stderr(), is_tty)
    }

    /// Use any writer as an output device.
    #[must_use]
    pub fn new_with(writer: impl std::io::Write + Send + 'static, is_tty: bool) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(writer)),
            is_mock: false,
            is_tty,
        }
    }
}

impl OutputDevice {
    /// Locks the output device for writing. To use it, use the following code:
    ///
    /// ```
    /// use r3bl_prompt_guard::{OutputDevice, LockedOutputDevice};
    ///
    /// let device = OutputDevice::new_stdout();
    /// let mut_ref: LockedOutputDevice<'_> = &mut *device.lock();
    /// let _ = mut_ref.write_all(b"Hello, world!\n");
    /// ```
    ///
    /// A poisoned lock is recovered rather than propagated, since a writer has no
    /// invariants that a panicking holder could have broken.
    pub fn lock(&self) -> MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_tty(&self) -> bool { self.is_tty }

    /// `true` if both devices write into the same underlying sink.
    #[must_use]
    pub fn ptr_eq(&self, other: &OutputDevice) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

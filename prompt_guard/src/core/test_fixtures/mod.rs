// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixtures for testing code that writes to an [`crate::OutputDevice`], reads from an
//! [`crate::InputDevice`], or drives a [`crate::LineEditor`]. They are part of the public
//! API so that integration tests (and downstream crates) can use them too.

// Attach.
pub mod input_device_fixtures;
pub mod line_editor_fixtures;
pub mod output_device_fixtures;

// Re-export.
pub use input_device_fixtures::*;
pub use line_editor_fixtures::*;
pub use output_device_fixtures::*;

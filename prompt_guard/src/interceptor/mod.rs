// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod intercepted_writer;

// Re-export.
pub use intercepted_writer::*;

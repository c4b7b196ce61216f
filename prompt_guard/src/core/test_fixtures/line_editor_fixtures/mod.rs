// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
mod line_editor_mock;

// Re-export.
pub use line_editor_mock::*;

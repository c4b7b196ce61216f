// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod completer;
pub mod line_editor_api;
pub mod prompt_line_editor;

// Re-export.
pub use completer::*;
pub use line_editor_api::*;
pub use prompt_line_editor::*;

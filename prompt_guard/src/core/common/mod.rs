// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod decl_macros;
pub mod prompt_guard_error;

// Re-export.
pub use prompt_guard_error::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod listeners;
pub mod prompt_guard_api;
pub mod prompt_guard_options;

// Re-export.
pub use listeners::*;
pub use prompt_guard_api::*;
pub use prompt_guard_options::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod lifecycle_state;

// Re-export.
pub use lifecycle_state::*;

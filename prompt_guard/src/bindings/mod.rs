// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod binding;
pub mod binding_registry;
pub mod binding_swapper;
pub mod console;
pub mod slot_name;
pub mod slot_writer;

// Re-export.
pub use binding::*;
pub use binding_registry::*;
pub use binding_swapper::*;
pub use console::*;
pub use slot_name::*;
pub use slot_writer::*;

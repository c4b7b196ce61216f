// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `r3bl_prompt_guard` crate lets your CLI program show an interactive prompt while
//! other parts of the same process keep writing free-form output to `stdout` and
//! `stderr`, without the two corrupting each other on the terminal.
//!
//! # Why use this crate
//!
//! When a prompt like `> ` is displayed and the user has typed half a command, any
//! output written by another part of the program lands right after the prompt. The
//! prompt fragment stays mixed into the output and the user no longer sees what they
//! were typing. This crate fixes that by intercepting every write destined for the
//! terminal:
//!
//! 1. Erase the current display line and return the caret to column 0 (`ESC [2K` +
//!    `\r`).
//! 2. Perform the original write, unchanged.
//! 3. Ask the line editor to redraw the prompt and the partially typed input below the
//!    freshly written output.
//!
//! # Mental model
//!
//! ```text
//!  ┌──────────────┐  resolve("stdout")  ┌──────────────────┐
//!  │ any code     ├────────────────────►│ BindingRegistry  │
//!  │ slot_println!│                     │  stdout ─┐       │
//!  └──────────────┘                     │  stderr ─┼─ computed getter
//!                                       │  console┘   reads LifecycleState
//!                                       └────────┬─────────┘
//!                         Active ┌───────────────┴─────────────┐ Suspended
//!                                ▼                             ▼
//!                     ┌────────────────────┐         ┌──────────────────┐
//!                     │ InterceptedWriter  ├────────►│ original device  │
//!                     │ clear/write/redraw │         └──────────────────┘
//!                     └─────────┬──────────┘
//!                               ▼ refresh_line()
//!                        ┌─────────────┐
//!                        │ LineEditor  │
//!                        └─────────────┘
//! ```
//!
//! - [`BindingRegistry`] is an explicit indirection table of named slots
//!   ([`SlotName::STDOUT`], [`SlotName::STDERR`], [`SlotName::CONSOLE`]). Code that wants
//!   its output to cooperate with the prompt resolves the slot at each write (see
//!   [`slot_println!`], [`SlotWriter`] for `tracing`), instead of holding on to
//!   [`std::io::stdout()`].
//! - [`PromptGuard`] is the facility. It wraps its output and error devices eagerly, and
//!   has a three state lifecycle ([`LifecycleState`]):
//!   - [`PromptGuard::start()`] swaps the slots over to computed bindings.
//!   - [`PromptGuard::pause()`] / [`PromptGuard::resume()`] flip the bindings between the
//!     original and the intercepted devices without uninstalling anything.
//!   - [`PromptGuard::stop()`] puts the original bindings back verbatim.
//! - The [`LineEditor`] is an external collaborator. It owns the prompt text. The
//!   default [`PromptLineEditor`] is a simple cooked mode prompt; plug in your own if
//!   you have a real line editor.
//!
//! # Example
//!
//! ```no_run
//! use r3bl_prompt_guard::{BindingRegistry, PromptGuard, PromptGuardOptions, slot_println};
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let mut guard = PromptGuard::create_interface(PromptGuardOptions::default())?;
//!     guard.prompt_loop(Some(|line: &str| {
//!         _ = slot_println!(BindingRegistry::global(), "you typed: {line}");
//!     }))?;
//!     guard.run().await
//! }
//! ```

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod bindings;
pub mod core;
pub mod facility;
pub mod interceptor;
pub mod lifecycle;
pub mod line_editor;

// Re-export stable public API using glob imports for ergonomic, flat API surface.
pub use bindings::*;
pub use core::*;
pub use facility::*;
pub use interceptor::*;
pub use lifecycle::*;
pub use line_editor::*;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use futures_core::Stream;
use smallvec::SmallVec;
use std::{pin::Pin, sync::Arc};

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Type alias for a `Send`-able output device (raw terminal, `InterceptedWriter`, etc).
pub type SendRawTerminal = dyn std::io::Write + Send;
/// Type alias for a `Send`-able raw terminal wrapped in an `Arc<StdMutex>`.
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Type alias for one line of user input (without the trailing newline).
pub type LineResult = std::io::Result<String>;
/// Type alias for a pinned stream that is async safe. `T` is usually [`LineResult`].
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

/// Small collections that almost never spill onto the heap.
pub type InlineVec<T> = SmallVec<[T; DEFAULT_INLINE_VEC_SIZE]>;
pub const DEFAULT_INLINE_VEC_SIZE: usize = 8;

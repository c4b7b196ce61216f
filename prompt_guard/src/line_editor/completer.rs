// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          future::Future,
          pin::Pin,
          sync::Arc};

/// Result of completing a partial line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    /// Candidate completions for the partial line.
    pub candidates: Vec<String>,
    /// The part of the line that the candidates complete.
    pub substring: String,
}

pub type PinnedCompletionsFuture = Pin<Box<dyn Future<Output = Completions> + Send>>;
pub type SyncCompleterFn = Arc<dyn Fn(&str) -> Completions + Send + Sync>;
pub type AsyncCompleterFn = Arc<dyn Fn(String) -> PinnedCompletionsFuture + Send + Sync>;

/// Autocompletion callback. It is handed to the [`crate::LineEditor`] untouched, the
/// prompt guard itself never calls it.
#[derive(Clone)]
pub enum Completer {
    Sync(SyncCompleterFn),
    Async(AsyncCompleterFn),
}

impl Debug for Completer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Completer::Sync(_) => write!(f, "Completer::Sync"),
            Completer::Async(_) => write!(f, "Completer::Async"),
        }
    }
}

impl Completer {
    pub fn new_sync(
        completer_fn: impl Fn(&str) -> Completions + Send + Sync + 'static,
    ) -> Self {
        Completer::Sync(Arc::new(completer_fn))
    }

    pub fn new_async<F, Fut>(completer_fn: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Completions> + Send + 'static,
    {
        Completer::Async(Arc::new(move |line: String| -> PinnedCompletionsFuture {
            Box::pin(completer_fn(line))
        }))
    }

    /// Both flavors are awaited the same way.
    pub async fn complete(&self, line: &str) -> Completions {
        match self {
            Completer::Sync(completer_fn) => completer_fn(line),
            Completer::Async(completer_fn) => completer_fn(line.to_owned()).await,
        }
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LineResult, PinnedInputStream};
use async_stream::stream;
use futures_util::{FutureExt, StreamExt};
use miette::IntoDiagnostic;
use tokio::io::{AsyncBufReadExt, BufReader};

/// This struct represents the input source that produces discrete lines. See
/// [`crate::InputDeviceExtMock`] for testing features.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: PinnedInputStream<LineResult>,
}

impl Default for InputDevice {
    fn default() -> Self { Self::new_stdin() }
}

impl InputDevice {
    /// Lines from the process `stdin`. The stream ends when `stdin` is closed (eg:
    /// <kbd>Ctrl+D</kbd>), or after the first read error.
    #[must_use]
    pub fn new_stdin() -> InputDevice {
        let it = stream! {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => yield Ok(line),
                    Ok(None) => break,
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                }
            }
        };
        InputDevice {
            resource: Box::pin(it),
        }
    }
}

impl InputDevice {
    /// Returns [None] once the input source is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the input source fails.
    pub async fn next_line(&mut self) -> miette::Result<Option<String>> {
        match self.resource.next().fuse().await {
            Some(it) => it.into_diagnostic().map(Some),
            None => Ok(None),
        }
    }
}

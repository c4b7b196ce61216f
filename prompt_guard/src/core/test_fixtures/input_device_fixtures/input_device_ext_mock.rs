// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InlineVec, InputDevice, LineResult, PinnedInputStream};
use async_stream::stream;
use std::time::Duration;

/// Scripted input sources for tests. Lines are yielded in order, then the stream ends,
/// which looks to [`crate::PromptGuard::run()`] like the user closing the input.
pub trait InputDeviceExtMock {
    fn new_mock(script: InlineVec<LineResult>) -> InputDevice;

    /// Each line only arrives after `delay`, so other tasks get to write in between.
    fn new_mock_with_delay(script: InlineVec<LineResult>, delay: Duration) -> InputDevice;

    /// Convenience for the common case where every line reads successfully.
    fn new_mock_from_lines(lines: &[&str]) -> InputDevice;
}

impl InputDeviceExtMock for InputDevice {
    fn new_mock(script: InlineVec<LineResult>) -> InputDevice {
        InputDevice {
            resource: gen_line_stream(script, None),
        }
    }

    fn new_mock_with_delay(script: InlineVec<LineResult>, delay: Duration) -> InputDevice {
        InputDevice {
            resource: gen_line_stream(script, Some(delay)),
        }
    }

    fn new_mock_from_lines(lines: &[&str]) -> InputDevice {
        let script = lines.iter().map(|line| Ok((*line).to_owned())).collect();
        Self::new_mock(script)
    }
}

fn gen_line_stream(
    script: InlineVec<LineResult>,
    delay: Option<Duration>,
) -> PinnedInputStream<LineResult> {
    let it = stream! {
        for line in script {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            yield line;
        }
    };
    Box::pin(it)
}

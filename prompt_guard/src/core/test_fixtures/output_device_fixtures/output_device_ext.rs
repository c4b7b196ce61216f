// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BrokenPipeMock, OutputDevice, StdMutex, StdoutMock};
use std::sync::Arc;

pub trait OutputDeviceExt {
    fn new_mock() -> (OutputDevice, StdoutMock);

    fn new_broken_pipe_mock() -> OutputDevice;
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
            is_tty: false,
        };
        (this, stdout_mock)
    }

    fn new_broken_pipe_mock() -> OutputDevice {
        OutputDevice {
            resource: Arc::new(StdMutex::new(BrokenPipeMock)),
            is_mock: true,
            is_tty: false,
        }
    }
}

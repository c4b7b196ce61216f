// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BindingRegistry, Completer, InputDevice, OutputDevice};
use std::fmt::{Debug, Formatter};

/// Everything is optional. Defaults:
///
/// | Option      | Default                           |
/// |-------------|-----------------------------------|
/// | `output`    | the registry's `stdout` slot      |
/// | `error`     | the registry's `stderr` slot      |
/// | `input`     | lines from process `stdin`        |
/// | `completer` | none                              |
/// | `prompt`    | [`crate::DEFAULT_PROMPT`]         |
/// | `registry`  | [`BindingRegistry::global()`]     |
#[derive(Default)]
pub struct PromptGuardOptions {
    pub output: Option<OutputDevice>,
    pub error: Option<OutputDevice>,
    pub input: Option<InputDevice>,
    pub completer: Option<Completer>,
    pub prompt: Option<String>,
    pub registry: Option<BindingRegistry>,
}

impl Debug for PromptGuardOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptGuardOptions")
            .field("output", &self.output)
            .field("error", &self.error)
            .field("input", &self.input.as_ref().map(|_| "InputDevice"))
            .field("completer", &self.completer)
            .field("prompt", &self.prompt)
            .field("registry", &self.registry)
            .finish()
    }
}

impl PromptGuardOptions {
    #[must_use]
    pub fn output(mut self, output: OutputDevice) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn error(mut self, error: OutputDevice) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn input(mut self, input: InputDevice) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn completer(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_owned());
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: BindingRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

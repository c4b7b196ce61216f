// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BindingRegistry, BindingSwapper, CloseListener, Console, DEFAULT_PROMPT,
            InputDevice, LifecycleState, LineListener, OutputDevice, PromptGuardError,
            PromptGuardOptions, PromptGuardResult, PromptLineEditor, SafeLineEditor,
            SharedLifecycleState, SlotName, SlotRedirect, SlotValue, Transition,
            lock_line_editor, ok, wrap_channel_with_id};
use std::{fmt::{Debug, Formatter},
          io};
use tracing::{debug, info};
use uuid::Uuid;

/// Keeps an interactive prompt intact while the rest of the program writes to the
/// `stdout`, `stderr` and `console` slots of a [`BindingRegistry`].
///
/// Its output and error devices are wrapped eagerly at construction (see
/// [`crate::wrap_channel()`]), but nothing is installed until [`Self::start()`]. See
/// [`LifecycleState`] for the state machine. Calling a lifecycle method from the wrong
/// state returns [`PromptGuardError::IllegalTransition`] and changes nothing.
///
/// It is also the handle to the [`crate::LineEditor`]: [`Self::set_prompt()`],
/// [`Self::prompt()`], [`Self::on_line()`] and [`Self::on_close()`] go straight to it.
///
/// Dropping a guard that is still started restores the original bindings.
pub struct PromptGuard {
    line_editor: SafeLineEditor,
    input_device: InputDevice,
    stdout: OutputDevice,
    stderr: OutputDevice,
    console: Console,
    wrapped_stdout: OutputDevice,
    wrapped_stderr: OutputDevice,
    wrapped_console: Console,
    state: SharedLifecycleState,
    swapper: BindingSwapper,
    line_listeners: Vec<LineListener>,
    close_listeners: Vec<CloseListener>,
    id: Uuid,
}

impl Debug for PromptGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptGuard")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("line_listeners", &self.line_listeners)
            .field("close_listeners", &self.close_listeners)
            .finish_non_exhaustive()
    }
}

/// Constructors.
impl PromptGuard {
    /// Uses a [`PromptLineEditor`] that draws on the (unwrapped) output device.
    #[must_use]
    pub fn new(options: PromptGuardOptions) -> Self {
        let mut options = options;
        let registry = options.registry.take().unwrap_or_else(BindingRegistry::global);
        let stdout = options
            .output
            .take()
            .unwrap_or_else(|| default_channel(&registry, &SlotName::STDOUT));
        let prompt = options
            .prompt
            .take()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_owned());
        let line_editor = PromptLineEditor::new(stdout.clone(), &prompt)
            .with_completer(options.completer.take())
            .into_safe();
        Self::new_with_line_editor(options.output(stdout).registry(registry), line_editor)
    }

    /// Bring your own line editor. It must draw on the unwrapped output device. The
    /// `completer` option is ignored, since the editor owns its completer.
    ///
    /// Absent `output` and `error` options default to what the registry's `stdout` and
    /// `stderr` slots are bound to right now, so a suspended guard resolves those slots
    /// to the very same devices.
    #[must_use]
    pub fn new_with_line_editor(
        options: PromptGuardOptions,
        line_editor: SafeLineEditor,
    ) -> Self {
        let PromptGuardOptions {
            output,
            error,
            input,
            completer: _,
            prompt,
            registry,
        } = options;

        let registry = registry.unwrap_or_else(BindingRegistry::global);
        let stdout = output.unwrap_or_else(|| default_channel(&registry, &SlotName::STDOUT));
        let stderr = error.unwrap_or_else(|| default_channel(&registry, &SlotName::STDERR));
        let input_device = input.unwrap_or_else(InputDevice::new_stdin);

        if let Some(prompt) = prompt {
            lock_line_editor(&line_editor).set_prompt(&prompt);
        }

        // What the console slot resolves to while suspended.
        let console = registry
            .console()
            .unwrap_or_else(|_| Console::new(stdout.clone(), stderr.clone()));

        let id = Uuid::new_v4();
        let wrapped_stdout = wrap_channel_with_id(&stdout, &line_editor, id);
        let wrapped_stderr = wrap_channel_with_id(&stderr, &line_editor, id);
        let wrapped_console = Console::new(wrapped_stdout.clone(), wrapped_stderr.clone());

        Self {
            line_editor,
            input_device,
            stdout,
            stderr,
            console,
            wrapped_stdout,
            wrapped_stderr,
            wrapped_console,
            state: SharedLifecycleState::default(),
            swapper: BindingSwapper::new(registry),
            line_listeners: vec![],
            close_listeners: vec![],
            id,
        }
    }

    /// The drop-in entry point: construct, [`Self::start()`], and stop again when the
    /// input source closes.
    ///
    /// # Errors
    ///
    /// Returns [`PromptGuardError::MissingSlot`] if the registry lacks one of the
    /// `stdout`, `stderr` or `console` slots.
    pub fn create_interface(options: PromptGuardOptions) -> PromptGuardResult<Self> {
        let mut it = Self::new(options);
        it.start()?;
        it.close_listeners.push(CloseListener::StopGuard);
        Ok(it)
    }
}

/// The device `name` is bound to, or the process device if the slot is missing or
/// holds something else.
fn default_channel(registry: &BindingRegistry, name: &SlotName) -> OutputDevice {
    registry.channel(name).unwrap_or_else(|_| {
        if *name == SlotName::STDERR {
            OutputDevice::new_stderr()
        } else {
            OutputDevice::new_stdout()
        }
    })
}

/// Line editor operations.
impl PromptGuard {
    pub fn set_prompt(&self, prompt: &str) {
        lock_line_editor(&self.line_editor).set_prompt(prompt);
    }

    /// Shows the prompt now.
    ///
    /// # Errors
    ///
    /// Returns an error if the line editor fails to draw.
    pub fn prompt(&self) -> io::Result<()> { lock_line_editor(&self.line_editor).prompt() }

    /// Listeners are additive. They run in the order they were added.
    pub fn on_line(&mut self, handler: impl FnMut(&str) + 'static) {
        self.line_listeners.push(LineListener::Handler(Box::new(handler)));
    }

    /// Listeners are additive. They run in the order they were added.
    pub fn on_close(&mut self, handler: impl FnMut() + 'static) {
        self.close_listeners.push(CloseListener::Handler(Box::new(handler)));
    }

    /// 1. Adds `handler` as a line listener (if given).
    /// 2. Adds a listener that shows the prompt again after every line.
    /// 3. Starts the guard if it is not active.
    /// 4. Shows the prompt.
    ///
    /// Each call adds another re-prompt listener.
    ///
    /// # Errors
    ///
    /// - [`PromptGuardError::IllegalTransition`] if the guard is suspended, since it can
    ///   only be started from [`LifecycleState::Inactive`]. The listeners stay added.
    /// - Any error from [`Self::start()`] or [`Self::prompt()`].
    pub fn prompt_loop(
        &mut self,
        handler: Option<impl FnMut(&str) + 'static>,
    ) -> PromptGuardResult<()> {
        if let Some(handler) = handler {
            self.on_line(handler);
        }
        self.line_listeners.push(LineListener::Reprompt);

        if self.state() != LifecycleState::Active {
            self.start()?;
        }

        self.prompt()?;
        ok!()
    }
}

/// Lifecycle.
impl PromptGuard {
    /// Installs the computed bindings. Requires [`LifecycleState::Inactive`].
    ///
    /// # Errors
    ///
    /// - [`PromptGuardError::IllegalTransition`] if not inactive.
    /// - [`PromptGuardError::MissingSlot`] if a slot to take over does not exist. No
    ///   slot is touched in that case.
    pub fn start(&mut self) -> PromptGuardResult<()> { self.transition(Transition::Start) }

    /// Makes the bindings resolve to the original devices, without uninstalling them.
    /// Requires [`LifecycleState::Active`].
    ///
    /// # Errors
    ///
    /// [`PromptGuardError::IllegalTransition`] if not active.
    pub fn pause(&mut self) -> PromptGuardResult<()> { self.transition(Transition::Pause) }

    /// Requires [`LifecycleState::Suspended`].
    ///
    /// # Errors
    ///
    /// [`PromptGuardError::IllegalTransition`] if not suspended.
    pub fn resume(&mut self) -> PromptGuardResult<()> { self.transition(Transition::Resume) }

    /// Puts the original bindings back, exactly as they were before [`Self::start()`].
    /// Allowed from [`LifecycleState::Active`] and [`LifecycleState::Suspended`]. The
    /// guard can be started again afterwards.
    ///
    /// # Errors
    ///
    /// [`PromptGuardError::IllegalTransition`] if already inactive.
    pub fn stop(&mut self) -> PromptGuardResult<()> { self.transition(Transition::Stop) }

    fn transition(&mut self, transition: Transition) -> PromptGuardResult<()> {
        let from = self.state.get();
        let to = from.apply(transition)?;

        match transition {
            Transition::Start => self.swapper.activate(&self.redirects(), &self.state)?,
            Transition::Stop => self.swapper.deactivate()?,
            Transition::Pause | Transition::Resume => {}
        }
        self.state.set(to);

        debug!(
            message = "PromptGuard transition",
            id = %self.id,
            %transition,
            %from,
            %to
        );
        ok!()
    }

    fn redirects(&self) -> [SlotRedirect; 3] {
        [
            SlotRedirect {
                name: SlotName::STDOUT,
                base: SlotValue::Channel(self.stdout.clone()),
                wrapped: SlotValue::Channel(self.wrapped_stdout.clone()),
            },
            SlotRedirect {
                name: SlotName::STDERR,
                base: SlotValue::Channel(self.stderr.clone()),
                wrapped: SlotValue::Channel(self.wrapped_stderr.clone()),
            },
            SlotRedirect {
                name: SlotName::CONSOLE,
                base: SlotValue::Console(self.console.clone()),
                wrapped: SlotValue::Console(self.wrapped_console.clone()),
            },
        ]
    }
}

/// Input loop.
impl PromptGuard {
    /// Reads lines until the input source closes. Each line is given to the line editor
    /// and then to the line listeners. When the input closes, the close listeners run.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails, or a listener action fails (eg: the
    /// re-prompt can't draw).
    pub async fn run(&mut self) -> miette::Result<()> {
        while let Some(line) = self.input_device.next_line().await? {
            self.dispatch_line(&line)?;
        }
        self.close()?;
        ok!()
    }

    /// Announces `line` to the line editor, then runs the line listeners in order.
    ///
    /// # Errors
    ///
    /// Returns the first error from a re-prompt. Later listeners don't run.
    pub fn dispatch_line(&mut self, line: &str) -> PromptGuardResult<()> {
        lock_line_editor(&self.line_editor).line_received(line);
        debug!(
            message = "Dispatching line",
            id = %self.id,
            listeners = self.line_listeners.len()
        );

        let mut listeners = std::mem::take(&mut self.line_listeners);
        let result = listeners
            .iter_mut()
            .try_for_each(|listener| match listener {
                LineListener::Handler(handler) => {
                    handler(line);
                    Ok(())
                }
                LineListener::Reprompt => self.prompt(),
            });
        self.line_listeners = listeners;

        result.map_err(PromptGuardError::from)
    }

    /// The close notification: runs the close listeners in order.
    ///
    /// # Errors
    ///
    /// Returns the first error from stopping the guard. Later listeners don't run.
    pub fn close(&mut self) -> PromptGuardResult<()> {
        info!(message = "Input closed", id = %self.id);

        let mut listeners = std::mem::take(&mut self.close_listeners);
        let mut result = Ok(());
        for listener in &mut listeners {
            match listener {
                CloseListener::Handler(handler) => handler(),
                CloseListener::StopGuard => {
                    if self.state().is_installed() {
                        result = self.stop();
                    }
                }
            }
            if result.is_err() {
                break;
            }
        }
        self.close_listeners = listeners;

        result
    }
}

/// Accessors.
impl PromptGuard {
    #[must_use]
    pub fn state(&self) -> LifecycleState { self.state.get() }

    #[must_use]
    pub fn id(&self) -> Uuid { self.id }

    #[must_use]
    pub fn registry(&self) -> &BindingRegistry { &self.swapper.registry }

    #[must_use]
    pub fn line_editor(&self) -> &SafeLineEditor { &self.line_editor }

    /// The original output device.
    #[must_use]
    pub fn stdout(&self) -> &OutputDevice { &self.stdout }

    /// The original error device.
    #[must_use]
    pub fn stderr(&self) -> &OutputDevice { &self.stderr }

    #[must_use]
    pub fn wrapped_stdout(&self) -> &OutputDevice { &self.wrapped_stdout }

    #[must_use]
    pub fn wrapped_stderr(&self) -> &OutputDevice { &self.wrapped_stderr }

    #[must_use]
    pub fn wrapped_console(&self) -> &Console { &self.wrapped_console }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        if self.swapper.is_active() {
            _ = self.swapper.deactivate();
            self.state.set(LifecycleState::Inactive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CLEAR_LINE_AND_RETURN, InputDeviceExtMock, LineEditorCall, LineEditorMock,
                OutputDeviceExt, PROMPT_MARKER, REDRAW_MARKER, StdMutex, StdoutMock,
                slot_println};
    use pretty_assertions::assert_eq;
    use std::{rc::Rc, sync::Arc};

    struct Fixture {
        guard: PromptGuard,
        registry: BindingRegistry,
        stdout_mock: StdoutMock,
        stderr_mock: StdoutMock,
        editor_mock: LineEditorMock,
    }

    fn fixture(lines: &[&str]) -> Fixture {
        let (stdout, stdout_mock) = OutputDevice::new_mock();
        let (stderr, stderr_mock) = OutputDevice::new_mock();
        let registry = BindingRegistry::with_channels(stdout.clone(), stderr.clone());
        let (editor_mock, line_editor) = LineEditorMock::new_safe(Some(stdout.clone()));
        let options = PromptGuardOptions::default()
            .output(stdout)
            .error(stderr)
            .input(InputDevice::new_mock_from_lines(lines))
            .registry(registry.clone());
        Fixture {
            guard: PromptGuard::new_with_line_editor(options, line_editor),
            registry,
            stdout_mock,
            stderr_mock,
            editor_mock,
        }
    }

    #[test]
    fn test_construction_wraps_eagerly_but_installs_nothing() {
        let it = fixture(&[]);
        assert_eq!(it.guard.state(), LifecycleState::Inactive);
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.stdout()));
        assert!(!it.guard.wrapped_stdout().ptr_eq(it.guard.stdout()));
        assert!(it.guard.registry().ptr_eq(&it.registry));
    }

    #[test]
    fn test_lifecycle_resolution() {
        let mut it = fixture(&[]);

        it.guard.start().unwrap();
        assert_eq!(it.guard.state(), LifecycleState::Active);
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.wrapped_stdout()));
        assert!(it.registry.stderr().unwrap().ptr_eq(it.guard.wrapped_stderr()));
        assert!(it.registry.console().unwrap().ptr_eq(it.guard.wrapped_console()));

        it.guard.pause().unwrap();
        assert_eq!(it.guard.state(), LifecycleState::Suspended);
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.stdout()));
        assert!(it.registry.stderr().unwrap().ptr_eq(it.guard.stderr()));

        it.guard.resume().unwrap();
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.wrapped_stdout()));

        it.guard.stop().unwrap();
        assert_eq!(it.guard.state(), LifecycleState::Inactive);
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.stdout()));
    }

    #[test]
    fn test_intercepted_write_through_slot() {
        let mut it = fixture(&[]);
        it.guard.start().unwrap();

        slot_println!(it.registry, "hello").unwrap();
        it.registry.console().unwrap().error("bad").unwrap();

        // The line editor draws on stdout, so both redraws land there.
        assert_eq!(
            it.stdout_mock.get_copy_of_buffer_as_string(),
            format!("{CLEAR_LINE_AND_RETURN}hello\n{REDRAW_MARKER}{REDRAW_MARKER}")
        );
        assert_eq!(
            it.stderr_mock.get_copy_of_buffer_as_string(),
            format!("{CLEAR_LINE_AND_RETURN}bad\n")
        );
        assert_eq!(it.editor_mock.count(&LineEditorCall::RefreshLine), 2);
    }

    #[test]
    fn test_misuse_is_rejected_without_mutation() {
        let mut it = fixture(&[]);
        let before = it.registry.descriptor(&SlotName::STDOUT).unwrap();

        for result in [it.guard.stop(), it.guard.pause(), it.guard.resume()] {
            assert!(matches!(
                result,
                Err(PromptGuardError::IllegalTransition {
                    from: LifecycleState::Inactive,
                    ..
                })
            ));
        }
        assert_eq!(it.guard.state(), LifecycleState::Inactive);
        assert!(
            it.registry
                .descriptor(&SlotName::STDOUT)
                .unwrap()
                .ptr_eq(&before)
        );

        it.guard.start().unwrap();
        let installed = it.registry.descriptor(&SlotName::STDOUT).unwrap();
        assert!(it.guard.start().is_err());
        assert!(it.guard.resume().is_err());
        assert_eq!(it.guard.state(), LifecycleState::Active);
        assert!(
            it.registry
                .descriptor(&SlotName::STDOUT)
                .unwrap()
                .ptr_eq(&installed)
        );
    }

    #[test]
    fn test_start_with_missing_slot_fails_and_stays_inactive() {
        let (stdout, _) = OutputDevice::new_mock();
        let (stderr, _) = OutputDevice::new_mock();
        let registry = BindingRegistry::new();
        registry.define(SlotName::STDOUT, SlotValue::Channel(stdout.clone()));
        let (_, line_editor) = LineEditorMock::new_safe(None);
        let mut guard = PromptGuard::new_with_line_editor(
            PromptGuardOptions::default()
                .output(stdout)
                .error(stderr)
                .input(InputDevice::new_mock_from_lines(&[]))
                .registry(registry.clone()),
            line_editor,
        );

        assert!(matches!(
            guard.start(),
            Err(PromptGuardError::MissingSlot { .. })
        ));
        assert_eq!(guard.state(), LifecycleState::Inactive);
        assert!(matches!(
            registry.descriptor(&SlotName::STDOUT),
            Some(crate::Binding::Value(_))
        ));
    }

    #[test]
    fn test_restart_after_stop() {
        let mut it = fixture(&[]);
        it.guard.start().unwrap();
        it.guard.stop().unwrap();
        it.guard.start().unwrap();
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.wrapped_stdout()));
        it.guard.pause().unwrap();
        it.guard.stop().unwrap();
        assert!(it.registry.stdout().unwrap().ptr_eq(it.guard.stdout()));
    }

    #[test]
    fn test_set_prompt_and_prompt_go_to_line_editor() {
        let it = fixture(&[]);
        it.guard.set_prompt("$ ");
        it.guard.prompt().unwrap();

        assert_eq!(
            it.editor_mock.get_copy_of_calls(),
            vec![LineEditorCall::SetPrompt("$ ".into()), LineEditorCall::Prompt]
        );
        assert_eq!(it.stdout_mock.get_copy_of_buffer_as_string(), PROMPT_MARKER);
    }

    #[test]
    fn test_prompt_loop_from_suspended_fails() {
        let mut it = fixture(&[]);
        it.guard.start().unwrap();
        it.guard.pause().unwrap();

        let result = it.guard.prompt_loop(None::<fn(&str)>);

        assert!(matches!(
            result,
            Err(PromptGuardError::IllegalTransition {
                transition: Transition::Start,
                from: LifecycleState::Suspended,
            })
        ));
        assert_eq!(it.guard.state(), LifecycleState::Suspended);
    }

    #[test]
    fn test_dispatch_line_runs_listeners_in_order() {
        let mut it = fixture(&[]);
        let seen = Rc::new(std::cell::RefCell::new(Vec::<String>::new()));

        for tag in ["first", "second"] {
            let seen = seen.clone();
            it.guard
                .on_line(move |line| seen.borrow_mut().push(format!("{tag}:{line}")));
        }
        it.guard.dispatch_line("x").unwrap();

        assert_eq!(*seen.borrow(), vec!["first:x", "second:x"]);
        assert_eq!(
            it.editor_mock.get_copy_of_calls(),
            vec![LineEditorCall::LineReceived("x".into())]
        );
    }

    #[test]
    fn test_close_runs_listeners_and_stop_guard_is_idempotent() {
        let mut it = fixture(&[]);
        let closed = Arc::new(StdMutex::new(0));
        it.guard.on_close({
            let closed = closed.clone();
            move || *closed.lock().unwrap() += 1
        });
        it.guard.close_listeners.push(CloseListener::StopGuard);

        it.guard.start().unwrap();
        it.guard.close().unwrap();
        assert_eq!(it.guard.state(), LifecycleState::Inactive);

        // Already stopped: the stop listener does nothing.
        it.guard.close().unwrap();
        assert_eq!(*closed.lock().unwrap(), 2);
    }

    #[test]
    fn test_drop_restores_bindings() {
        let it = fixture(&[]);
        let Fixture {
            mut guard,
            registry,
            ..
        } = it;
        let stdout = guard.stdout().clone();

        guard.start().unwrap();
        guard.pause().unwrap();
        drop(guard);

        assert!(registry.stdout().unwrap().ptr_eq(&stdout));
        assert!(registry.assign(&SlotName::STDOUT, SlotValue::Channel(stdout)).is_ok());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_run_dispatches_lines_then_closes() {
        let mut it = fixture(&["one", "two"]);
        let seen = Rc::new(std::cell::RefCell::new(Vec::<String>::new()));
        it.guard.prompt_loop(Some({
            let seen = seen.clone();
            move |line: &str| seen.borrow_mut().push(line.to_owned())
        }))
        .unwrap();
        it.guard.close_listeners.push(CloseListener::StopGuard);
        assert_eq!(it.guard.state(), LifecycleState::Active);

        it.guard.run().await.unwrap();

        assert_eq!(*seen.borrow(), vec!["one", "two"]);
        assert_eq!(it.guard.state(), LifecycleState::Inactive);
        // The initial prompt, plus one re-prompt per line.
        assert_eq!(it.editor_mock.count(&LineEditorCall::Prompt), 3);
    }
}

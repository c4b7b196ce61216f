// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End to end scenarios: a [`PromptGuard`] around a mock input source and recording
//! output channels, observed only through a [`BindingRegistry`].

use pretty_assertions::assert_eq;
use r3bl_prompt_guard::{Binding, BindingRegistry, CLEAR_LINE_AND_RETURN, InputDevice,
                        InputDeviceExtMock, LifecycleState, LineEditorCall,
                        LineEditorMock, OutputDevice, OutputDeviceExt, PromptGuard,
                        PromptGuardError, PromptGuardOptions, REDRAW_MARKER, SlotName,
                        SlotValue, StdoutMock, slot_eprintln, slot_print,
                        slot_println};
use serial_test::serial;
use std::{cell::RefCell, io::Write, rc::Rc};

struct Harness {
    guard: PromptGuard,
    registry: BindingRegistry,
    stdout_mock: StdoutMock,
    editor_mock: LineEditorMock,
}

fn harness(registry: BindingRegistry, lines: &[&str]) -> Harness {
    let (stdout, stdout_mock) = OutputDevice::new_mock();
    let (stderr, _) = OutputDevice::new_mock();
    let (editor_mock, line_editor) = LineEditorMock::new_safe(Some(stdout.clone()));
    let options = PromptGuardOptions::default()
        .output(stdout)
        .error(stderr)
        .input(InputDevice::new_mock_from_lines(lines))
        .registry(registry.clone());
    Harness {
        guard: PromptGuard::new_with_line_editor(options, line_editor),
        registry,
        stdout_mock,
        editor_mock,
    }
}

fn local_harness(lines: &[&str]) -> Harness {
    let (stdout, _) = OutputDevice::new_mock();
    let (stderr, _) = OutputDevice::new_mock();
    harness(BindingRegistry::with_channels(stdout, stderr), lines)
}

#[test]
fn start_then_write_clears_writes_and_redraws() {
    let mut it = local_harness(&[]);
    it.guard.start().unwrap();

    slot_print!(it.registry, "hello").unwrap();

    assert_eq!(
        it.stdout_mock.get_copy_of_buffer_as_string(),
        format!("{CLEAR_LINE_AND_RETURN}hello{REDRAW_MARKER}")
    );
    assert_eq!(
        it.editor_mock.get_copy_of_calls(),
        vec![LineEditorCall::RefreshLine]
    );
}

#[test]
fn every_write_is_wrapped_and_payload_order_is_kept() {
    let mut it = local_harness(&[]);
    it.guard.start().unwrap();

    let payloads = ["a", "", "multi\nline", "z"];
    for payload in payloads {
        slot_print!(it.registry, "{payload}").unwrap();
    }

    let expected: String = payloads
        .iter()
        .map(|payload| format!("{CLEAR_LINE_AND_RETURN}{payload}{REDRAW_MARKER}"))
        .collect();
    assert_eq!(it.stdout_mock.get_copy_of_buffer_as_string(), expected);
    assert_eq!(
        it.editor_mock.count(&LineEditorCall::RefreshLine),
        payloads.len()
    );
}

#[test]
fn pause_then_write_goes_straight_to_the_original_channel() {
    let mut it = local_harness(&[]);
    it.guard.start().unwrap();
    it.guard.pause().unwrap();

    slot_print!(it.registry, "direct").unwrap();

    assert_eq!(it.stdout_mock.get_copy_of_buffer_as_string(), "direct");
    assert_eq!(it.editor_mock.count(&LineEditorCall::RefreshLine), 0);

    it.guard.resume().unwrap();
    slot_print!(it.registry, "wrapped").unwrap();
    assert_eq!(
        it.stdout_mock.get_copy_of_buffer_as_string(),
        format!("direct{CLEAR_LINE_AND_RETURN}wrapped{REDRAW_MARKER}")
    );
}

#[test]
fn active_and_suspended_share_the_same_underlying_sink() {
    let mut it = local_harness(&[]);
    it.guard.start().unwrap();
    let active = it.registry.stdout().unwrap();
    it.guard.pause().unwrap();
    let suspended = it.registry.stdout().unwrap();

    assert!(active.ptr_eq(it.guard.wrapped_stdout()));
    assert!(suspended.ptr_eq(it.guard.stdout()));

    {
        let mut term = active.lock();
        term.write_all(b"1").unwrap();
    }
    {
        let mut term = suspended.lock();
        term.write_all(b"2").unwrap();
    }
    assert_eq!(
        it.stdout_mock.get_copy_of_buffer_as_string(),
        format!("{CLEAR_LINE_AND_RETURN}1{REDRAW_MARKER}2")
    );
}

#[test]
fn default_channels_are_the_devices_the_slots_were_bound_to() {
    let (stdout, stdout_mock) = OutputDevice::new_mock();
    let (stderr, stderr_mock) = OutputDevice::new_mock();
    let registry = BindingRegistry::with_channels(stdout, stderr);
    let stdout_before = registry.stdout().unwrap();
    let stderr_before = registry.stderr().unwrap();

    let mut guard = PromptGuard::new(
        PromptGuardOptions::default()
            .input(InputDevice::new_mock_from_lines(&[]))
            .registry(registry.clone()),
    );
    assert!(guard.stdout().ptr_eq(&stdout_before));
    assert!(guard.stderr().ptr_eq(&stderr_before));

    guard.start().unwrap();
    guard.pause().unwrap();
    assert!(registry.stdout().unwrap().ptr_eq(&stdout_before));
    assert!(registry.stderr().unwrap().ptr_eq(&stderr_before));

    slot_print!(registry, "while-suspended").unwrap();
    slot_eprintln!(registry, "err-while-suspended").unwrap();
    assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "while-suspended");
    assert_eq!(
        stderr_mock.get_copy_of_buffer_as_string(),
        "err-while-suspended\n"
    );

    guard.resume().unwrap();
    slot_print!(registry, "while-active").unwrap();
    let output = stdout_mock.get_copy_of_buffer_as_string();
    assert!(
        output.starts_with(&format!("while-suspended{CLEAR_LINE_AND_RETURN}while-active")),
        "{output:?}"
    );
    guard.stop().unwrap();
}

#[test]
fn stop_without_start_fails_and_mutates_nothing() {
    let mut it = local_harness(&[]);
    let before: Vec<Binding> = [SlotName::STDOUT, SlotName::STDERR, SlotName::CONSOLE]
        .iter()
        .map(|name| it.registry.descriptor(name).unwrap())
        .collect();

    let error = it.guard.stop().unwrap_err();

    assert!(matches!(error, PromptGuardError::IllegalTransition { .. }));
    assert!(error.to_string().contains("interface already stopped"));
    assert_eq!(it.guard.state(), LifecycleState::Inactive);
    for (name, before) in [SlotName::STDOUT, SlotName::STDERR, SlotName::CONSOLE]
        .iter()
        .zip(before)
    {
        assert!(it.registry.descriptor(name).unwrap().ptr_eq(&before));
    }
}

#[test]
fn stop_restores_original_descriptors_round_trip() {
    let (stdout, _) = OutputDevice::new_mock();
    let (stderr, _) = OutputDevice::new_mock();
    let registry = BindingRegistry::with_channels(stdout.clone(), stderr);

    // A pre-existing computed binding with a setter must come back as it was.
    registry.define(
        SlotName::STDOUT,
        Binding::computed_with_setter(
            move || SlotValue::Channel(stdout.clone()),
            |_| {},
        ),
    );
    let before = registry.descriptor(&SlotName::STDOUT).unwrap();

    let mut it = harness(registry, &[]);
    it.guard.start().unwrap();
    assert!(
        it.registry
            .assign(&SlotName::STDOUT, SlotValue::Channel(OutputDevice::new_stdout()))
            .is_err()
    );
    it.guard.pause().unwrap();
    it.guard.stop().unwrap();

    let after = it.registry.descriptor(&SlotName::STDOUT).unwrap();
    assert!(after.ptr_eq(&before));
    assert!(
        it.registry
            .assign(&SlotName::STDOUT, SlotValue::Channel(OutputDevice::new_stdout()))
            .is_ok()
    );
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn prompt_loop_and_run_dispatch_lines_then_close() {
    let mut it = local_harness(&["first", "second"]);
    let seen = Rc::new(RefCell::new(vec![]));
    let registry = it.registry.clone();

    it.guard
        .prompt_loop(Some({
            let seen = seen.clone();
            move |line: &str| {
                seen.borrow_mut().push(line.to_owned());
                slot_println!(registry, "echo {line}").unwrap();
            }
        }))
        .unwrap();
    let closed = Rc::new(RefCell::new(false));
    it.guard.on_close({
        let closed = closed.clone();
        move || *closed.borrow_mut() = true
    });

    it.guard.run().await.unwrap();

    assert_eq!(*seen.borrow(), vec!["first", "second"]);
    assert!(*closed.borrow());
    // Without create_interface, nothing stops the guard on close.
    assert_eq!(it.guard.state(), LifecycleState::Active);
    assert_eq!(
        it.editor_mock.get_copy_of_calls(),
        vec![
            LineEditorCall::Prompt,
            LineEditorCall::LineReceived("first".into()),
            LineEditorCall::RefreshLine,
            LineEditorCall::Prompt,
            LineEditorCall::LineReceived("second".into()),
            LineEditorCall::RefreshLine,
            LineEditorCall::Prompt,
        ]
    );
    it.guard.stop().unwrap();
}

#[tokio::test]
#[serial]
#[allow(clippy::needless_return)]
async fn create_interface_on_global_registry_stops_on_close() {
    let registry = BindingRegistry::global();
    let before = registry.descriptor(&SlotName::STDOUT).unwrap();
    let (stdout, stdout_mock) = OutputDevice::new_mock();
    let (stderr, _) = OutputDevice::new_mock();

    let mut guard = PromptGuard::create_interface(
        PromptGuardOptions::default()
            .output(stdout)
            .error(stderr)
            .input(InputDevice::new_mock_from_lines(&["ping"]))
            .prompt("$ "),
    )
    .unwrap();
    assert_eq!(guard.state(), LifecycleState::Active);
    assert!(guard.registry().ptr_eq(&registry));

    guard
        .prompt_loop(Some(|line: &str| {
            slot_println!(BindingRegistry::global(), "pong {line}").unwrap();
        }))
        .unwrap();
    guard.run().await.unwrap();

    assert_eq!(guard.state(), LifecycleState::Inactive);
    assert!(registry.descriptor(&SlotName::STDOUT).unwrap().ptr_eq(&before));

    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    assert!(output.contains("$ "), "{output}");
    assert!(output.contains("pong ping\n"), "{output}");
}

#[test]
#[serial]
fn dropping_a_started_guard_restores_the_global_registry() {
    let registry = BindingRegistry::global();
    let before = registry.descriptor(&SlotName::CONSOLE).unwrap();
    let (stdout, _) = OutputDevice::new_mock();
    let (stderr, _) = OutputDevice::new_mock();

    {
        let _guard = PromptGuard::create_interface(
            PromptGuardOptions::default()
                .output(stdout)
                .error(stderr)
                .input(InputDevice::new_mock_from_lines(&[])),
        )
        .unwrap();
        assert!(!registry.descriptor(&SlotName::CONSOLE).unwrap().ptr_eq(&before));
    }

    assert!(registry.descriptor(&SlotName::CONSOLE).unwrap().ptr_eq(&before));
}

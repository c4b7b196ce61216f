// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Shows a prompt while a background task keeps printing. Type a command and press
//! <kbd>Enter</kbd>, or <kbd>Ctrl+D</kbd> to quit.

use clap::Parser;
use miette::IntoDiagnostic;
use r3bl_prompt_guard::{BindingRegistry, DisplayPreference, PromptGuard,
                        PromptGuardOptions, SlotName, TracingConfig, WriterConfig,
                        slot_eprintln, slot_println, try_initialize_logging_global};
use std::{str::FromStr, time::Duration};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing_core::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    #[arg(long, short = 'p', default_value = "> ", help = "Prompt to display")]
    prompt: String,

    #[arg(
        long = "tick-ms",
        short = 't',
        default_value_t = 1_000,
        help = "Delay between background printouts, in milliseconds"
    )]
    tick_ms: u64,

    #[arg(long = "log-file", short = 'f', help = "Also write logs to this file")]
    log_file: Option<String>,

    #[arg(long = "log-level", short = 'l', default_value = "info", help = "Log level")]
    log_level: LevelFilter,
}

#[derive(Debug, PartialEq, EnumString, EnumIter, Display)]
enum Command {
    #[strum(ascii_case_insensitive)]
    Info,

    #[strum(ascii_case_insensitive)]
    Burst,

    #[strum(ascii_case_insensitive)]
    Warn,
}

fn get_info_message() -> String {
    let commands = Command::iter()
        .map(|it| it.to_string())
        .collect::<Vec<String>>();
    format!("Available commands: {commands:?}. Ctrl+D to quit.")
}

fn handle_line(line: &str) {
    let registry = BindingRegistry::global();
    let result = match Command::from_str(line.trim()) {
        Ok(Command::Info) => slot_println!(registry, "{}", get_info_message()),
        Ok(Command::Burst) => (1..=5).try_for_each(|it| slot_println!(registry, "burst {it}")),
        Ok(Command::Warn) => registry
            .console()
            .map_err(std::io::Error::from)
            .and_then(|console| console.warn("this is a warning")),
        Err(_) => slot_println!(registry, "you typed: {line}"),
    };
    if let Err(err) = result {
        _ = slot_eprintln!(registry, "can't write: {err}");
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_args = CliArgs::parse();

    let display = DisplayPreference::Slot(BindingRegistry::global(), SlotName::CONSOLE);
    let writer_config = match cli_args.log_file {
        Some(log_file) => WriterConfig::DisplayAndFile(display, log_file),
        None => WriterConfig::Display(display),
    };
    try_initialize_logging_global(
        TracingConfig::from(writer_config).with_level_filter(cli_args.log_level),
    )?;

    let mut guard = PromptGuard::create_interface(
        PromptGuardOptions::default().prompt(&cli_args.prompt),
    )?;

    let tick = Duration::from_millis(cli_args.tick_ms);
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        let mut count = 0_u64;
        loop {
            interval.tick().await;
            count += 1;
            if count.is_multiple_of(5) {
                tracing::info!(message = "ticker", count);
            } else {
                _ = slot_println!(BindingRegistry::global(), "tick {count}");
            }
        }
    });

    _ = slot_println!(BindingRegistry::global(), "{}", get_info_message());
    guard.prompt_loop(Some(handle_line))?;
    guard.run().await?;

    ticker.abort();
    slot_println!(BindingRegistry::global(), "bye").into_diagnostic()?;
    Ok(())
}

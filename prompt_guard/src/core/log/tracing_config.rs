// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BindingRegistry, SlotName, try_create_layers};
use std::fmt::{Debug, Formatter};
use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILE_NAME: &str = "prompt_guard_log.txt";

/// Configure where the logs go and how verbose they are. Use
/// [`crate::try_initialize_logging_global()`] or
/// [`crate::try_initialize_logging_thread_local()`] to install it.
///
/// Anything that converts `Into<TracingConfig>` can be passed to those functions:
///
/// ```no_run
/// use r3bl_prompt_guard::{
///     BindingRegistry, DisplayPreference, SlotName, TracingConfig, WriterConfig,
///     try_initialize_logging_global,
/// };
///
/// let config_1: TracingConfig = tracing_core::LevelFilter::INFO.into();
/// let config_2: TracingConfig = DisplayPreference::Stderr.into();
/// let config_3: TracingConfig =
///     WriterConfig::File("log.txt".to_string()).into();
/// let config_4: TracingConfig =
///     DisplayPreference::Slot(BindingRegistry::global(), SlotName::CONSOLE).into();
///
/// _ = try_initialize_logging_global(config_4);
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// Where log output is sent. The `String` is the path of the log file.
#[derive(Debug, Clone, PartialEq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Clone)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
    /// Each log event is written to whatever the slot is bound to *at that moment*. With
    /// a [`crate::PromptGuard`] active on the slot, log lines are printed above the
    /// prompt instead of on top of it.
    Slot(BindingRegistry, SlotName),
}

impl Debug for DisplayPreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayPreference::Stdout => write!(f, "Stdout"),
            DisplayPreference::Stderr => write!(f, "Stderr"),
            DisplayPreference::Slot(_, name) => write!(f, "Slot({name})"),
        }
    }
}

impl PartialEq for DisplayPreference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DisplayPreference::Stdout, DisplayPreference::Stdout)
            | (DisplayPreference::Stderr, DisplayPreference::Stderr) => true,
            (
                DisplayPreference::Slot(lhs_registry, lhs_name),
                DisplayPreference::Slot(rhs_registry, rhs_name),
            ) => lhs_registry.ptr_eq(rhs_registry) && lhs_name == rhs_name,
            _ => false,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_file(filename: Option<String>) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_file_and_display(
        filename: Option<String>,
        preferred_display: DisplayPreference,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}

impl TracingConfig {
    /// Global default subscriber. Once set, it can't be unset or changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created, or if a global subscriber
    /// has already been installed.
    pub fn install_global(self) -> miette::Result<()> {
        let layers = try_create_layers(self)?;
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|err| miette::miette!("Can't install global subscriber: {err}"))
    }

    /// Thread local subscriber, active until the returned guard is dropped. Great for
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created.
    pub fn install_thread_local(self) -> miette::Result<dispatcher::DefaultGuard> {
        let layers = try_create_layers(self)?;
        let subscriber = tracing_subscriber::registry().with(layers);
        Ok(tracing::subscriber::set_default(subscriber))
    }
}

impl From<LevelFilter> for TracingConfig {
    fn from(level_filter: LevelFilter) -> Self {
        Self {
            level_filter,
            writer_config: WriterConfig::File(DEFAULT_LOG_FILE_NAME.to_string()),
        }
    }
}

impl From<tracing::Level> for TracingConfig {
    fn from(level: tracing::Level) -> Self { LevelFilter::from_level(level).into() }
}

impl From<DisplayPreference> for TracingConfig {
    fn from(preferred_display: DisplayPreference) -> Self {
        Self::new_display(preferred_display)
    }
}

impl From<WriterConfig> for TracingConfig {
    fn from(writer_config: WriterConfig) -> Self {
        Self {
            level_filter: LevelFilter::DEBUG,
            writer_config,
        }
    }
}

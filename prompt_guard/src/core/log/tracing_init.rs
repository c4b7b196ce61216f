// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig, rolling_file_appender_impl};
use crate::{SlotWriter, ok};
use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Returns the layers. This does not initialize the tracing system. Returns [None] if
/// the writer config is [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    if matches!(tracing_config.writer_config, WriterConfig::None) {
        return Ok(None);
    }

    let level_filter = tracing_config.get_level_filter();

    let layers = {
        let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

        // Set the level filter from the tracing configuration. This is needed if you add
        // more layers which don't have a level filter.
        return_it.push(Box::new(level_filter));

        if let Some(layer) =
            try_create_display_layer(level_filter, tracing_config.get_writer_config())?
        {
            return_it.push(layer);
        }

        if let Some(layer) =
            try_create_file_layer(level_filter, tracing_config.get_writer_config())?
        {
            return_it.push(layer);
        }

        return_it
    };

    Ok(Some(layers))
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Currently infallible for display output. The signature matches
/// [`try_create_file_layer()`] so both compose the same way.
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Slot(registry, slot_name) => Some(Box::new(
                fmt_layer
                    .with_writer(SlotWriter::new(registry, slot_name))
                    .with_filter(level_filter),
            )),
        },
        _ => None,
    })
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, tracing_log_file_path)
        | WriterConfig::File(tracing_log_file_path) => {
            let file = rolling_file_appender_impl::try_create(&tracing_log_file_path)?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        _ => None,
    })
}

/// Global default subscriber, which once set, can't be unset or changed. This is great
/// for apps.
///
/// Logging is **disabled** if the level filter is [`LevelFilter::OFF`].
///
/// # Errors
///
/// Returns an error if the log file can't be created, or a global subscriber is already
/// installed.
pub fn try_initialize_logging_global(
    options: impl Into<TracingConfig>,
) -> miette::Result<()> {
    let it: TracingConfig = options.into();

    if matches!(it.get_level_filter(), LevelFilter::OFF) {
        return ok!();
    }

    it.install_global()
}

/// Thread local subscriber. This is great for tests. The subscriber is removed when the
/// returned guard is dropped.
///
/// Logging is **disabled** if the level filter is [`LevelFilter::OFF`], in which case
/// [None] is returned.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_initialize_logging_thread_local(
    options: impl Into<TracingConfig>,
) -> miette::Result<Option<dispatcher::DefaultGuard>> {
    let it: TracingConfig = options.into();

    if matches!(it.get_level_filter(), LevelFilter::OFF) {
        return Ok(None);
    }

    it.install_thread_local().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindingRegistry, OutputDevice, OutputDeviceExt, SlotName, SlotValue};

    #[test]
    fn test_try_create_display_layer() {
        let writer_config = WriterConfig::Display(DisplayPreference::Stdout);
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(LevelFilter::DEBUG, writer_config).unwrap();
        assert!(layer.is_some());
    }

    #[test]
    fn test_try_create_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("my_temp_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let writer_config = WriterConfig::File(file_path.clone());
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(LevelFilter::DEBUG, writer_config).unwrap();

        assert!(layer.is_some());
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_try_create_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("my_temp_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let tracing_config = TracingConfig {
            writer_config: WriterConfig::DisplayAndFile(
                DisplayPreference::Stdout,
                file_path.clone(),
            ),
            level_filter: LevelFilter::DEBUG,
        };

        let layers = try_create_layers(tracing_config).unwrap().unwrap();
        assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_writer_config_none_creates_no_layers() {
        let layers = try_create_layers(WriterConfig::None.into()).unwrap();
        assert!(layers.is_none());
    }

    #[test]
    fn test_level_filter_off_skips_install() {
        let config = TracingConfig::new_display(DisplayPreference::Stdout)
            .with_level_filter(LevelFilter::OFF);
        let guard = try_initialize_logging_thread_local(config).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_slot_display_writes_through_current_binding() {
        let registry = BindingRegistry::new();
        let (device, stdout_mock) = OutputDevice::new_mock();
        registry.define(SlotName::STDOUT, SlotValue::Channel(device));

        let config = TracingConfig::new_display(DisplayPreference::Slot(
            registry.clone(),
            SlotName::STDOUT,
        ))
        .with_level_filter(LevelFilter::INFO);
        let guard = try_initialize_logging_thread_local(config).unwrap();

        tracing::info!("first");
        tracing::debug!("filtered out");

        // Rebind the slot: the next event must follow the new binding.
        let (other_device, other_mock) = OutputDevice::new_mock();
        registry
            .assign(&SlotName::STDOUT, SlotValue::Channel(other_device))
            .unwrap();
        tracing::warn!("second");

        drop(guard);

        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("first"), "{output}");
        assert!(!output.contains("filtered out"), "{output}");
        assert!(!output.contains("second"), "{output}");

        let other_output = other_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(other_output.contains("second"), "{other_output}");
    }
}

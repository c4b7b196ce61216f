// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::{Context, IntoDiagnostic};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Creates a file appender that never rolls over. Don't wrap it in
/// `tracing_appender::non_blocking`, since the guard that flushes it would have to
/// outlive the subscriber.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
/// - The file (or its folder) can't be created
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access folder of {}. It might not exist, or you don't have the \
             required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or you don't have the \
             required permissions.",
            path.display()
        )
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(parent)
        .into_diagnostic()
        .wrap_err_with(|| format!("Can't create log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_fails_without_file_name() {
        assert!(try_create("/").is_err());
    }

    #[test]
    fn test_try_create_reports_unwritable_path_instead_of_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_folder = dir.path().join("plain_file");
        std::fs::write(&not_a_folder, "").unwrap();
        let file_path = not_a_folder.join("prompt_guard.log");

        let error = try_create(file_path.to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("Can't create log file"), "{error}");
    }

    #[test]
    fn test_try_create_makes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("prompt_guard.log");
        try_create(file_path.to_str().unwrap()).unwrap();
        assert!(file_path.exists());
    }
}

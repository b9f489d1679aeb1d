// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use acm_core::MigrateError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// Error for a source file that can not be read as a record or table.
    pub fn unreadable_source(path: &Path, err: MigrateError) -> Self {
        let error = CliError::new(format!("Can not read '{}'", path.display()));
        let error = match &err {
            MigrateError::UnknownMarker => error
                .with_context("The file does not start with ACM_RECORD or ACM_TABLE")
                .with_suggestion("Check that the path points at a record or table file"),
            MigrateError::UnsupportedVersion { found, expected } => error
                .with_context(format!(
                    "File format version {found}, this tool understands {expected}"
                ))
                .with_suggestion("Use a build of acm matching the writer of this file"),
            _ => error
                .with_context(err.to_string())
                .with_context("The file may be truncated or was not written by acm-core"),
        };
        error.with_source(err)
    }

    /// Error for a mapping that does not fit the source file.
    pub fn invalid_mapping(mapping: &str, err: MigrateError) -> Self {
        let error = CliError::new(format!("Invalid column mapping '{mapping}'"))
            .with_context(err.to_string());
        let error = match &err {
            MigrateError::MissingColumn { columns, .. } => error.with_suggestion(format!(
                "Source columns are numbered 0 to {}; inspect with: acm <source>",
                columns.saturating_sub(1)
            )),
            MigrateError::ColumnCount { .. } => {
                error.with_suggestion("Map between 1 and 64 target columns")
            }
            _ => error.with_suggestion(
                "Use comma-separated indexes, ranges like 0-3 (end exclusive), or N for a new column",
            ),
        };
        error.with_source(err)
    }

    /// Error for a migration target that already exists.
    pub fn target_exists(path: &Path) -> Self {
        CliError::new(format!("Target '{}' already exists", path.display()))
            .with_context("Migration never overwrites an existing file")
            .with_suggestion("Choose a new target path")
            .with_suggestion(format!("Remove the old file first: rm {}", path.display()))
    }
}

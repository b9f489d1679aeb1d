// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `acm <source> <target> <mapping>` - Copy a file into a new column layout

use crate::error::CliError;
use crate::output::{self, OutputFormat};
use acm_core::{ColumnMapping, Format};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct MigrationReport {
    source: Format,
    target: Format,
    path: PathBuf,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Migration completed: {}", self.target)
    }
}

pub fn migrate(source: &Path, target: &Path, mapping: &str, format: OutputFormat) -> Result<()> {
    let (bytes, source_format) = super::read_source(source)?;
    let columns: ColumnMapping = mapping
        .parse()
        .map_err(|err| CliError::invalid_mapping(mapping, err))?;
    let migrated = acm_core::migrate::migrate(&bytes, &columns)
        .map_err(|err| CliError::invalid_mapping(mapping, err))?;
    let target_format = Format::inspect(&migrated)?;

    write_new(target, &migrated)?;
    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        from = %source_format,
        to = %target_format,
        "wrote migrated file"
    );

    let report = MigrationReport {
        source: source_format,
        target: target_format,
        path: target.to_path_buf(),
    };
    output::print(&report, format)
}

/// Creates `path`, sizes it for `bytes` and fills it. Fails if it exists.
fn write_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(CliError::target_exists(path).with_source(err).into());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to create {}", path.display()));
        }
    };
    let context = || format!("failed to write {}", path.display());
    file.set_len(bytes.len() as u64).with_context(context)?;
    file.write_all(bytes).with_context(context)?;
    file.sync_all().with_context(context)?;
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod info;
pub mod migrate;

use crate::error::CliError;
use acm_core::Format;
use anyhow::{Context, Result};
use std::path::Path;

/// Reads `path` whole and identifies its layout.
fn read_source(path: &Path) -> Result<(Vec<u8>, Format)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let format = Format::inspect(&bytes).map_err(|err| CliError::unreadable_source(path, err))?;
    tracing::debug!(path = %path.display(), %format, "inspected source");
    Ok((bytes, format))
}

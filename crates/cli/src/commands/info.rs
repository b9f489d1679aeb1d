// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `acm <source>` - Print the layout summary of a file

use crate::output::{self, OutputFormat};
use anyhow::Result;
use std::path::Path;

pub fn info(source: &Path, format: OutputFormat) -> Result<()> {
    let (_, summary) = super::read_source(source)?;
    output::print(&summary, format)
}

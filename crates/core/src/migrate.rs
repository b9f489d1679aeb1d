// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Re-laying out stored buffers for a different column set.
//!
//! Migration works on raw bytes only; no schema is needed. Each target
//! column is either copied from a source column (both data slots plus its
//! status and selector bits) or added blank.

use crate::column::MAX_COLUMNS;
use crate::layout::{self, RowOffsets};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrateError {
    #[error("unsupported file type: no record or table marker")]
    UnknownMarker,
    #[error("unsupported format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("inconsistent {layout} geometry for {capacity} bytes: {reason}")]
    InvalidGeometry {
        layout: &'static str,
        capacity: usize,
        reason: &'static str,
    },
    #[error("invalid mapping token '{token}'")]
    InvalidToken { token: String },
    #[error("mapping references column {column}, source has {columns} columns")]
    MissingColumn { column: usize, columns: usize },
    #[error("mapping yields {count} columns, expected 1 to 64")]
    ColumnCount { count: usize },
}

/// Summary of a stored buffer, derived from its header and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Format {
    Record { columns: usize },
    Table { rows: usize, columns: usize },
}

impl Format {
    /// Identifies the layout of `bytes` and validates its geometry.
    pub fn inspect(bytes: &[u8]) -> Result<Self, MigrateError> {
        if layout::starts_with_marker(bytes, layout::RECORD_MARKER) {
            let columns = record_columns(bytes)?;
            check_version(bytes)?;
            Ok(Format::Record { columns })
        } else if layout::starts_with_marker(bytes, layout::TABLE_MARKER) {
            let (rows, columns) = table_geometry(bytes)?;
            Ok(Format::Table { rows, columns })
        } else {
            Err(MigrateError::UnknownMarker)
        }
    }

    pub fn columns(&self) -> usize {
        match *self {
            Format::Record { columns } | Format::Table { columns, .. } => columns,
        }
    }

    /// Row count; a record is a single row.
    pub fn rows(&self) -> usize {
        match *self {
            Format::Record { .. } => 1,
            Format::Table { rows, .. } => rows,
        }
    }

    /// Buffer size of the same layout with `columns` columns.
    pub fn size_with(&self, columns: usize) -> usize {
        match *self {
            Format::Record { .. } => layout::record_size(columns),
            Format::Table { rows, .. } => layout::table_size(columns, rows),
        }
    }

    fn header_size(&self) -> usize {
        match self {
            // Status and selector are rewritten per row.
            Format::Record { .. } => layout::RECORD_STATUS_OFFSET,
            Format::Table { .. } => layout::TABLE_DATA_OFFSET,
        }
    }

    fn row(&self, columns: usize, row: usize) -> RowOffsets {
        match self {
            Format::Record { .. } => RowOffsets::record(),
            Format::Table { .. } => RowOffsets::table_row(columns, row),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Record { columns } => write!(f, "ACM_RECORD {columns} columns"),
            Format::Table { rows, columns } => {
                write!(f, "ACM_TABLE {rows} rows, {columns} columns")
            }
        }
    }
}

/// Target column list: `Some(i)` copies source column `i`, `None` adds a
/// blank column.
///
/// Parsed from comma-separated tokens: a 0-based index, a half-open range
/// `start-end`, or `N`/`n` for a new column.
///
/// ```
/// use acm_core::ColumnMapping;
///
/// let mapping: ColumnMapping = "0-3,6,N,5".parse().unwrap();
/// assert_eq!(mapping.columns(), &[Some(0), Some(1), Some(2), Some(6), None, Some(5)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping(Vec<Option<usize>>);

impl ColumnMapping {
    pub fn new(columns: Vec<Option<usize>>) -> Self {
        Self(columns)
    }

    pub fn columns(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(&self, source_columns: usize) -> Result<(), MigrateError> {
        if self.0.is_empty() || self.0.len() > MAX_COLUMNS {
            return Err(MigrateError::ColumnCount {
                count: self.0.len(),
            });
        }
        match self.0.iter().flatten().find(|&&c| c >= source_columns) {
            Some(&column) => Err(MigrateError::MissingColumn {
                column,
                columns: source_columns,
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for ColumnMapping {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut columns = Vec::new();
        for token in s.split(',').map(str::trim) {
            let invalid = || MigrateError::InvalidToken {
                token: token.to_string(),
            };
            if token.eq_ignore_ascii_case("n") {
                columns.push(None);
            } else if let Some((start, end)) = token.split_once('-') {
                let start: usize = start.trim().parse().map_err(|_| invalid())?;
                let end: usize = end.trim().parse().map_err(|_| invalid())?;
                if start >= end {
                    return Err(invalid());
                }
                columns.extend((start..end).map(Some));
            } else {
                columns.push(Some(token.parse().map_err(|_| invalid())?));
            }
        }
        Ok(Self(columns))
    }
}

/// Copies `source` into a freshly sized buffer laid out for `mapping`.
///
/// Committed values, draft slots, emptiness and (for tables) the cursor
/// survive; blank columns read as empty zeros.
pub fn migrate(source: &[u8], mapping: &ColumnMapping) -> Result<Vec<u8>, MigrateError> {
    let format = Format::inspect(source)?;
    let old_columns = format.columns();
    mapping.validate(old_columns)?;
    let new_columns = mapping.len();

    let mut target = vec![0u8; format.size_with(new_columns)];
    let header = format.header_size();
    target[..header].copy_from_slice(&source[..header]);

    for row in 0..format.rows() {
        let from = format.row(old_columns, row);
        let to = format.row(new_columns, row);
        let status = layout::read_u64(source, from.status);
        let selector = layout::read_u64(source, from.selector);
        let mut new_status = 0u64;
        let mut new_selector = 0u64;

        for (j, column) in mapping.columns().iter().enumerate() {
            let Some(i) = *column else {
                continue;
            };
            new_status |= ((status >> i) & 1) << j;
            new_selector |= ((selector >> i) & 1) << j;
            let src = from.data + i * layout::COLUMN_SIZE;
            let dst = to.data + j * layout::COLUMN_SIZE;
            target[dst..dst + layout::COLUMN_SIZE]
                .copy_from_slice(&source[src..src + layout::COLUMN_SIZE]);
        }
        layout::write_u64(&mut target, to.status, new_status);
        layout::write_u64(&mut target, to.selector, new_selector);
    }

    tracing::debug!(%format, old_columns, new_columns, "migrated buffer");
    Ok(target)
}

fn check_version(bytes: &[u8]) -> Result<(), MigrateError> {
    let found = layout::read_u32(bytes, layout::VERSION_OFFSET);
    if found != layout::FORMAT_VERSION {
        return Err(MigrateError::UnsupportedVersion {
            found,
            expected: layout::FORMAT_VERSION,
        });
    }
    Ok(())
}

fn record_columns(bytes: &[u8]) -> Result<usize, MigrateError> {
    let geometry = |reason| MigrateError::InvalidGeometry {
        layout: "record",
        capacity: bytes.len(),
        reason,
    };
    let data = bytes
        .len()
        .checked_sub(layout::RECORD_DATA_OFFSET)
        .ok_or_else(|| geometry("shorter than the header"))?;
    if data % layout::COLUMN_SIZE != 0 {
        return Err(geometry("data region is not a whole number of columns"));
    }
    let columns = data / layout::COLUMN_SIZE;
    if columns > MAX_COLUMNS {
        return Err(geometry("more than 64 columns"));
    }
    Ok(columns)
}

fn table_geometry(bytes: &[u8]) -> Result<(usize, usize), MigrateError> {
    let geometry = |reason| MigrateError::InvalidGeometry {
        layout: "table",
        capacity: bytes.len(),
        reason,
    };
    if bytes.len() < layout::TABLE_DATA_OFFSET {
        return Err(geometry("shorter than the header"));
    }
    check_version(bytes)?;

    let rows = layout::read_u32(bytes, layout::TABLE_ROWS_OFFSET) as usize;
    if rows == 0 {
        return Err(geometry("zero rows"));
    }
    let body = bytes.len() - layout::TABLE_DATA_OFFSET;
    if body % rows != 0 {
        return Err(geometry("data region is not a whole number of rows"));
    }
    let data = (body / rows)
        .checked_sub(layout::ROW_HEADER_SIZE)
        .ok_or_else(|| geometry("rows shorter than their header"))?;
    if data % layout::COLUMN_SIZE != 0 {
        return Err(geometry("row is not a whole number of columns"));
    }
    let columns = data / layout::COLUMN_SIZE;
    if columns == 0 || columns > MAX_COLUMNS {
        return Err(geometry("column count outside 1 to 64"));
    }
    let cursor = layout::read_u32(bytes, layout::TABLE_CURSOR_OFFSET) as usize;
    if cursor >= rows {
        return Err(geometry("cursor past the last row"));
    }
    Ok((rows, columns))
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;

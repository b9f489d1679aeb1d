// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for column definition and buffer handling

use crate::column::{Kind, ValueType};
use thiserror::Error;

/// Errors raised by the column graph, the storage engine and its adapters.
///
/// All of these are configuration or programming errors: nothing is
/// partially applied when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcmError {
    #[error("can not link {column:?} column to {reference:?} column, input/output type mismatch")]
    TypeMismatch { column: Kind, reference: Kind },
    #[error("incorrect buffer capacity {actual}, expected {expected}")]
    InvalidCapacity { expected: usize, actual: usize },
    #[error(
        "incorrect table geometry for capacity {capacity}: implies {columns} columns and {rows} rows"
    )]
    InvalidGeometry {
        capacity: usize,
        rows: usize,
        columns: usize,
    },
    #[error("can not process {input:?} value, column {column} type is {kind:?}")]
    UnsupportedOperation {
        column: usize,
        kind: Kind,
        input: ValueType,
    },
    #[error("column limit of {limit} exceeded")]
    ColumnLimitExceeded { limit: usize },
    #[error("unknown column: {0}")]
    UnknownColumn(usize),
    #[error("row {row} out of range, table has {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("unsupported format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("columns have to be defined before a table buffer can be attached")]
    EmptySchema,
}

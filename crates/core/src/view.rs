// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only access to committed and draft column values

use crate::column::ColumnId;

/// Read-only view over one row of column data.
///
/// Column functions receive a view over the row they are being applied to,
/// so they can read sibling columns' committed or draft state.
///
/// Column ids must come from the schema the record or table was attached
/// with. Reads are not bounds checked in release builds.
pub trait View {
    /// Committed value.
    fn get_long(&self, column: ColumnId) -> i64;

    /// Committed value.
    fn get_double(&self, column: ColumnId) -> f64;

    /// Uncommitted value.
    fn get_draft_long(&self, column: ColumnId) -> i64;

    /// Uncommitted value.
    fn get_draft_double(&self, column: ColumnId) -> f64;

    /// True if the column has not been committed since the last reset.
    fn is_empty(&self, column: ColumnId) -> bool;
}

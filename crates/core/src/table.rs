// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-row storage layout with a cursor.
//!
//! Every row carries its own status word, selector word and data region, so
//! committing or resetting one row never touches another. `update`,
//! `commit`, `reset` and the [`View`] methods act on the row under the
//! cursor; [`Table::get_long_at`] and friends read any row directly.

use crate::column::{ColumnId, Schema, Value};
use crate::engine::{Cells, Engine};
use crate::error::AcmError;
use crate::layout::{self, RowOffsets};
use crate::view::View;
use std::sync::Arc;

/// A fixed number of rows of accumulated columns in a caller-owned buffer.
#[derive(Debug)]
pub struct Table<B> {
    engine: Engine<B>,
    rows: usize,
}

impl<B> Table<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Attaches to `buffer`.
    ///
    /// A buffer carrying the table marker is resumed and must match the
    /// stored row count. Otherwise the row count is derived from the
    /// capacity, every row is reset and the header is written.
    pub fn attach(schema: Arc<Schema>, buffer: B) -> Result<Self, AcmError> {
        if schema.is_empty() {
            return Err(AcmError::EmptySchema);
        }
        if layout::starts_with_marker(buffer.as_ref(), layout::TABLE_MARKER) {
            Self::resume(schema, buffer)
        } else {
            Self::initialize(schema, buffer)
        }
    }

    fn resume(schema: Arc<Schema>, buffer: B) -> Result<Self, AcmError> {
        let columns = schema.len();
        let bytes = buffer.as_ref();
        let capacity = bytes.len();
        if capacity < layout::TABLE_DATA_OFFSET {
            return Err(AcmError::InvalidGeometry {
                capacity,
                rows: 0,
                columns: 0,
            });
        }

        let found = layout::read_u32(bytes, layout::VERSION_OFFSET);
        if found != layout::FORMAT_VERSION {
            return Err(AcmError::UnsupportedVersion {
                found,
                expected: layout::FORMAT_VERSION,
            });
        }
        let rows = layout::read_u32(bytes, layout::TABLE_ROWS_OFFSET) as usize;
        if rows == 0 || layout::table_size(columns, rows) != capacity {
            return Err(AcmError::InvalidGeometry {
                capacity,
                rows,
                columns: implied_columns(capacity, rows),
            });
        }
        let cursor = layout::read_u32(bytes, layout::TABLE_CURSOR_OFFSET) as usize;
        if cursor >= rows {
            return Err(AcmError::RowOutOfRange { row: cursor, rows });
        }

        let mut engine = Engine::new(schema, buffer, RowOffsets::table_row(columns, cursor));
        for row in 0..rows {
            engine.repoint(RowOffsets::table_row(columns, row));
            let repaired = engine.reconcile();
            if repaired != 0 {
                tracing::warn!(row, repaired, "completed interrupted commit");
            }
        }
        engine.repoint(RowOffsets::table_row(columns, cursor));
        tracing::debug!(columns, rows, cursor, "resumed table");
        Ok(Self { engine, rows })
    }

    fn initialize(schema: Arc<Schema>, buffer: B) -> Result<Self, AcmError> {
        let columns = schema.len();
        let capacity = buffer.as_ref().len();
        let row_size = layout::row_size(columns);
        let body = capacity.saturating_sub(layout::TABLE_DATA_OFFSET);
        let rows = body / row_size;
        if capacity < layout::TABLE_DATA_OFFSET
            || body % row_size != 0
            || rows == 0
            || u32::try_from(rows).is_err()
        {
            return Err(AcmError::InvalidCapacity {
                expected: layout::table_size(columns, rows.max(1)),
                actual: capacity,
            });
        }

        let mut engine = Engine::new(schema, buffer, RowOffsets::table_row(columns, 0));
        for row in 0..rows {
            engine.repoint(RowOffsets::table_row(columns, row));
            engine.reset();
        }
        engine.repoint(RowOffsets::table_row(columns, 0));

        let bytes = engine.bytes_mut();
        layout::write_u32(bytes, layout::VERSION_OFFSET, layout::FORMAT_VERSION);
        layout::write_u32(bytes, layout::TABLE_CURSOR_OFFSET, 0);
        layout::write_u32(bytes, layout::TABLE_ROWS_OFFSET, rows as u32);
        layout::write_marker(bytes, layout::TABLE_MARKER);
        tracing::debug!(columns, rows, "initialized table");
        Ok(Self { engine, rows })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.engine.schema()
    }

    /// Table capacity.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row that `update`, `commit` and `reset` act on.
    pub fn cursor(&self) -> usize {
        layout::read_u32(self.engine.bytes(), layout::TABLE_CURSOR_OFFSET) as usize
    }

    /// Moves the cursor. Uncommitted drafts of the row being left are
    /// discarded; staying on the current row keeps them.
    pub fn set_cursor(&mut self, row: usize) -> Result<(), AcmError> {
        self.check_row(row)?;
        if row == self.cursor() {
            return Ok(());
        }
        let discarded = self.engine.take_provisioned();
        if discarded != 0 {
            tracing::debug!(from = self.cursor(), to = row, discarded, "dropped uncommitted drafts");
        }
        let offsets = RowOffsets::table_row(self.columns(), row);
        layout::write_u32(self.engine.bytes_mut(), layout::TABLE_CURSOR_OFFSET, row as u32);
        self.engine.repoint(offsets);
        Ok(())
    }

    /// Resets `row` without moving the cursor, e.g. to clear a row before
    /// moving onto it. Clearing data and moving the cursor are two separate
    /// steps.
    pub fn reset_row(&mut self, row: usize) -> Result<(), AcmError> {
        self.check_row(row)?;
        let cursor = self.cursor();
        if row == cursor {
            self.engine.reset();
            return Ok(());
        }

        let pending = self.engine.take_provisioned();
        let current = self.engine.offsets();
        let target = RowOffsets::table_row(self.columns(), row);
        self.engine.repoint(target);
        self.engine.reset();
        self.engine.repoint(current);
        self.engine.restore_provisioned(pending);
        Ok(())
    }

    /// Committed value of any row, independent of the cursor.
    pub fn get_long_at(&self, row: usize, column: ColumnId) -> Result<i64, AcmError> {
        Ok(self.row_view(row, column)?.get_long(column))
    }

    /// Committed value of any row, independent of the cursor.
    pub fn get_double_at(&self, row: usize, column: ColumnId) -> Result<f64, AcmError> {
        Ok(self.row_view(row, column)?.get_double(column))
    }

    /// Emptiness of a column in any row, independent of the cursor.
    pub fn is_empty_at(&self, row: usize, column: ColumnId) -> Result<bool, AcmError> {
        Ok(self.row_view(row, column)?.is_empty(column))
    }

    /// See [`Record::update`](crate::Record::update).
    pub fn update(&mut self, column: ColumnId, value: impl Into<Value>) -> Result<(), AcmError> {
        self.engine.update(column, value.into())
    }

    pub fn set_long(&mut self, column: ColumnId, value: i64) -> Result<(), AcmError> {
        self.engine.set(column, Value::Long(value))
    }

    pub fn set_double(&mut self, column: ColumnId, value: f64) -> Result<(), AcmError> {
        self.engine.set(column, Value::Double(value))
    }

    /// Commits the row under the cursor.
    pub fn commit(&mut self) {
        self.engine.commit();
    }

    /// Resets the row under the cursor.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn into_inner(self) -> B {
        self.engine.into_inner()
    }

    fn columns(&self) -> usize {
        self.engine.schema().len()
    }

    fn check_row(&self, row: usize) -> Result<(), AcmError> {
        if row >= self.rows {
            return Err(AcmError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(())
    }

    fn row_view(&self, row: usize, column: ColumnId) -> Result<Cells<&[u8]>, AcmError> {
        self.check_row(row)?;
        self.engine.schema().column(column)?;
        let offsets = RowOffsets::table_row(self.columns(), row);
        Ok(Cells::new(self.engine.bytes(), offsets))
    }
}

impl<B> View for Table<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn get_long(&self, column: ColumnId) -> i64 {
        self.engine.view_of(column).get_long(column)
    }

    fn get_double(&self, column: ColumnId) -> f64 {
        self.engine.view_of(column).get_double(column)
    }

    fn get_draft_long(&self, column: ColumnId) -> i64 {
        self.engine.view_of(column).get_draft_long(column)
    }

    fn get_draft_double(&self, column: ColumnId) -> f64 {
        self.engine.view_of(column).get_draft_double(column)
    }

    fn is_empty(&self, column: ColumnId) -> bool {
        self.engine.view_of(column).is_empty(column)
    }
}

/// Column count a table of `rows` rows would need to fill `capacity`.
fn implied_columns(capacity: usize, rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    let row_size = capacity.saturating_sub(layout::TABLE_DATA_OFFSET) / rows;
    row_size.saturating_sub(layout::ROW_HEADER_SIZE) / layout::COLUMN_SIZE
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;

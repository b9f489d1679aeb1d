// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-record storage layout

use crate::column::{ColumnId, Schema, Value};
use crate::engine::Engine;
use crate::error::AcmError;
use crate::layout::{self, RowOffsets};
use crate::view::View;
use std::sync::Arc;

/// One set of accumulated columns stored in a caller-owned buffer.
///
/// The buffer can be anything byte-addressable: a `Vec<u8>`, a mutable
/// slice, or a memory-mapped file. Its size must equal
/// [`Schema::record_size`].
#[derive(Debug)]
pub struct Record<B> {
    engine: Engine<B>,
}

impl<B> Record<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Attaches to `buffer`, initializing it if it does not carry the record
    /// marker yet and resuming from its contents otherwise.
    pub fn attach(schema: Arc<Schema>, buffer: B) -> Result<Self, AcmError> {
        let expected = schema.record_size();
        let actual = buffer.as_ref().len();
        if actual != expected {
            return Err(AcmError::InvalidCapacity { expected, actual });
        }

        let mut engine = Engine::new(schema, buffer, RowOffsets::record());
        if layout::starts_with_marker(engine.bytes(), layout::RECORD_MARKER) {
            let found = layout::read_u32(engine.bytes(), layout::VERSION_OFFSET);
            if found != layout::FORMAT_VERSION {
                return Err(AcmError::UnsupportedVersion {
                    found,
                    expected: layout::FORMAT_VERSION,
                });
            }
            let repaired = engine.reconcile();
            if repaired != 0 {
                tracing::warn!(repaired, "completed interrupted commit");
            }
            tracing::debug!(columns = engine.schema().len(), "resumed record");
        } else {
            engine.reset();
            let bytes = engine.bytes_mut();
            layout::write_u32(bytes, layout::VERSION_OFFSET, layout::FORMAT_VERSION);
            layout::write_marker(bytes, layout::RECORD_MARKER);
            tracing::debug!(columns = engine.schema().len(), "initialized record");
        }
        Ok(Self { engine })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.engine.schema()
    }

    /// Applies the column's function to `value` and recomputes linked
    /// columns. Results stay in draft until [`commit`](Self::commit).
    pub fn update(&mut self, column: ColumnId, value: impl Into<Value>) -> Result<(), AcmError> {
        self.engine.update(column, value.into())
    }

    /// Sets a draft value without triggering any calculation, e.g. initial
    /// or cascading values. [`commit`](Self::commit) is still required.
    pub fn set_long(&mut self, column: ColumnId, value: i64) -> Result<(), AcmError> {
        self.engine.set(column, Value::Long(value))
    }

    /// See [`set_long`](Self::set_long).
    pub fn set_double(&mut self, column: ColumnId, value: f64) -> Result<(), AcmError> {
        self.engine.set(column, Value::Double(value))
    }

    /// Increments the revision column (if present) and makes all draft
    /// values visible.
    pub fn commit(&mut self) {
        self.engine.commit();
    }

    /// Increments the revision column (if present) and sets every other
    /// column to zero. No commit needed.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Detaches, handing the buffer back.
    pub fn into_inner(self) -> B {
        self.engine.into_inner()
    }
}

impl<B> View for Record<B>
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

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

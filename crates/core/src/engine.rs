// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft/commit/reset state machine over one row of column data.
//!
//! Every column owns two mirrored 8-byte slots. Updates are written into the
//! draft slot and the column is marked in the in-memory provisioned word.
//! `commit` flips the selector bits of all provisioned columns, turning the
//! draft slots into committed ones without copying any bytes, then marks
//! them non-empty in the status word.
//!
//! The selector word is always stored before the status word. A process that
//! dies between the two stores leaves a flipped selector with a stale status;
//! attach reconciliation (`status |= selector`) repairs that.

use crate::column::{ColumnId, Schema, Value};
use crate::error::AcmError;
use crate::layout::{self, RowOffsets};
use crate::view::View;
use std::sync::Arc;

/// Raw access to one row: status word, selector word and data slots.
#[derive(Debug)]
pub(crate) struct Cells<B> {
    buffer: B,
    offsets: RowOffsets,
    provisioned: u64,
}

impl<B: AsRef<[u8]>> Cells<B> {
    pub(crate) fn new(buffer: B, offsets: RowOffsets) -> Self {
        Self {
            buffer,
            offsets,
            provisioned: 0,
        }
    }

    fn bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub(crate) fn status(&self) -> u64 {
        layout::read_u64(self.bytes(), self.offsets.status)
    }

    pub(crate) fn selector(&self) -> u64 {
        layout::read_u64(self.bytes(), self.offsets.selector)
    }

    fn slot(&self, column: ColumnId, committed: bool) -> usize {
        let mut slot = (self.selector() >> column.index()) & 1;
        if committed {
            slot ^= 1;
        }
        self.offsets.data + layout::slot_offset(column.index(), slot)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cells<B> {
    /// Writes the draft slot and marks the column for the next commit.
    fn provision(&mut self, column: ColumnId, value: Value) {
        let offset = self.slot(column, false);
        let bytes = self.buffer.as_mut();
        match value {
            Value::Long(v) => layout::write_i64(bytes, offset, v),
            Value::Double(v) => layout::write_f64(bytes, offset, v),
        }
        self.provisioned |= column.mask();
    }

    fn write_status(&mut self, status: u64) {
        let offset = self.offsets.status;
        layout::write_u64(self.buffer.as_mut(), offset, status);
    }

    fn write_selector(&mut self, selector: u64) {
        let offset = self.offsets.selector;
        layout::write_u64(self.buffer.as_mut(), offset, selector);
    }
}

impl<B: AsRef<[u8]>> View for Cells<B> {
    fn get_long(&self, column: ColumnId) -> i64 {
        layout::read_i64(self.bytes(), self.slot(column, true))
    }

    fn get_double(&self, column: ColumnId) -> f64 {
        layout::read_f64(self.bytes(), self.slot(column, true))
    }

    fn get_draft_long(&self, column: ColumnId) -> i64 {
        layout::read_i64(self.bytes(), self.slot(column, false))
    }

    fn get_draft_double(&self, column: ColumnId) -> f64 {
        layout::read_f64(self.bytes(), self.slot(column, false))
    }

    fn is_empty(&self, column: ColumnId) -> bool {
        self.status() & column.mask() == 0
    }
}

/// Storage engine shared by the record and table adapters.
///
/// The adapters validate buffer geometry once at attach time; afterwards the
/// engine trusts its offsets.
#[derive(Debug)]
pub(crate) struct Engine<B> {
    schema: Arc<Schema>,
    cells: Cells<B>,
    /// Reused cascade work stack.
    pending: Vec<(ColumnId, Value)>,
}

impl<B> Engine<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    pub(crate) fn new(schema: Arc<Schema>, buffer: B, offsets: RowOffsets) -> Self {
        let pending = Vec::with_capacity(schema.len());
        Self {
            schema,
            cells: Cells::new(buffer, offsets),
            pending,
        }
    }

    pub(crate) fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.cells.buffer.as_ref()
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        self.cells.buffer.as_mut()
    }

    pub(crate) fn into_inner(self) -> B {
        self.cells.buffer
    }

    pub(crate) fn offsets(&self) -> RowOffsets {
        self.cells.offsets
    }

    /// Points the engine at another row. Pending drafts stay provisioned.
    pub(crate) fn repoint(&mut self, offsets: RowOffsets) {
        self.cells.offsets = offsets;
    }

    /// Drops the provisioned word, returning what it held.
    pub(crate) fn take_provisioned(&mut self) -> u64 {
        std::mem::take(&mut self.cells.provisioned)
    }

    pub(crate) fn restore_provisioned(&mut self, provisioned: u64) {
        self.cells.provisioned = provisioned;
    }

    pub(crate) fn view(&self) -> &dyn View {
        &self.cells
    }

    /// View for reading `column` from outside a function call. The id must
    /// belong to this engine's schema.
    pub(crate) fn view_of(&self, column: ColumnId) -> &dyn View {
        debug_assert!(
            column.index() < self.schema.len(),
            "column {} is not part of this {}-column schema",
            column.index(),
            self.schema.len()
        );
        &self.cells
    }

    /// Applies the column's function to `value` and cascades the result
    /// through linked columns before returning.
    pub(crate) fn update(&mut self, column: ColumnId, value: Value) -> Result<(), AcmError> {
        let kind = self.schema.column(column)?.kind();
        if kind.input() != value.value_type() {
            return Err(AcmError::UnsupportedOperation {
                column: column.index(),
                kind,
                input: value.value_type(),
            });
        }
        self.cascade(column, value);
        Ok(())
    }

    /// Writes the draft slot without invoking any function.
    pub(crate) fn set(&mut self, column: ColumnId, value: Value) -> Result<(), AcmError> {
        let kind = self.schema.column(column)?.kind();
        if kind.output() != value.value_type() {
            return Err(AcmError::UnsupportedOperation {
                column: column.index(),
                kind,
                input: value.value_type(),
            });
        }
        self.cells.provision(column, value);
        Ok(())
    }

    /// Bumps the revision column and promotes every draft written since the
    /// last commit.
    pub(crate) fn commit(&mut self) {
        self.bump_revision();
        let provisioned = self.take_provisioned();
        let selector = self.cells.selector() ^ provisioned;
        self.cells.write_selector(selector);
        let status = self.cells.status() | provisioned;
        self.cells.write_status(status);
    }

    /// Zeroes every column except the revision, bumps the revision and starts
    /// a new epoch in which every column is empty.
    pub(crate) fn reset(&mut self) {
        let revision = self.schema.revision();
        for column in self.schema.columns() {
            if Some(column.id()) == revision {
                continue;
            }
            self.cells
                .provision(column.id(), Value::zero(column.kind().output()));
        }
        self.bump_revision();
        let provisioned = self.take_provisioned();
        let selector = self.cells.selector() ^ provisioned;
        self.cells.write_selector(selector);
        self.cells.write_status(0);
    }

    /// Completes a commit interrupted between the selector and status stores.
    ///
    /// Returns the status bits that had to be set.
    pub(crate) fn reconcile(&mut self) -> u64 {
        let status = self.cells.status();
        let merged = status | self.cells.selector();
        self.cells.write_status(merged);
        merged & !status
    }

    fn bump_revision(&mut self) {
        if let Some(revision) = self.schema.revision() {
            let current = self.cells.get_long(revision);
            self.cascade(revision, Value::Long(current));
        }
    }

    /// Depth-first, in link order, on an explicit stack.
    fn cascade(&mut self, column: ColumnId, input: Value) {
        let schema = &*self.schema;
        let cells = &mut self.cells;
        let pending = &mut self.pending;

        pending.clear();
        pending.push((column, input));
        while let Some((id, input)) = pending.pop() {
            let def = &schema.columns()[id.index()];
            // Links are type-checked when defined, so a mismatch is unreachable.
            let Some(output) = def.function().apply(&*cells, id, def.reference(), input) else {
                continue;
            };
            cells.provision(id, output);
            pending.extend(def.links().iter().rev().map(|&link| (link, output)));
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

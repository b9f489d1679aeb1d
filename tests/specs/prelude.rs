//! Shared helpers for behavioral specs

#![allow(dead_code)]

pub use acm_core::functions::{double, long};
pub use acm_core::{AcmError, ColumnId, Function, Record, Schema, SchemaBuilder, Table, View};
pub use similar_asserts::assert_eq;
pub use std::sync::Arc;

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-9;

pub fn assert_close(expected: f64, actual: f64) {
    assert!(
        (expected - actual).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Attaches a record to a zeroed buffer of the right size.
pub fn fresh_record(schema: &Arc<Schema>) -> Record<Vec<u8>> {
    Record::attach(schema.clone(), vec![0u8; schema.record_size()]).unwrap()
}

/// Attaches a table of `rows` rows to a zeroed buffer of the right size.
pub fn fresh_table(schema: &Arc<Schema>, rows: usize) -> Table<Vec<u8>> {
    Table::attach(schema.clone(), vec![0u8; schema.table_size(rows)]).unwrap()
}

/// Detaches and re-attaches, as a restarted process would.
pub fn reopen_record(schema: &Arc<Schema>, record: Record<Vec<u8>>) -> Record<Vec<u8>> {
    Record::attach(schema.clone(), record.into_inner()).unwrap()
}

/// Committed long values of `columns`, for whole-state comparisons.
pub fn longs(view: &dyn View, columns: &[ColumnId]) -> Vec<i64> {
    columns.iter().map(|&c| view.get_long(c)).collect()
}

/// Emptiness flags of `columns`.
pub fn emptiness(view: &dyn View, columns: &[ColumnId]) -> Vec<bool> {
    columns.iter().map(|&c| view.is_empty(c)).collect()
}

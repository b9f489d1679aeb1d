//! Table cursor specs
//!
//! Verify cursor movement, row resets and table geometry checks.

use crate::prelude::*;
use crate::prelude::assert_eq;

fn single_sum() -> (Arc<Schema>, ColumnId) {
    let mut builder = Schema::builder();
    let sum = builder.define(Function::long(long::sum)).unwrap();
    (builder.build(), sum)
}

fn filled(rows: usize) -> (Arc<Schema>, ColumnId, Table<Vec<u8>>) {
    let (schema, sum) = single_sum();
    let mut table = fresh_table(&schema, rows);
    for row in 0..rows {
        table.set_cursor(row).unwrap();
        table.update(sum, (row as i64 + 1) * 100).unwrap();
        table.commit();
    }
    (schema, sum, table)
}

fn column(table: &Table<Vec<u8>>, sum: ColumnId) -> Vec<i64> {
    (0..table.rows())
        .map(|row| table.get_long_at(row, sum).unwrap())
        .collect()
}

#[test]
fn row_count_is_derived_from_capacity() {
    let (schema, _) = single_sum();
    let table = fresh_table(&schema, 7);

    assert_eq!(table.rows(), 7);
    assert_eq!(table.cursor(), 0);
}

#[test]
fn operations_follow_the_cursor() {
    let (_, sum, mut table) = filled(3);

    table.set_cursor(1).unwrap();
    table.update(sum, 5_i64).unwrap();
    table.commit();

    assert_eq!(table.get_long(sum), 205);
    assert_eq!(column(&table, sum), vec![100, 205, 300]);
}

#[test]
fn reset_row_leaves_cursor_and_current_row_alone() {
    let (_, sum, mut table) = filled(3);
    table.set_cursor(2).unwrap();
    table.update(sum, 1_i64).unwrap();

    table.reset_row(0).unwrap();
    table.commit();

    assert_eq!(table.cursor(), 2);
    assert_eq!(column(&table, sum), vec![0, 200, 301]);
    assert!(table.is_empty_at(0, sum).unwrap());
}

#[test]
fn reset_clears_only_the_row_under_the_cursor() {
    let (_, sum, mut table) = filled(3);
    table.set_cursor(1).unwrap();

    table.reset();

    assert_eq!(column(&table, sum), vec![100, 0, 300]);
    assert!(table.is_empty(sum));
    assert!(!table.is_empty_at(2, sum).unwrap());
}

#[test]
fn reopened_table_resumes_at_stored_cursor() {
    let (schema, sum, mut table) = filled(4);
    table.set_cursor(3).unwrap();
    let bytes = table.into_inner();

    let table = Table::attach(schema, bytes).unwrap();

    assert_eq!(table.cursor(), 3);
    assert_eq!(table.get_long(sum), 400);
    assert_eq!(column(&table, sum), vec![100, 200, 300, 400]);
}

#[test]
fn out_of_range_rows_are_rejected() {
    let (_, sum, mut table) = filled(2);

    assert_eq!(
        table.set_cursor(2),
        Err(AcmError::RowOutOfRange { row: 2, rows: 2 })
    );
    assert_eq!(
        table.get_long_at(5, sum),
        Err(AcmError::RowOutOfRange { row: 5, rows: 2 })
    );
    assert_eq!(table.cursor(), 1);
}

#[test]
fn capacity_must_hold_whole_rows() {
    let (schema, _) = single_sum();
    let size = schema.table_size(3) - 8;

    let err = Table::attach(schema, vec![0u8; size]).unwrap_err();

    assert!(matches!(err, AcmError::InvalidCapacity { .. }));
}

#[test]
fn stored_geometry_must_match_columns() {
    let (_, _, table) = filled(2);
    let bytes = table.into_inner();
    let mut builder = Schema::builder();
    builder.define(Function::long(long::sum)).unwrap();
    builder.define(Function::long(long::sum)).unwrap();

    let err = Table::attach(builder.build(), bytes).unwrap_err();

    assert!(matches!(err, AcmError::InvalidGeometry { rows: 2, .. }));
}

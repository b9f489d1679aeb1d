// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for CLI integration tests.

#![allow(dead_code)]

use acm_core::functions::{double, long};
use acm_core::{ColumnId, Function, Record, Schema, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct Columns {
    pub price: ColumnId,
    pub volume: ColumnId,
    pub high: ColumnId,
}

/// Three columns: last price, summed volume, max price.
pub fn schema() -> (Arc<Schema>, Columns) {
    let mut builder = Schema::builder();
    let price = builder.define(Function::double(double::last)).unwrap();
    let volume = builder.define(Function::long(long::sum)).unwrap();
    let high = builder.define(Function::double(double::max)).unwrap();
    (builder.build(), Columns { price, volume, high })
}

/// Writes a record with price 101.5 and volume 300 committed.
pub fn write_record(dir: &TempDir, name: &str) -> PathBuf {
    let (schema, c) = schema();
    let mut record = Record::attach(schema.clone(), vec![0u8; schema.record_size()]).unwrap();
    record.update(c.price, 101.5).unwrap();
    record.update(c.volume, 100_i64).unwrap();
    record.commit();
    record.update(c.volume, 200_i64).unwrap();
    record.commit();
    write(dir, name, &record.into_inner())
}

/// Writes a table of `rows` rows; row `r` has price `r + 0.25` and volume `r * 10`.
pub fn write_table(dir: &TempDir, name: &str, rows: usize) -> PathBuf {
    let (schema, c) = schema();
    let size = schema.table_size(rows);
    let mut table = Table::attach(schema, vec![0u8; size]).unwrap();
    for row in 0..rows {
        table.set_cursor(row).unwrap();
        table.update(c.price, row as f64 + 0.25).unwrap();
        table.update(c.volume, row as i64 * 10).unwrap();
        table.commit();
    }
    write(dir, name, &table.into_inner())
}

pub fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

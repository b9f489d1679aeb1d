// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary layout of record and table buffers.
//!
//! All numbers are little-endian.
//!
//! ```text
//! record: [marker "ACM_RECORD"][pad][version u32 @12][status u64 @16][selector u64 @24][data @32]
//! table:  [marker "ACM_TABLE"][pad][version u32 @12][cursor u32 @16][rows u32 @20]
//!         rows x ([status u64][selector u64][data])  starting @24
//! data:   16 bytes per column, slot 0 @ 16*col, slot 1 @ 16*col + 8
//! ```
//!
//! The selector bit of a column names its draft slot; the other slot holds
//! the committed value.

pub const RECORD_MARKER: &[u8] = b"ACM_RECORD";
pub const TABLE_MARKER: &[u8] = b"ACM_TABLE";

/// Written on first initialization, checked on resume.
pub const FORMAT_VERSION: u32 = 1;

pub const VERSION_OFFSET: usize = 12;

pub const RECORD_STATUS_OFFSET: usize = VERSION_OFFSET + 4;
pub const RECORD_SELECTOR_OFFSET: usize = RECORD_STATUS_OFFSET + 8;
pub const RECORD_DATA_OFFSET: usize = RECORD_SELECTOR_OFFSET + 8;

pub const TABLE_CURSOR_OFFSET: usize = VERSION_OFFSET + 4;
pub const TABLE_ROWS_OFFSET: usize = TABLE_CURSOR_OFFSET + 4;
pub const TABLE_DATA_OFFSET: usize = TABLE_ROWS_OFFSET + 4;

/// Bytes per column: two mirrored 8-byte slots.
pub const COLUMN_SIZE: usize = 16;

/// Status and selector words that precede every row's data.
pub const ROW_HEADER_SIZE: usize = 16;

/// Byte size of the data region for `columns` columns.
pub fn data_size(columns: usize) -> usize {
    columns * COLUMN_SIZE
}

/// Byte size of one table row: status, selector and data.
pub fn row_size(columns: usize) -> usize {
    ROW_HEADER_SIZE + data_size(columns)
}

pub fn record_size(columns: usize) -> usize {
    RECORD_DATA_OFFSET + data_size(columns)
}

pub fn table_size(columns: usize, rows: usize) -> usize {
    TABLE_DATA_OFFSET + rows * row_size(columns)
}

/// Offset of the first byte of `row` in a table buffer.
pub fn table_row_offset(columns: usize, row: usize) -> usize {
    TABLE_DATA_OFFSET + row * row_size(columns)
}

/// Offset of a column slot relative to the start of the data region.
pub fn slot_offset(column: usize, slot: u64) -> usize {
    column * COLUMN_SIZE + (slot as usize) * 8
}

/// Positions of one row's status word, selector word and data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOffsets {
    pub status: usize,
    pub selector: usize,
    pub data: usize,
}

impl RowOffsets {
    /// Status and selector immediately followed by data, as in both layouts.
    pub fn at(base: usize) -> Self {
        Self {
            status: base,
            selector: base + 8,
            data: base + ROW_HEADER_SIZE,
        }
    }

    pub fn record() -> Self {
        Self::at(RECORD_STATUS_OFFSET)
    }

    pub fn table_row(columns: usize, row: usize) -> Self {
        Self::at(table_row_offset(columns, row))
    }
}

pub fn starts_with_marker(bytes: &[u8], marker: &[u8]) -> bool {
    bytes.starts_with(marker)
}

pub fn write_marker(bytes: &mut [u8], marker: &[u8]) {
    bytes[..marker.len()].copy_from_slice(marker);
}

pub fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

pub fn write_u64(bytes: &mut [u8], offset: usize, value: u64) {
    bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

pub fn read_i64(bytes: &[u8], offset: usize) -> i64 {
    read_u64(bytes, offset) as i64
}

pub fn write_i64(bytes: &mut [u8], offset: usize, value: i64) {
    write_u64(bytes, offset, value as u64);
}

pub fn read_f64(bytes: &[u8], offset: usize) -> f64 {
    f64::from_bits(read_u64(bytes, offset))
}

pub fn write_f64(bytes: &mut [u8], offset: usize, value: f64) {
    write_u64(bytes, offset, value.to_bits());
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

pub fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! acm-core: accumulating records in fixed-layout byte buffers
//!
//! This crate provides:
//! - A static column graph with cumulative functions and cascading links
//! - A draft/commit/reset engine that flips selector bits instead of copying
//! - Record (single row) and table (many rows, one cursor) buffer layouts
//! - Migration of stored buffers to a different column set

pub mod column;
pub mod error;
pub mod functions;
pub mod layout;
pub mod migrate;
pub mod view;

mod engine;
mod record;
mod table;


pub use column::{ColumnId, Function, Kind, Schema, SchemaBuilder, Value, ValueType, MAX_COLUMNS};
pub use error::AcmError;
pub use migrate::{ColumnMapping, Format, MigrateError};
pub use record::Record;
pub use table::Table;
pub use view::View;

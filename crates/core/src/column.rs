// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column definitions and the static dependency graph between them.
//!
//! Columns are defined once through a [`SchemaBuilder`] and frozen into a
//! shared [`Schema`] before any buffer is attached. A column linked to a
//! reference is recomputed every time the reference's stored value changes.
//! Links can only point at columns that already exist, so every edge goes
//! from a lower to a higher index and the graph is acyclic.

use crate::error::AcmError;
use crate::layout;
use crate::view::View;
use std::fmt;
use std::sync::Arc;

/// Flag words are 64 bits wide, one bit per column.
pub const MAX_COLUMNS: usize = 64;

/// Index of a column inside its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u8);

impl ColumnId {
    pub(crate) const fn new(index: usize) -> Self {
        debug_assert!(index < MAX_COLUMNS);
        Self(index as u8)
    }

    /// 0-based position of the column, also its bit in the flag words.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric representation of an input or a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Long,
    Double,
}

/// A single input or stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Long(i64),
    Double(f64),
}

impl Value {
    pub fn value_type(self) -> ValueType {
        match self {
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
        }
    }

    /// Zero of the given type, written into every column on reset.
    pub fn zero(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Long => Value::Long(0),
            ValueType::Double => Value::Double(0.0),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

/// Input and output type of a column function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Double,
    Long,
    DoubleToLong,
    LongToDouble,
}

impl Kind {
    /// Type the column function accepts.
    pub fn input(self) -> ValueType {
        match self {
            Kind::Double | Kind::DoubleToLong => ValueType::Double,
            Kind::Long | Kind::LongToDouble => ValueType::Long,
        }
    }

    /// Type the column stores.
    pub fn output(self) -> ValueType {
        match self {
            Kind::Double | Kind::LongToDouble => ValueType::Double,
            Kind::Long | Kind::DoubleToLong => ValueType::Long,
        }
    }
}

pub type DoubleFn = dyn Fn(&dyn View, ColumnId, Option<ColumnId>, f64) -> f64 + Send + Sync;
pub type LongFn = dyn Fn(&dyn View, ColumnId, Option<ColumnId>, i64) -> i64 + Send + Sync;
pub type DoubleToLongFn = dyn Fn(&dyn View, ColumnId, Option<ColumnId>, f64) -> i64 + Send + Sync;
pub type LongToDoubleFn = dyn Fn(&dyn View, ColumnId, Option<ColumnId>, i64) -> f64 + Send + Sync;

/// Cumulative function applied on update.
///
/// Called with a view over the row being updated, the column's own id, the
/// optional reference column and the input value; returns the new stored
/// value.
#[derive(Clone)]
pub enum Function {
    Double(Arc<DoubleFn>),
    Long(Arc<LongFn>),
    DoubleToLong(Arc<DoubleToLongFn>),
    LongToDouble(Arc<LongToDoubleFn>),
}

impl Function {
    pub fn double<F>(f: F) -> Self
    where
        F: Fn(&dyn View, ColumnId, Option<ColumnId>, f64) -> f64 + Send + Sync + 'static,
    {
        Function::Double(Arc::new(f))
    }

    pub fn long<F>(f: F) -> Self
    where
        F: Fn(&dyn View, ColumnId, Option<ColumnId>, i64) -> i64 + Send + Sync + 'static,
    {
        Function::Long(Arc::new(f))
    }

    pub fn double_to_long<F>(f: F) -> Self
    where
        F: Fn(&dyn View, ColumnId, Option<ColumnId>, f64) -> i64 + Send + Sync + 'static,
    {
        Function::DoubleToLong(Arc::new(f))
    }

    pub fn long_to_double<F>(f: F) -> Self
    where
        F: Fn(&dyn View, ColumnId, Option<ColumnId>, i64) -> f64 + Send + Sync + 'static,
    {
        Function::LongToDouble(Arc::new(f))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Function::Double(_) => Kind::Double,
            Function::Long(_) => Kind::Long,
            Function::DoubleToLong(_) => Kind::DoubleToLong,
            Function::LongToDouble(_) => Kind::LongToDouble,
        }
    }

    /// Applies the function, or returns `None` when `input` is not of the
    /// function's input type.
    pub(crate) fn apply(
        &self,
        view: &dyn View,
        store: ColumnId,
        reference: Option<ColumnId>,
        input: Value,
    ) -> Option<Value> {
        let output = match (self, input) {
            (Function::Double(f), Value::Double(v)) => Value::Double(f(view, store, reference, v)),
            (Function::Long(f), Value::Long(v)) => Value::Long(f(view, store, reference, v)),
            (Function::DoubleToLong(f), Value::Double(v)) => {
                Value::Long(f(view, store, reference, v))
            }
            (Function::LongToDouble(f), Value::Long(v)) => {
                Value::Double(f(view, store, reference, v))
            }
            _ => return None,
        };
        Some(output)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.kind()).finish()
    }
}

/// Metadata of a single column.
#[derive(Debug, Clone)]
pub struct Column {
    id: ColumnId,
    function: Function,
    reference: Option<ColumnId>,
    links: Vec<ColumnId>,
}

impl Column {
    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.function.kind()
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn reference(&self) -> Option<ColumnId> {
        self.reference
    }

    /// Columns recomputed after this one, in definition order.
    pub fn links(&self) -> &[ColumnId] {
        &self.links
    }
}

/// Collects column definitions before they are frozen into a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<Column>,
    revision: Option<ColumnId>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a root column, updated only through explicit `update` calls.
    pub fn define(&mut self, function: Function) -> Result<ColumnId, AcmError> {
        let id = self.next_id()?;
        self.columns.push(Column {
            id,
            function,
            reference: None,
            links: Vec::new(),
        });
        Ok(id)
    }

    /// Defines a column recomputed from `reference`'s new value whenever the
    /// reference changes.
    ///
    /// The new column's input type must equal the reference's output type.
    pub fn define_linked(
        &mut self,
        function: Function,
        reference: ColumnId,
    ) -> Result<ColumnId, AcmError> {
        let reference_kind = self
            .columns
            .get(reference.index())
            .map(Column::kind)
            .ok_or(AcmError::UnknownColumn(reference.index()))?;
        let kind = function.kind();
        if kind.input() != reference_kind.output() {
            return Err(AcmError::TypeMismatch {
                column: kind,
                reference: reference_kind,
            });
        }

        let id = self.next_id()?;
        self.columns[reference.index()].links.push(id);
        self.columns.push(Column {
            id,
            function,
            reference: Some(reference),
            links: Vec::new(),
        });
        Ok(id)
    }

    /// Defines the revision column, bumped on every commit and reset.
    ///
    /// Returns the existing column when called more than once.
    pub fn define_revision(&mut self) -> Result<ColumnId, AcmError> {
        if let Some(id) = self.revision {
            return Ok(id);
        }
        let id = self.define(Function::long(|_, _, _, revision| revision.wrapping_add(1)))?;
        self.revision = Some(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Freezes the definitions. Handlers attached to buffers share the result.
    pub fn build(self) -> Arc<Schema> {
        tracing::debug!(
            columns = self.columns.len(),
            revision = ?self.revision,
            "schema built"
        );
        Arc::new(Schema {
            columns: self.columns,
            revision: self.revision,
        })
    }

    fn next_id(&self) -> Result<ColumnId, AcmError> {
        let index = self.columns.len();
        if index >= MAX_COLUMNS {
            return Err(AcmError::ColumnLimitExceeded { limit: MAX_COLUMNS });
        }
        Ok(ColumnId::new(index))
    }
}

/// Immutable set of column definitions.
#[derive(Debug)]
pub struct Schema {
    columns: Vec<Column>,
    revision: Option<ColumnId>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Result<&Column, AcmError> {
        self.columns
            .get(id.index())
            .ok_or(AcmError::UnknownColumn(id.index()))
    }

    pub fn revision(&self) -> Option<ColumnId> {
        self.revision
    }

    /// Buffer capacity a [`Record`](crate::Record) needs for these columns.
    pub fn record_size(&self) -> usize {
        layout::record_size(self.len())
    }

    /// Buffer capacity a [`Table`](crate::Table) of `rows` rows needs for
    /// these columns.
    pub fn table_size(&self, rows: usize) -> usize {
        layout::table_size(self.len(), rows)
    }
}

#[cfg(test)]
#[path = "column_tests.rs"]
mod tests;

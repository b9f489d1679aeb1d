// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Most used cumulative functions: sum, count, min, max, first, last.
//!
//! Each function has the column-function signature and can be wrapped in a
//! [`Function`](crate::Function):
//!
//! ```
//! use acm_core::{functions::double, Function, Schema};
//!
//! let mut builder = Schema::builder();
//! let sum = builder.define(Function::double(double::sum)).unwrap();
//! let _count = builder
//!     .define_linked(Function::double_to_long(double::count), sum)
//!     .unwrap();
//! ```

/// Functions over `f64` input.
pub mod double {
    use crate::column::ColumnId;
    use crate::view::View;

    pub fn sum(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: f64) -> f64 {
        view.get_double(store) + value
    }

    /// Number of updates, stored as `i64`.
    pub fn count(
        view: &dyn View,
        store: ColumnId,
        _reference: Option<ColumnId>,
        _value: f64,
    ) -> i64 {
        view.get_long(store).wrapping_add(1)
    }

    pub fn min(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: f64) -> f64 {
        if view.is_empty(store) {
            value
        } else {
            value.min(view.get_double(store))
        }
    }

    pub fn max(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: f64) -> f64 {
        if view.is_empty(store) {
            value
        } else {
            value.max(view.get_double(store))
        }
    }

    pub fn first(
        view: &dyn View,
        store: ColumnId,
        _reference: Option<ColumnId>,
        value: f64,
    ) -> f64 {
        if view.is_empty(store) {
            value
        } else {
            view.get_double(store)
        }
    }

    pub fn last(
        _view: &dyn View,
        _store: ColumnId,
        _reference: Option<ColumnId>,
        value: f64,
    ) -> f64 {
        value
    }
}

/// Functions over `i64` input. Arithmetic wraps on overflow.
pub mod long {
    use crate::column::ColumnId;
    use crate::view::View;

    pub fn sum(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: i64) -> i64 {
        view.get_long(store).wrapping_add(value)
    }

    pub fn count(
        view: &dyn View,
        store: ColumnId,
        _reference: Option<ColumnId>,
        _value: i64,
    ) -> i64 {
        view.get_long(store).wrapping_add(1)
    }

    pub fn min(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: i64) -> i64 {
        if view.is_empty(store) {
            value
        } else {
            value.min(view.get_long(store))
        }
    }

    pub fn max(view: &dyn View, store: ColumnId, _reference: Option<ColumnId>, value: i64) -> i64 {
        if view.is_empty(store) {
            value
        } else {
            value.max(view.get_long(store))
        }
    }

    pub fn first(
        view: &dyn View,
        store: ColumnId,
        _reference: Option<ColumnId>,
        value: i64,
    ) -> i64 {
        if view.is_empty(store) {
            value
        } else {
            view.get_long(store)
        }
    }

    pub fn last(
        _view: &dyn View,
        _store: ColumnId,
        _reference: Option<ColumnId>,
        value: i64,
    ) -> i64 {
        value
    }
}

#[cfg(test)]
#[path = "functions_tests.rs"]
mod tests;

//! Table examples
//!
//! Per-row regression sums with random access to finished rows.

use crate::prelude::*;
use crate::prelude::assert_eq;

struct Regression {
    x: ColumnId,
    y: ColumnId,
    xx: ColumnId,
    yy: ColumnId,
    xy: ColumnId,
}

fn regression() -> (Arc<Schema>, Regression) {
    fn square() -> Function {
        Function::double(|view, store, _, value| view.get_double(store) + value * value)
    }

    let mut builder = Schema::builder();
    let x = builder.define(Function::double(double::last)).unwrap();
    let y = builder.define(Function::double(double::last)).unwrap();
    let xx = builder.define_linked(square(), x).unwrap();
    let yy = builder.define_linked(square(), y).unwrap();
    let xy = builder
        .define_linked(
            Function::double(move |view, store, _, y| {
                view.get_double(store) + view.get_draft_double(x) * y
            }),
            y,
        )
        .unwrap();
    (builder.build(), Regression { x, y, xx, yy, xy })
}

#[test]
fn random_access_across_rows() {
    let (schema, c) = regression();
    let mut table = fresh_table(&schema, 1024);

    table.update(c.x, 2.0).unwrap();
    table.update(c.y, 3.0).unwrap();
    table.commit();

    let next = table.cursor() + 1;
    table.reset_row(next).unwrap();
    table.set_cursor(next).unwrap();

    table.update(c.x, 5.0).unwrap();
    table.update(c.y, 7.0).unwrap();
    table.commit();

    let row_a = table.cursor() - 1;
    let row_b = table.cursor();
    let read = |row| {
        [c.xx, c.yy, c.xy].map(|col| table.get_double_at(row, col).unwrap())
    };
    assert_eq!(read(row_a), [4.0, 9.0, 6.0]);
    assert_eq!(read(row_b), [25.0, 49.0, 35.0]);
}

#[test]
fn rows_accumulate_independently() {
    let (schema, c) = regression();
    let mut table = fresh_table(&schema, 3);

    for round in 1..=2 {
        for row in 0..3 {
            table.set_cursor(row).unwrap();
            table.update(c.x, (row + round) as f64).unwrap();
            table.commit();
        }
    }

    for row in 0..3 {
        let first = row as f64 + 1.0;
        let second = row as f64 + 2.0;
        assert_close(
            first * first + second * second,
            table.get_double_at(row, c.xx).unwrap(),
        );
        assert!(table.is_empty_at(row, c.yy).unwrap());
    }
}

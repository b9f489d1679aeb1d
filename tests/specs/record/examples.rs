//! Record examples
//!
//! Classic running statistics expressed as column graphs.

use crate::prelude::*;

#[test]
fn average() {
    let mut builder = Schema::builder();
    let sum = builder.define(Function::double(double::sum)).unwrap();
    let count = builder
        .define_linked(Function::double_to_long(double::count), sum)
        .unwrap();
    let schema = builder.build();
    let mut record = fresh_record(&schema);

    record.update(sum, 1.5).unwrap();
    record.commit();
    record.update(sum, 1.6).unwrap();
    record.commit();

    let average = record.get_double(sum) / record.get_long(count) as f64;
    assert_close((1.5 + 1.6) / 2.0, average);
}

#[test]
fn vwap() {
    let mut builder = Schema::builder();
    let last_price = builder.define(Function::double(double::last)).unwrap();
    let last_quantity = builder.define(Function::double(double::last)).unwrap();
    let sum_quantity = builder
        .define_linked(Function::double(double::sum), last_quantity)
        .unwrap();
    let sum_price_quantity = builder
        .define_linked(
            Function::double(move |view, store, _, quantity| {
                view.get_double(store) + quantity * view.get_draft_double(last_price)
            }),
            last_quantity,
        )
        .unwrap();
    let schema = builder.build();
    let mut record = fresh_record(&schema);

    record.update(last_price, 1.002).unwrap();
    record.update(last_quantity, 100.0).unwrap();
    record.commit();
    record.update(last_price, 1.005).unwrap();
    record.update(last_quantity, 200.0).unwrap();
    record.commit();

    let vwap = record.get_double(sum_price_quantity) / record.get_double(sum_quantity);
    assert_close((1.002 * 100.0 + 1.005 * 200.0) / 300.0, vwap);
}

#[test]
fn on_commit_calculation_driven_by_revision() {
    let mut builder = Schema::builder();
    let revision = builder.define_revision().unwrap();
    let last_price = builder.define(Function::double(double::last)).unwrap();
    let last_quantity = builder.define(Function::double(double::last)).unwrap();
    let sum_quantity = builder
        .define_linked(Function::double(double::sum), last_quantity)
        .unwrap();
    let sum_price_quantity = builder
        .define_linked(
            Function::long_to_double(move |view, store, _, _revision| {
                view.get_double(store)
                    + view.get_draft_double(last_price) * view.get_draft_double(last_quantity)
            }),
            revision,
        )
        .unwrap();
    let schema = builder.build();
    let mut record = fresh_record(&schema);

    record.update(last_price, 1.002).unwrap();
    record.update(last_quantity, 100.0).unwrap();
    record.commit();
    record.update(last_price, 1.005).unwrap();
    record.update(last_quantity, 200.0).unwrap();
    record.commit();

    let vwap = record.get_double(sum_price_quantity) / record.get_double(sum_quantity);
    assert_close((1.002 * 100.0 + 1.005 * 200.0) / 300.0, vwap);
}

#[test]
fn twap() {
    let mut builder = Schema::builder();
    let last_timestamp = builder.define(Function::long(long::last)).unwrap();
    let last_price = builder.define(Function::double(double::last)).unwrap();
    let sum_price_time = builder
        .define_linked(
            Function::long_to_double(move |view, store, reference, timestamp| {
                let previous = reference.map_or(0, |r| view.get_long(r));
                let elapsed = timestamp - previous;
                view.get_double(store) + elapsed as f64 * view.get_double(last_price)
            }),
            last_timestamp,
        )
        .unwrap();
    let first_timestamp = builder
        .define_linked(Function::long(long::first), last_timestamp)
        .unwrap();
    let schema = builder.build();
    let mut record = fresh_record(&schema);

    let mut timestamp = 1_588_942_898_841_i64;
    record.update(last_timestamp, timestamp).unwrap();
    record.update(last_price, 1.002).unwrap();
    record.commit();

    timestamp += 10;
    record.update(last_timestamp, timestamp).unwrap();
    record.update(last_price, 1.005).unwrap();
    record.commit();

    timestamp += 20;
    record.update(last_timestamp, timestamp).unwrap();
    record.update(last_price, 10.0).unwrap();
    record.commit();

    let span = record.get_long(last_timestamp) - record.get_long(first_timestamp);
    let twap = record.get_double(sum_price_time) / span as f64;
    assert_close((10.0 * 1.002 + 20.0 * 1.005) / 30.0, twap);
}

use criterion::{criterion_group, criterion_main};

mod buffer;
mod order_view;

use buffer::register_benchmarks as register_buffer_benchmarks;
use order_view::register_benchmarks as register_order_view_benchmarks;

criterion_group!(
    benches,
    register_buffer_benchmarks,
    register_order_view_benchmarks,
);

criterion_main!(benches);

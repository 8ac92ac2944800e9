pub mod consolidation;
pub mod updates;

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    consolidation::register_benchmarks(c);
    updates::register_benchmarks(c);
}

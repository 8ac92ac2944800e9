pub mod churn;

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    churn::register_benchmarks(c);
}

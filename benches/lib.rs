use criterion::{criterion_group, criterion_main};

mod likelihood;

criterion_group!(
    benches_likelihood,
    likelihood::bench_ln_likelihood,
    likelihood::bench_auto_binning
);
criterion_main!(benches_likelihood);

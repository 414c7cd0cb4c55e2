use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swerve_module_control::module_elements::{
    angle_optimizer::optimize, module_state::ModuleState,
};

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets =
        optimize_within_reach,
        optimize_with_reversal,
        optimize_wound_up,
}

criterion_main!(benches);

pub fn optimize_within_reach(c: &mut Criterion) {
    let desired = ModuleState::new(1.0, 40.0);

    c.bench_function("optimize::within_reach", |b| {
        b.iter(|| optimize(black_box(&desired), black_box(10.0)))
    });
}

pub fn optimize_with_reversal(c: &mut Criterion) {
    let desired = ModuleState::new(2.0, 350.0);

    c.bench_function("optimize::with_reversal", |b| {
        b.iter(|| optimize(black_box(&desired), black_box(170.0)))
    });
}

pub fn optimize_wound_up(c: &mut Criterion) {
    let desired = ModuleState::new(-1.5, 15.0);

    c.bench_function("optimize::wound_up", |b| {
        b.iter(|| optimize(black_box(&desired), black_box(-1430.0)))
    });
}

//! Criterion benchmarks for assembly, integration and aggregation.

use std::hint::black_box;

use aerovox_bench::{long_fuselage, stiff_profile};
use aerovox_dynamics::{
    aggregate, assemble, integrate, rk4_step, simulate_longitudinal, TransientSettings,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_assemble(c: &mut Criterion) {
    let (derivs, trim) = stiff_profile();
    c.bench_function("assemble_both_axes", |b| {
        b.iter(|| black_box(assemble(black_box(&derivs), black_box(&trim)).unwrap()));
    });
}

fn bench_rk4_step(c: &mut Criterion) {
    let (derivs, trim) = stiff_profile();
    let model = assemble(&derivs, &trim).unwrap();
    let x = [0.1, 0.0, 0.02, 0.0];
    c.bench_function("rk4_step", |b| {
        b.iter(|| black_box(rk4_step(&model.longitudinal, black_box(&x), 0.01)));
    });
}

fn bench_integrate_10s(c: &mut Criterion) {
    let (derivs, trim) = stiff_profile();
    let model = assemble(&derivs, &trim).unwrap();
    c.bench_function("integrate_10s_1001_samples", |b| {
        b.iter(|| {
            let traj = integrate(&model.lateral, &[0.05, 0.0, 0.0, 0.0], 0.01, 10.0).unwrap();
            black_box(traj);
        });
    });
}

fn bench_transient_preview(c: &mut Criterion) {
    let (derivs, trim) = stiff_profile();
    let settings = TransientSettings {
        initial_state: [1.0, 0.0, 0.0, 0.0],
        ..Default::default()
    };
    c.bench_function("simulate_longitudinal_default", |b| {
        b.iter(|| black_box(simulate_longitudinal(&derivs, &trim, &settings).unwrap()));
    });
}

fn bench_aggregate_500(c: &mut Criterion) {
    let pass = long_fuselage();
    c.bench_function("aggregate_500_slices", |b| {
        b.iter(|| {
            black_box(aggregate(
                &pass.slices,
                pass.section_thickness,
                pass.first_section_offset,
                pass.sonic,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_assemble,
    bench_rk4_step,
    bench_integrate_10s,
    bench_transient_preview,
    bench_aggregate_500
);
criterion_main!(benches);

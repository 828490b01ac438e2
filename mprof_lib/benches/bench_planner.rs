//! # Planner Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use mprof_lib::{Constraints, Profile, Setpoint};

fn planner_benchmark(c: &mut Criterion) {
    let constraints = Constraints::new(1.5, 0.5, 1.0);
    let target = Setpoint::new(6.0, 0.0);
    let initial = Setpoint::new(0.0, 0.25);

    // Bench the full eager plan, including the infeasible-coast solve
    c.bench_function("Profile::asym_trapezoid", |b| {
        b.iter(|| Profile::asym_trapezoid(&constraints, target, initial).unwrap())
    });

    let triangle_target = Setpoint::new(0.5, 0.0);
    c.bench_function("Profile::asym_trapezoid::triangle", |b| {
        b.iter(|| Profile::asym_trapezoid(&constraints, triangle_target, initial).unwrap())
    });

    // Bench sampling at a typical control cycle rate over the whole profile
    let profile = Profile::asym_trapezoid(&constraints, target, initial).unwrap();
    let total_s = profile.total_time_s();

    c.bench_function("Profile::sample", |b| {
        b.iter(|| {
            let mut t_s = 0.0;
            while t_s < total_s {
                profile.sample(t_s);
                t_s += 0.01;
            }
        })
    });
}

criterion_group!(benches, planner_benchmark);
criterion_main!(benches);

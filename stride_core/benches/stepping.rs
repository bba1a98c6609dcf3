use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use stride_core::strategies::{CurvatureScale, Parsimonious, Pid, PseudoRkqs, Scaled};
use stride_core::{StepStatus, Stepper, Strategy};

fn front(t: f64) -> f64 {
    ((t / 1000.0 - 0.5) / 0.02).tanh()
}

// Error-controlled walk over the tanh front; returns the attempt count.
fn drive<S: Strategy>(mut s: Stepper<S>) -> usize {
    let mut old = -1.0;
    let mut n = 0;
    while let Ok(StepStatus::Next(step)) = s.next_step() {
        let new = front(step.end());
        n += 1;
        if step
            .succeeded(Some(new), Some((new - old).abs() / 1e-2))
            .is_success()
        {
            old = new;
        }
    }
    n
}

fn stepper<S: Strategy>(strategy: S, record: bool) -> Stepper<S> {
    // range and flags are fixed; build cannot fail
    match Stepper::builder(strategy)
        .with_range(0.0, 1000.0)
        .with_inclusive(true)
        .with_record(record)
        .build()
    {
        Ok(s) => s,
        Err(e) => panic!("bench stepper: {e}"),
    }
}

fn configure(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    // Allow quick tweaking without CLI flags:
    //   BENCH_SAMPLE_SIZE=10 cargo bench -p stride_core --bench stepping
    match std::env::var("BENCH_SAMPLE_SIZE").ok().and_then(|s| s.parse::<usize>().ok()) {
        Some(n) => g.sample_size(n.max(10)),
        None => g.sample_size(50),
    };
}

pub fn bench_walks(c: &mut Criterion) {
    let mut g = c.benchmark_group("walk_tanh_front");
    configure(&mut g);
    for record in [false, true] {
        let tag = if record { "record" } else { "purge" };
        g.bench_function(format!("scaled/{tag}"), |b| {
            b.iter_batched(
                || stepper(Scaled::default(), record),
                |s| black_box(drive(s)),
                BatchSize::SmallInput,
            )
        });
        g.bench_function(format!("pid/{tag}"), |b| {
            b.iter_batched(
                || stepper(Pid::default(), record),
                |s| black_box(drive(s)),
                BatchSize::SmallInput,
            )
        });
        g.bench_function(format!("pseudo_rkqs/{tag}"), |b| {
            b.iter_batched(
                || stepper(PseudoRkqs::default(), record),
                |s| black_box(drive(s)),
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

pub fn bench_candidate_scoring(c: &mut Criterion) {
    let mut g = c.benchmark_group("parsimonious");
    configure(&mut g);
    for n in [50usize, 200] {
        g.bench_function(format!("n{n}"), |b| {
            b.iter_batched(
                || match Parsimonious::new(n, CurvatureScale::ArcLength) {
                    Ok(p) => stepper(p, true),
                    Err(e) => panic!("bench strategy: {e}"),
                },
                |s| black_box(drive(s)),
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(benches, bench_walks, bench_candidate_scoring);
criterion_main!(benches);

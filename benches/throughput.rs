use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use rowguard::{compile, Ability, ConditionSet, Filter, RuleSource};

fn build_shared_ability() -> Arc<Ability> {
    let mut builder = Ability::builder();
    let n: i64 = 20;

    for i in 0..n {
        let conditions = ConditionSet::single(format!("f{i}"), i).unwrap();
        builder = if i % 3 == 0 {
            builder.cannot_where("read", "Post", conditions)
        } else {
            builder.can_where("read", "Post", conditions)
        };
    }

    Arc::new(builder.can("read", "Comment").build())
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let ability = build_shared_ability();

        group.bench_function(format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let ability = Arc::clone(&ability);
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let rules = ability.rules_for("read", "Post");
                                let _ = compile(&rules, Filter::new());
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);

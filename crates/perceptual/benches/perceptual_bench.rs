use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use perceptual::{perceptualize, PerceptualConfig};

fn bench_perceptual(c: &mut Criterion) {
    let mut group = c.benchmark_group("perceptualize");

    for size in [100, 500, 2000].iter() {
        let text: String = (0..*size)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        group.throughput(Throughput::Elements(*size as u64));
        for parallel in [false, true] {
            let config = PerceptualConfig::default().with_parallel(parallel);
            let label = if parallel { "par" } else { "seq" };
            group.bench_function(format!("tokens_{size}_{label}"), |b| {
                b.iter(|| perceptualize(black_box(&text), black_box(&config)).expect("perceptualize"))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_perceptual);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use index::{BandingIndex, IndexConfig};
use perceptual::{perceptualize, PerceptualConfig, Signature};

fn corpus(n: usize, cfg: &PerceptualConfig) -> Vec<Signature> {
    (0..n)
        .map(|d| {
            let text: String = (0..60)
                .map(|w| format!("w{}", (d * 31 + w * 7) % 5000))
                .collect::<Vec<_>>()
                .join(" ");
            perceptualize(&text, cfg).expect("perceptualize")
        })
        .collect()
}

fn bench_admit(c: &mut Criterion) {
    let pcfg = PerceptualConfig::default();
    let mut group = c.benchmark_group("banding_index");

    for size in [1_000usize, 10_000] {
        let signatures = corpus(size, &pcfg);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("admit_{size}"), |b| {
            b.iter_batched(
                || signatures.clone(),
                |sigs| {
                    let mut index: BandingIndex<usize> =
                        BandingIndex::from_config(&IndexConfig::default(), pcfg.num_perm)
                            .expect("index");
                    for (id, sig) in sigs.into_iter().enumerate() {
                        black_box(index.admit(id, sig).expect("admit"));
                    }
                    index.len()
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_admit);
criterion_main!(benches);

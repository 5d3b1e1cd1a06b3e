use criterion::{criterion_group, criterion_main, Criterion};
use demochain_core::{pow::search_nonce, Block};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_pow(c: &mut Criterion) {
    c.bench_function("search_nonce_difficulty_2", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let payload: String = (0..32).map(|_| rng.gen_range('a'..='z')).collect();

        let mut block = Block::new(1, &payload, "0");
        block.timestamp = 1_600_000_000;

        b.iter(|| {
            let _sealed = search_nonce(&block, 2);
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);

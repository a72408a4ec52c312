use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lp_bench::sample_terms;
use lp_lfsr::{Lfsr, F5039, MODULUS};

const ORDER: usize = 10;

fn bench_recover(c: &mut Criterion) {
    let seed: Vec<F5039> = sample_terms(2 * ORDER, MODULUS)
        .into_iter()
        .map(F5039::from)
        .collect();
    let mut lfsr = Lfsr::new(seed[..ORDER].to_vec(), seed[ORDER..].to_vec()).unwrap();
    let mut terms = seed[..ORDER].to_vec();
    while terms.len() < 2 * ORDER {
        terms.push(lfsr.step());
    }

    c.bench_function("lp_lfsr_recover_order10", |b| {
        b.iter(|| black_box(Lfsr::recover(black_box(&terms), ORDER)))
    });

    c.bench_function("lp_lfsr_step_180", |b| {
        b.iter(|| {
            let mut g = lfsr.clone();
            for _ in 0..180 {
                black_box(g.step());
            }
        })
    });
}

criterion_group!(benches, bench_recover);
criterion_main!(benches);

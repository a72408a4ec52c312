use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lp_core::{probe_feedback, Feedback};
use lp_wire::codec::{decode_guess_reply, decode_probe_reply, encode_hint, encode_probe};

fn bench_codec(c: &mut Criterion) {
    c.bench_function("lp_wire_encode_probe", |b| {
        b.iter(|| black_box(encode_probe()))
    });

    let probe_reply = encode_hint(probe_feedback(&"9876".parse().unwrap()));
    c.bench_function("lp_wire_decode_probe_reply", |b| {
        b.iter(|| black_box(decode_probe_reply(black_box(&probe_reply)).unwrap()))
    });

    let hint = encode_hint(Feedback::new(1, 2));
    c.bench_function("lp_wire_decode_guess_reply", |b| {
        b.iter(|| black_box(decode_guess_reply(black_box(&hint)).unwrap()))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);

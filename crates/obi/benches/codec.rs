use criterion::{Criterion, criterion_group, criterion_main};
use obi::{Obi, Value};

const SCHEMA: &str = "{symbols:[string],multiplier:u64}/{rates:[u64]}";

fn gen_request(symbol_count: usize) -> Value {
    let symbols = (0..symbol_count)
        .map(|i| Value::from(format!("SYM{i}")))
        .collect();

    [
        ("symbols", Value::Vector(symbols)),
        ("multiplier", Value::from(1_000_000_000u64)),
    ]
    .into_iter()
    .collect()
}

fn bench_codec(c: &mut Criterion) {
    let obi = Obi::new(SCHEMA).unwrap();

    for &symbol_count in &[1usize, 16, 256] {
        let request = gen_request(symbol_count);
        let bytes = obi.encode_input(&request).unwrap();

        c.bench_function(&format!("encode_{}_symbols", symbol_count), |b| {
            b.iter(|| obi.encode_input(&request).unwrap())
        });

        c.bench_function(&format!("decode_{}_symbols", symbol_count), |b| {
            b.iter(|| obi.decode_input(&bytes).unwrap())
        });
    }
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);

//! Criterion benchmark untuk map message codec
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mapmsg::{decode, Encoder, FieldStore, MapMessage};

fn sample_store(fields: usize) -> FieldStore {
    let mut store = FieldStore::with_capacity(fields);
    for i in 0..fields {
        let name = format!("field_{i:04}");
        let result = match i % 4 {
            0 => store.set(&name, i as i32),
            1 => store.set(&name, i as f64),
            2 => store.set(&name, format!("{}", i * 1000)),
            _ => store.set(&name, vec![i as u8; 32]),
        };
        result.unwrap();
    }
    store
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for fields in [4usize, 32, 256].iter() {
        let store = sample_store(*fields);
        let mut encoder = Encoder::new(4096);
        let wire = encoder.encode(&store).unwrap().to_vec();
        group.throughput(Throughput::Bytes(wire.len() as u64));

        group.bench_function(format!("encode_{}", fields), |b| {
            b.iter(|| {
                black_box(encoder.encode(black_box(&store)).unwrap().len());
            });
        });

        group.bench_function(format!("decode_{}", fields), |b| {
            b.iter(|| black_box(decode(black_box(&wire)).unwrap()));
        });
    }

    group.finish();
}

fn bench_typed_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_get");
    group.throughput(Throughput::Elements(1));

    let msg = MapMessage::from_fields(sample_store(32));

    // Tanpa coercion
    group.bench_function("get_int", |b| {
        b.iter(|| black_box(msg.get_int(black_box("field_0000")).unwrap()));
    });

    // int → string
    group.bench_function("get_string_coerced", |b| {
        b.iter(|| black_box(msg.get_string(black_box("field_0000")).unwrap()));
    });

    // string → int (parse)
    group.bench_function("get_long_parsed", |b| {
        b.iter(|| black_box(msg.get_long(black_box("field_0002")).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_typed_get);
criterion_main!(benches);

//! Decode/encode throughput on a representative API-response document.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use duper_core::{dumps, loads, SerializeOptions, TypeRegistry};

static DOCUMENT: &str = r#"APIResponse({
    status: 200,
    headers: {
        content_type: "application/duper",
        cache_control: "max-age=3600",
    },
    body: {
        users: [
            User({
                id: Uuid("7039311b-02d2-4849-a6de-900d4dbe9acb"),
                name: "Alice",
                email: Email("alice@example.com"),
                roles: ["admin", "user"],
                scores: [95, 87, 92],
                ratio: 0.875,
            }),
        ],
    },
})"#;

fn bench_codec(c: &mut Criterion) {
    let registry = TypeRegistry::new();

    c.bench_function("loads/api_response", |b| {
        b.iter(|| loads(black_box(DOCUMENT), &registry).unwrap())
    });

    let bound = loads(DOCUMENT, &registry).unwrap();
    c.bench_function("dumps/api_response", |b| {
        b.iter(|| dumps(black_box(&bound), &registry, SerializeOptions::default()).unwrap())
    });

    c.bench_function("dumps/api_response_pretty", |b| {
        b.iter(|| {
            dumps(
                black_box(&bound),
                &registry,
                SerializeOptions::default().indent(2),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);

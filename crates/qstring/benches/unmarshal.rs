use criterion::{criterion_group, criterion_main, Criterion};
use qstring::{marshal, marshal_string, unmarshal, Query, QueryValues};
use std::hint::black_box;

#[derive(Query, Default)]
pub struct QueryStruct {
    pub fields: Vec<String>,
    pub limit: i32,
    pub page: i32,
}

#[derive(Query, Default)]
pub struct Paging {
    pub page: i32,
    pub limit: i32,
}

#[derive(Query, Default)]
pub struct Nested {
    pub paging: Paging,
    pub fields: Vec<String>,
    #[qstring("q,omitempty")]
    pub search: String,
}

fn sample_query() -> QueryValues {
    [
        ("limit", vec!["10"]),
        ("page", vec!["1"]),
        ("fields", vec!["a", "b", "c"]),
    ]
    .into_iter()
    .collect()
}

fn bench_unmarshal(c: &mut Criterion) {
    let query = sample_query();

    c.bench_function("unmarshal_flat", |b| {
        b.iter(|| {
            let mut data = QueryStruct::default();
            unmarshal(black_box(&query), &mut data).unwrap();
            data
        })
    });

    c.bench_function("unmarshal_nested", |b| {
        b.iter(|| {
            let mut data = Nested::default();
            unmarshal(black_box(&query), &mut data).unwrap();
            data
        })
    });

    c.bench_function("unmarshal_parsed_string", |b| {
        b.iter(|| {
            let query = QueryValues::parse(black_box("limit=10&page=1&fields=a&fields=b&fields=c"));
            let mut data = QueryStruct::default();
            unmarshal(&query, &mut data).unwrap();
            data
        })
    });
}

fn bench_marshal(c: &mut Criterion) {
    let mut data = Nested::default();
    unmarshal(&sample_query(), &mut data).unwrap();

    c.bench_function("marshal_nested", |b| {
        b.iter(|| marshal(black_box(&data)).unwrap())
    });

    c.bench_function("marshal_string_nested", |b| {
        b.iter(|| marshal_string(black_box(&data)).unwrap())
    });
}

criterion_group!(benches, bench_unmarshal, bench_marshal);
criterion_main!(benches);

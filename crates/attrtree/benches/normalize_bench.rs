use std::hint::black_box;

use attrtree::encode::to_text;
use attrtree::{Attr, MapOrder, Normalizer, Options};
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::Value;

fn json_small() -> Value {
    serde_json::json!({"a": 1, "b": [true, "x"], "c": null, "d": {}})
}

fn json_tabular(rows: usize, keys: usize) -> Value {
    let mut arr = Vec::with_capacity(rows);
    for i in 0..rows {
        let mut obj = serde_json::Map::with_capacity(keys);
        for k in 0..keys {
            obj.insert(format!("k{}", k), Value::from((i + k) as i64));
        }
        arr.push(Value::Object(obj));
    }
    Value::Object(serde_json::Map::from_iter([(String::from("rows"), Value::Array(arr))]))
}

fn json_nested(depth: usize, breadth: usize) -> Value {
    fn rec(d: usize, b: usize) -> Value {
        if d == 0 {
            return Value::from(1);
        }
        let mut m = serde_json::Map::new();
        for i in 0..b {
            m.insert(format!("k{}", i), rec(d - 1, b));
        }
        Value::Object(m)
    }
    rec(depth, breadth)
}

fn cases() -> Vec<(&'static str, Value)> {
    vec![
        ("small_obj", json_small()),
        ("tabular_1k", json_tabular(1000, 4)),
        ("nested", json_nested(4, 4)),
    ]
}

pub fn normalize_benchmarks(c: &mut Criterion) {
    let native = Normalizer::default();
    let sorted = Normalizer::new(Options::default().with_map_order(MapOrder::ByKey));
    let mut group = c.benchmark_group("normalize_json");
    for (name, v) in cases() {
        let len = serde_json::to_string(&v).map(|s| s.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("native::{name}"), |b| {
            b.iter(|| black_box(native.normalize(black_box(&v))))
        });
        group.bench_function(format!("by_key::{name}"), |b| {
            b.iter(|| black_box(sorted.normalize(black_box(&v))))
        });
        group.bench_function(format!("to_text::{name}"), |b| {
            b.iter_batched(
                || [Attr::new("doc", native.normalize(&v))],
                |attrs| black_box(to_text(&attrs)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, normalize_benchmarks);
criterion_main!(benches);

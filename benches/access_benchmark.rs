use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use attrpath::{AccessCache, Object, Record, Value};

/// Build a chain of records `root.child.child...leaf` of the given depth.
fn record_chain(depth: usize) -> (Object, String) {
	let mut current = Object::new(Record::new().with("leaf", Value::new(1u64)));
	let mut path = "leaf".to_string();
	for _ in 0..depth {
		current = Object::new(Record::new().with("child", Value::from(current)));
		path = format!("child.{path}");
	}
	(current, path)
}

fn bench_get_warm(c: &mut Criterion) {
	let cache = AccessCache::new();
	let obj = Object::new(Record::new().with("x", Value::new(1u64)));
	cache.get(&obj, "x").unwrap();

	c.bench_function("get_warm", |b| {
		b.iter(|| cache.get(black_box(&obj), black_box("x")).unwrap());
	});
}

fn bench_get_cold(c: &mut Criterion) {
	let cache = AccessCache::new();
	let obj = Object::new(Record::new().with("x", Value::new(1u64)));

	c.bench_function("get_cold", |b| {
		b.iter(|| {
			cache.clear();
			cache.get(black_box(&obj), black_box("x")).unwrap()
		});
	});
}

fn bench_get_uncached(c: &mut Criterion) {
	let cache = AccessCache::builder().start_disabled().build();
	let obj = Object::new(Record::new().with("x", Value::new(1u64)));

	c.bench_function("get_uncached", |b| {
		b.iter(|| cache.get(black_box(&obj), black_box("x")).unwrap());
	});
}

fn bench_dotted_depth(c: &mut Criterion) {
	let mut group = c.benchmark_group("get_dotted");

	for depth in [1, 4, 8] {
		let cache = AccessCache::new();
		let (root, path) = record_chain(depth);
		cache.get(&root, &path).unwrap();

		group.throughput(Throughput::Elements(depth as u64 + 1));
		group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
			b.iter(|| cache.get(black_box(&root), black_box(path.as_str())).unwrap());
		});
	}

	group.finish();
}

fn bench_set(c: &mut Criterion) {
	let cache = AccessCache::new();
	let obj = Object::new(Record::new().with("x", Value::new(0u64)));

	c.bench_function("set", |b| {
		b.iter(|| cache.set(black_box(&obj), black_box("x"), Value::new(1u64)).unwrap());
	});
}

criterion_group!(
	benches,
	bench_get_warm,
	bench_get_cold,
	bench_get_uncached,
	bench_dotted_depth,
	bench_set
);
criterion_main!(benches);

use proptest::prelude::*;

use attrpath::{AccessCache, Object, Record, Value};

fn field_name() -> impl Strategy<Value = String> {
	"[a-e][a-z]{0,6}"
}

/// Build a chain of records `root.child.child...` of the given depth, with
/// a numeric `leaf` field on the innermost record.
fn record_chain(depth: usize, leaf: u64) -> (Object, String) {
	let mut current = Object::new(Record::new().with("leaf", Value::new(leaf)));
	let mut path = "leaf".to_string();
	for _ in 0..depth {
		current = Object::new(Record::new().with("child", Value::from(current)));
		path = format!("child.{path}");
	}
	(current, path)
}

proptest! {
	#[test]
	fn test_set_get_round_trip(fields in prop::collection::vec((field_name(), any::<u64>()), 1..40)) {
		let cache = AccessCache::new();
		let record = Object::new(Record::new());
		let mut mirror = std::collections::HashMap::new();

		for (name, value) in &fields {
			cache.set(&record, name, Value::new(*value)).unwrap();
			mirror.insert(name.clone(), *value);
		}

		for (name, expected) in &mirror {
			let value = cache.get(&record, name).unwrap();
			prop_assert_eq!(value.downcast_ref::<u64>(), Some(expected));
		}
	}

	#[test]
	fn test_dotted_paths_round_trip(depth in 0usize..6, leaf in any::<u64>(), replacement in any::<u64>()) {
		let cache = AccessCache::new();
		let (root, path) = record_chain(depth, leaf);

		let value = cache.get(&root, &path).unwrap();
		prop_assert_eq!(value.downcast_ref::<u64>(), Some(&leaf));

		cache.set(&root, &path, Value::new(replacement)).unwrap();
		let value = cache.get(&root, &path).unwrap();
		prop_assert_eq!(value.downcast_ref::<u64>(), Some(&replacement));
	}

	#[test]
	fn test_dotted_equals_segmentwise(depth in 0usize..6, leaf in any::<u64>()) {
		let cache = AccessCache::new();
		let (root, path) = record_chain(depth, leaf);

		let dotted = cache.get(&root, &path).unwrap();

		let mut current = root;
		let mut segs = path.split('.').collect::<Vec<_>>();
		let last = segs.pop().unwrap();
		for seg in segs {
			current = cache.get(&current, seg).unwrap().object().unwrap();
		}
		let stepped = cache.get(&current, last).unwrap();

		prop_assert_eq!(dotted.downcast_ref::<u64>(), stepped.downcast_ref::<u64>());
	}

	#[test]
	fn test_warm_and_cold_caches_agree(
		fields in prop::collection::vec((field_name(), any::<u64>()), 1..20),
		probes in prop::collection::vec(field_name(), 1..20),
	) {
		let mut record = Record::new();
		for (name, value) in &fields {
			record = record.with(name.clone(), Value::new(*value));
		}
		let obj = Object::new(record);

		let warmed = AccessCache::new();
		for name in &probes {
			let _ = warmed.get(&obj, name);
		}
		let cold = AccessCache::new();

		for name in &probes {
			// `None` means the lookup failed; both caches must agree on
			// failures as well as values.
			let warm_result = warmed.get(&obj, name).ok().map(|v| *v.downcast_ref::<u64>().unwrap());
			let cold_result = cold.get(&obj, name).ok().map(|v| *v.downcast_ref::<u64>().unwrap());
			prop_assert_eq!(warm_result, cold_result);
		}
	}

	#[test]
	fn test_transparency_under_cache_churn(ops in prop::collection::vec((0u8..5, field_name(), any::<u64>()), 1..60)) {
		let cache = AccessCache::new();
		let record = Object::new(Record::new());
		let mut mirror = std::collections::HashMap::new();

		for (op, name, value) in &ops {
			match op {
				0 | 1 => {
					cache.set(&record, name, Value::new(*value)).unwrap();
					mirror.insert(name.clone(), *value);
				}
				2 => {
					let expected = mirror.get(name);
					let got = cache.get(&record, name).ok();
					prop_assert_eq!(got.as_ref().and_then(|v| v.downcast_ref::<u64>()), expected);
				}
				3 => cache.clear(),
				_ => {
					cache.disable();
					cache.enable();
				}
			}
		}

		for (name, expected) in &mirror {
			let value = cache.get(&record, name).unwrap();
			prop_assert_eq!(value.downcast_ref::<u64>(), Some(expected));
		}
	}
}

#[test]
fn test_no_panics_on_empty_cache_operations() {
	let cache = AccessCache::new();
	let record = Object::new(Record::new());

	assert!(cache.get(&record, "anything").is_err());
	assert_eq!(cache.len(), 1); // the failed read strategy is still cached
	cache.clear(); // should not panic
	assert!(cache.is_empty());
}

#[test]
fn test_repeated_sets_keep_one_entry() {
	let cache = AccessCache::new();
	let record = Object::new(Record::new());

	for i in 0..100u64 {
		cache.set(&record, "n", Value::new(i)).unwrap();
	}

	assert_eq!(cache.metrics().write_entries, 1);
	assert_eq!(cache.get(&record, "n").unwrap().downcast_ref::<u64>(), Some(&99));
}

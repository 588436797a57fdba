use std::sync::Arc;

use attrpath::{AccessCache, Getter, Model, Object, Value};

/// Walkthrough: a small object graph bound through the access cache, with
/// an accessor that takes precedence over plain field access.

struct Address {
	city: String,
	country: String,
}

impl Model for Address {
	fn field(&self, name: &str) -> Option<Value> {
		match name {
			"city" => Some(Value::new(self.city.clone())),
			"country" => Some(Value::new(self.country.clone())),
			_ => None,
		}
	}

	fn set_field(&mut self, name: &str, value: Value) -> bool {
		match name {
			"city" => match value.downcast_ref::<String>() {
				Some(city) => {
					self.city = city.clone();
					true
				}
				None => false,
			},
			_ => false,
		}
	}
}

struct Person {
	name: String,
	email: String,
	address: Object,
}

impl Model for Person {
	fn field(&self, name: &str) -> Option<Value> {
		match name {
			"name" => Some(Value::new(self.name.clone())),
			"email" => Some(Value::new(self.email.clone())),
			"address" => Some(Value::from(self.address.clone())),
			_ => None,
		}
	}

	fn set_field(&mut self, name: &str, value: Value) -> bool {
		match name {
			"name" => match value.downcast_ref::<String>() {
				Some(name) => {
					self.name = name.clone();
					true
				}
				None => false,
			},
			_ => false,
		}
	}

	// "display_name" is computed, not stored.
	fn getter(&self, name: &str) -> Option<Getter> {
		match name {
			"display_name" => Some(Arc::new(|model: &dyn Model| {
				let person = model.downcast_ref::<Person>().expect("bound to Person");
				Value::new(format!("{} <{}>", person.name, person.email))
			})),
			_ => None,
		}
	}
}

fn main() {
	let address = Object::new(Address {
		city: "Oslo".to_string(),
		country: "Norway".to_string(),
	});
	let person = Object::new(Person {
		name: "Ann".to_string(),
		email: "ann@example.com".to_string(),
		address,
	});

	let cache = AccessCache::new();

	// Dotted paths resolve segment by segment.
	let city = cache.get(&person, "address.city").unwrap();
	println!("city: {}", city.downcast_ref::<String>().unwrap());

	// Accessors win over plain fields.
	let display = cache.get(&person, "display_name").unwrap();
	println!("display: {}", display.downcast_ref::<String>().unwrap());

	// Writes go through the same machinery.
	cache.set(&person, "address.city", Value::new("Bergen".to_string())).unwrap();
	let city = cache.get(&person, "address.city").unwrap();
	println!("moved to: {}", city.downcast_ref::<String>().unwrap());

	// Missing attributes fall back to a default when one is supplied.
	let age = cache.get_or(&person, "age", Value::new(0u64));
	println!("age (defaulted): {}", age.downcast_ref::<u64>().unwrap());

	// Repeated access is answered from cached strategies.
	for _ in 0..1000 {
		cache.get(&person, "address.city").unwrap();
	}
	let metrics = cache.metrics();
	println!(
		"hits: {}, misses: {}, hit rate: {:.1}%",
		metrics.hits,
		metrics.misses,
		metrics.hit_rate() * 100.0
	);
}

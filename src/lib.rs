//! # attrpath
//!
//! Cached dotted-path attribute access for dynamic object graphs:
//! - **Dotted paths** (`"address.city"`) resolved segment by segment
//! - **Strategy caching**: the *resolution* is cached per
//!   `(object, attribute)`, never the value, so cached and uncached access
//!   always agree
//! - **Three-tier resolution**: per-type protocol, accessor table, plain
//!   fields, first match wins
//! - **Lifecycle-aware invalidation**: entries hold weak references and are
//!   dropped when their object dies, so a reused allocation address can
//!   never surface a stale strategy
//! - **Thread safety** via short-lived fine-grained locking; user accessors
//!   never run under a cache lock
//!
//! ## Quick Start
//!
//! ```rust
//! use attrpath::{AccessCache, Model, Object, Value};
//!
//! struct Address {
//!     city: String,
//! }
//!
//! impl Model for Address {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "city" => Some(Value::new(self.city.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_field(&mut self, name: &str, value: Value) -> bool {
//!         match name {
//!             "city" => match value.downcast_ref::<String>() {
//!                 Some(city) => {
//!                     self.city = city.clone();
//!                     true
//!                 }
//!                 None => false,
//!             },
//!             _ => false,
//!         }
//!     }
//! }
//!
//! struct Person {
//!     name: String,
//!     address: Object,
//! }
//!
//! impl Model for Person {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "name" => Some(Value::new(self.name.clone())),
//!             "address" => Some(Value::from(self.address.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_field(&mut self, name: &str, value: Value) -> bool {
//!         match name {
//!             "name" => match value.downcast_ref::<String>() {
//!                 Some(n) => {
//!                     self.name = n.clone();
//!                     true
//!                 }
//!                 None => false,
//!             },
//!             _ => false,
//!         }
//!     }
//! }
//!
//! let address = Object::new(Address { city: "Oslo".to_string() });
//! let person = Object::new(Person {
//!     name: "Ann".to_string(),
//!     address: address.clone(),
//! });
//!
//! let cache = AccessCache::new();
//!
//! let city = cache.get(&person, "address.city").unwrap();
//! assert_eq!(city.downcast_ref::<String>().map(String::as_str), Some("Oslo"));
//!
//! cache.set(&person, "address.city", Value::new("Bergen".to_string())).unwrap();
//! let city = cache.get(&person, "address.city").unwrap();
//! assert_eq!(city.downcast_ref::<String>().map(String::as_str), Some("Bergen"));
//! ```
//!
//! ## Accessors and the resolution protocol
//!
//! A type can expose named accessors that take precedence over its plain
//! fields, or take over resolution entirely, including delegating an
//! attribute to a different object and controlling whether the decision is
//! cached. See [`Model`] and [`Resolution`].
//!
//! ## Thread Safety
//!
//! The cache is `Send + Sync` and can be shared across threads via `Arc`:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(AccessCache::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cache = cache.clone();
//!         let person = person.clone();
//!         thread::spawn(move || cache.get(&person, "address.city"))
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```

mod builder;
mod cache;
mod error;
mod key;
mod metrics;
mod model;
mod path;
mod resolve;
mod strategy;

pub use builder::AccessCacheBuilder;
pub use cache::AccessCache;
pub use error::AccessError;
pub use metrics::CacheMetrics;
pub use model::{Model, Object, Record, Value, WeakObject};
pub use resolve::{CacheControl, Getter, Resolution, Setter};

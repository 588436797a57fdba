use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_queue::SegQueue;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::builder::AccessCacheBuilder;
use crate::error::AccessError;
use crate::key::EntryKey;
use crate::metrics::CacheMetrics;
use crate::model::{Object, Value};
use crate::path;
use crate::resolve;
use crate::strategy::{Applied, GetStrategy, SetStrategy};

/// Which strategy table a watched entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
	Readers,
	Writers,
}

/// Attribute access cache. Can be shared across threads via `Arc`.
///
/// Resolves dotted attribute paths (`"address.city"`) against [`Object`]s,
/// caching the resolution strategy (never the value) for each
/// `(object identity, attribute name)` pair. Read and write strategies live
/// in independent tables because a type may resolve the same name
/// differently for each direction.
///
/// Cached strategies hold their objects weakly by default. A strategy whose
/// object died is dropped on access and recomputed, and a deferred sweep
/// purges dead entries in bounded batches during write operations, so an
/// identity reused by a new allocation can never surface a stale strategy.
/// Strongly retained entries (see
/// [`CacheControl::retain_strong`](crate::CacheControl::retain_strong)) are
/// exempt from both and survive until a wholesale [`clear`](Self::clear).
///
/// # Example
///
/// ```
/// use attrpath::{AccessCache, Object, Record, Value};
///
/// let address = Object::new(Record::new().with("city", Value::new("Oslo".to_string())));
/// let person = Object::new(Record::new().with("address", Value::from(address)));
///
/// let cache = AccessCache::new();
/// let city = cache.get(&person, "address.city").unwrap();
/// assert_eq!(city.downcast_ref::<String>().map(String::as_str), Some("Oslo"));
///
/// cache.set(&person, "address.city", Value::new("Bergen".to_string())).unwrap();
/// let city = cache.get(&person, "address.city").unwrap();
/// assert_eq!(city.downcast_ref::<String>().map(String::as_str), Some("Bergen"));
/// ```
pub struct AccessCache {
	/// Cached read strategies.
	readers: RwLock<HashMap<EntryKey, GetStrategy>>,
	/// Cached write strategies.
	writers: RwLock<HashMap<EntryKey, SetStrategy>>,
	/// Keys of weak-holding entries, revisited by `sweep` (lock-free MPMC queue).
	watch: SegQueue<(Table, EntryKey)>,
	/// Whether strategies are cached at all.
	enabled: AtomicBool,
	/// Maximum watched entries revisited per sweep.
	sweep_limit: usize,
	hits: AtomicU64,
	misses: AtomicU64,
	resolves: AtomicU64,
	stale_evictions: AtomicU64,
	swept: AtomicU64,
}

impl AccessCache {
	/// Create a cache with default configuration.
	pub fn new() -> Self {
		Self::with_config(16, 0, true)
	}

	/// Create a builder for custom configuration.
	pub fn builder() -> AccessCacheBuilder {
		AccessCacheBuilder::new()
	}

	pub(crate) fn with_config(sweep_limit: usize, capacity: usize, enabled: bool) -> Self {
		Self {
			readers: RwLock::new(HashMap::with_capacity(capacity)),
			writers: RwLock::new(HashMap::with_capacity(capacity)),
			watch: SegQueue::new(),
			enabled: AtomicBool::new(enabled),
			sweep_limit,
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			resolves: AtomicU64::new(0),
			stale_evictions: AtomicU64::new(0),
			swept: AtomicU64::new(0),
		}
	}

	/// Resolve a dotted attribute path and return its value.
	///
	/// Errors with [`AccessError::MissingAttribute`] when a segment does not
	/// resolve and [`AccessError::NotAnObject`] when an intermediate segment
	/// yields a plain value.
	pub fn get(&self, obj: &Object, path: &str) -> Result<Value, AccessError> {
		self.get_inner(obj, path, None, false)
	}

	/// Like [`get`](Self::get), but any resolution failure along the path
	/// returns `default` instead of an error.
	pub fn get_or(&self, obj: &Object, path: &str, default: Value) -> Value {
		self.get_inner(obj, path, Some(default.clone()), false)
			.unwrap_or(default)
	}

	/// Resolve `name` as a single literal attribute, dots included.
	pub fn get_flat(&self, obj: &Object, name: &str) -> Result<Value, AccessError> {
		self.get_inner(obj, name, None, true)
	}

	/// Flat-mode counterpart of [`get_or`](Self::get_or).
	pub fn get_flat_or(&self, obj: &Object, name: &str, default: Value) -> Value {
		self.get_inner(obj, name, Some(default.clone()), true)
			.unwrap_or(default)
	}

	/// Resolve the dotted prefix of `path` and write `value` through the
	/// final segment.
	pub fn set(&self, obj: &Object, path: &str, value: Value) -> Result<(), AccessError> {
		self.set_inner(obj, path, value, false)
	}

	/// Flat-mode counterpart of [`set`](Self::set).
	pub fn set_flat(&self, obj: &Object, name: &str, value: Value) -> Result<(), AccessError> {
		self.set_inner(obj, name, value, true)
	}

	/// Wholesale invalidation: drop every cached strategy, including
	/// strongly retained ones, and empty the watch queue.
	///
	/// Call when swapping the model graph a proxy is bound to, so the cache
	/// cannot grow without bound pointing at stale instances.
	pub fn clear(&self) {
		self.readers.write().clear();
		self.writers.write().clear();
		while self.watch.pop().is_some() {}
		debug!("attribute access cache cleared");
	}

	/// Re-enable caching. Idempotent.
	pub fn enable(&self) {
		self.enabled.store(true, Ordering::Release);
	}

	/// Disable caching and clear existing entries. Every access resolves
	/// from scratch until [`enable`](Self::enable) is called; results are
	/// identical, only slower.
	pub fn disable(&self) {
		self.enabled.store(false, Ordering::Release);
		self.clear();
	}

	/// Whether strategies are currently being cached.
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Number of cached strategies across both tables.
	pub fn len(&self) -> usize {
		self.readers.read().len() + self.writers.read().len()
	}

	/// Check if the cache holds no strategies.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Snapshot of cache behavior counters.
	pub fn metrics(&self) -> CacheMetrics {
		CacheMetrics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			resolves: self.resolves.load(Ordering::Relaxed),
			stale_evictions: self.stale_evictions.load(Ordering::Relaxed),
			swept: self.swept.load(Ordering::Relaxed),
			read_entries: self.readers.read().len(),
			write_entries: self.writers.read().len(),
		}
	}

	fn get_inner(
		&self,
		obj: &Object,
		path: &str,
		default: Option<Value>,
		flat: bool,
	) -> Result<Value, AccessError> {
		match self.traverse(obj, path, flat) {
			Ok(value) => Ok(value),
			Err(err) => match default {
				Some(default) => Ok(default),
				None => Err(err),
			},
		}
	}

	/// Walk the path segment by segment. Each intermediate value must be an
	/// [`Object`]; each segment is cached keyed by the intermediate object
	/// it was resolved against, not the root.
	fn traverse(&self, obj: &Object, path: &str, flat: bool) -> Result<Value, AccessError> {
		let (prefix, last) = path::prefix_and_last(path, flat);
		let mut current = obj.clone();
		for segment in prefix {
			let value = self.get_segment(&current, segment)?;
			current = value.object().ok_or_else(|| AccessError::NotAnObject {
				path: path.to_owned(),
				segment: segment.to_owned(),
			})?;
		}
		self.get_segment(&current, last)
	}

	fn set_inner(&self, obj: &Object, path: &str, value: Value, flat: bool) -> Result<(), AccessError> {
		self.sweep();
		let (prefix, last) = path::prefix_and_last(path, flat);
		let mut current = obj.clone();
		for segment in prefix {
			let next = self.get_segment(&current, segment)?;
			current = next.object().ok_or_else(|| AccessError::NotAnObject {
				path: path.to_owned(),
				segment: segment.to_owned(),
			})?;
		}
		self.set_segment(&current, last, value)
	}

	/// Read one attribute of one object, through the read-strategy table.
	fn get_segment(&self, obj: &Object, name: &str) -> Result<Value, AccessError> {
		let key = EntryKey::new(obj.ident(), name);

		if self.is_enabled() {
			// Clone the strategy out so user accessors never run under the
			// table lock.
			let cached = self.readers.read().get(&key).cloned();
			if let Some(strategy) = cached {
				match strategy.get(obj) {
					Applied::Done(value) => {
						self.hits.fetch_add(1, Ordering::Relaxed);
						return value.ok_or_else(|| missing(obj, name));
					}
					Applied::Stale => {
						trace!(ident = key.ident, attr = name, "dropping stale read strategy");
						self.readers.write().remove(&key);
						self.stale_evictions.fetch_add(1, Ordering::Relaxed);
					}
				}
			}
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let (resolution, ctl) = resolve::resolve_get(obj, name);
		self.resolves.fetch_add(1, Ordering::Relaxed);

		// Evaluate the resolution before converting its object references
		// to weak ones, so a short-lived delegate cannot die in between.
		let value = match resolution.evaluate(obj) {
			Some(value) => value.ok_or_else(|| missing(obj, name))?,
			// The protocol signalled "use the caller's default".
			None => return Err(missing(obj, name)),
		};

		if self.is_enabled() && ctl.is_cacheable() {
			if let Some(strategy) = GetStrategy::from_resolution(obj, resolution, ctl.retention()) {
				self.store_read(key, strategy);
			}
		}
		Ok(value)
	}

	/// Write one attribute of one object, through the write-strategy table.
	fn set_segment(&self, obj: &Object, name: &str, value: Value) -> Result<(), AccessError> {
		let key = EntryKey::new(obj.ident(), name);

		if self.is_enabled() {
			let cached = self.writers.read().get(&key).cloned();
			if let Some(strategy) = cached {
				match strategy.set(obj, value.clone()) {
					Applied::Done(stored) => {
						self.hits.fetch_add(1, Ordering::Relaxed);
						return if stored { Ok(()) } else { Err(missing(obj, name)) };
					}
					Applied::Stale => {
						trace!(ident = key.ident, attr = name, "dropping stale write strategy");
						self.writers.write().remove(&key);
						self.stale_evictions.fetch_add(1, Ordering::Relaxed);
					}
				}
			}
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let (resolution, ctl) = resolve::resolve_set(obj, name);
		self.resolves.fetch_add(1, Ordering::Relaxed);

		let stored = match resolution.evaluate(obj, value) {
			Some(stored) => stored,
			// "Use default" has no meaning when writing.
			None => return Err(missing(obj, name)),
		};
		if !stored {
			return Err(missing(obj, name));
		}

		if self.is_enabled() && ctl.is_cacheable() {
			if let Some(strategy) = SetStrategy::from_resolution(obj, resolution, ctl.retention()) {
				self.store_write(key, strategy);
			}
		}
		Ok(())
	}

	fn store_read(&self, key: EntryKey, strategy: GetStrategy) {
		self.sweep();
		let needs_watch = strategy.needs_watch();
		self.readers.write().insert(key.clone(), strategy);
		if needs_watch {
			// The entry must be in the table before the sweep can see its key.
			self.watch.push((Table::Readers, key));
		}
	}

	fn store_write(&self, key: EntryKey, strategy: SetStrategy) {
		let needs_watch = strategy.needs_watch();
		self.writers.write().insert(key.clone(), strategy);
		if needs_watch {
			self.watch.push((Table::Writers, key));
		}
	}

	/// Purge a bounded batch of entries whose weak references died.
	///
	/// Runs during write operations so read-heavy paths stay lock-light;
	/// live entries are re-enqueued for the next round.
	fn sweep(&self) {
		for _ in 0..self.sweep_limit {
			let Some((table, key)) = self.watch.pop() else {
				break;
			};

			let state = match table {
				Table::Readers => self.readers.read().get(&key).map(GetStrategy::is_live),
				Table::Writers => self.writers.read().get(&key).map(SetStrategy::is_live),
			};
			match state {
				// Entry already dropped by a stale hit or a clear.
				None => {}
				Some(true) => self.watch.push((table, key)),
				Some(false) => {
					match table {
						Table::Readers => {
							self.readers.write().remove(&key);
						}
						Table::Writers => {
							self.writers.write().remove(&key);
						}
					}
					self.swept.fetch_add(1, Ordering::Relaxed);
					debug!(ident = key.ident, attr = &*key.name, "swept dead cache entry");
				}
			}
		}
	}
}

impl Default for AccessCache {
	fn default() -> Self {
		Self::new()
	}
}

fn missing(obj: &Object, name: &str) -> AccessError {
	AccessError::MissingAttribute {
		model: obj.read().model_name(),
		name: name.to_owned(),
	}
}

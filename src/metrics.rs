//! Cache behavior metrics.

/// Snapshot of cache behavior.
///
/// # Example
///
/// ```
/// use attrpath::AccessCache;
///
/// let cache = AccessCache::new();
/// // ... perform get/set operations ...
///
/// let metrics = cache.metrics();
/// println!("Hit rate: {:.2}%", metrics.hit_rate() * 100.0);
/// println!("Stale evictions: {}", metrics.stale_evictions);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
	/// Lookups answered by a cached strategy.
	pub hits: u64,
	/// Lookups that had to resolve a strategy.
	pub misses: u64,
	/// Resolutions computed through the protocol/accessor/field tiers.
	pub resolves: u64,
	/// Entries dropped after a dead weak reference was seen on access.
	pub stale_evictions: u64,
	/// Entries purged by the deferred sweep.
	pub swept: u64,
	/// Current number of cached read strategies.
	pub read_entries: usize,
	/// Current number of cached write strategies.
	pub write_entries: usize,
}

impl CacheMetrics {
	/// Cache hit rate as a ratio between 0.0 and 1.0.
	///
	/// Returns 0.0 if there have been no accesses.
	pub fn hit_rate(&self) -> f64 {
		let total = self.hits + self.misses;
		if total == 0 {
			0.0
		} else {
			self.hits as f64 / total as f64
		}
	}

	/// Total number of cache accesses (hits + misses).
	pub fn total_accesses(&self) -> u64 {
		self.hits + self.misses
	}

	/// Total number of cached strategies across both tables.
	pub fn total_entries(&self) -> usize {
		self.read_entries + self.write_entries
	}
}

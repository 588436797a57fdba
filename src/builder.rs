use crate::cache::AccessCache;

/// Builder for configuring an [`AccessCache`].
///
/// # Example
///
/// ```
/// use attrpath::AccessCacheBuilder;
///
/// let cache = AccessCacheBuilder::new()
///     .sweep_limit(64)
///     .capacity(1024)
///     .build();
/// assert!(cache.is_enabled());
/// ```
pub struct AccessCacheBuilder {
	sweep_limit: usize,
	capacity: usize,
	enabled: bool,
}

impl AccessCacheBuilder {
	/// Create a builder with default settings.
	pub fn new() -> Self {
		Self {
			sweep_limit: 16,
			capacity: 0,
			enabled: true,
		}
	}

	/// Maximum number of watched entries revisited per sweep.
	///
	/// Higher values reclaim dead entries faster at the cost of more work
	/// per write operation.
	///
	/// Default: 16
	pub fn sweep_limit(mut self, limit: usize) -> Self {
		assert!(limit > 0, "sweep_limit must be at least 1");
		self.sweep_limit = limit;
		self
	}

	/// Initial capacity of each strategy table, in entries.
	///
	/// Default: 0 (grow on demand)
	pub fn capacity(mut self, entries: usize) -> Self {
		self.capacity = entries;
		self
	}

	/// Start with caching disabled. Every access resolves from scratch
	/// until [`AccessCache::enable`] is called.
	pub fn start_disabled(mut self) -> Self {
		self.enabled = false;
		self
	}

	/// Build the cache with the configured settings.
	pub fn build(self) -> AccessCache {
		AccessCache::with_config(self.sweep_limit, self.capacity, self.enabled)
	}
}

impl Default for AccessCacheBuilder {
	fn default() -> Self {
		Self::new()
	}
}

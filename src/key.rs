use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Cache key: one attribute of one object.
///
/// The hash is precomputed at construction so table lookups never re-hash
/// the name.
#[derive(Clone, Debug)]
pub(crate) struct EntryKey {
	/// Identity of the owning object (allocation address).
	pub ident: usize,
	/// The attribute segment name.
	pub name: Arc<str>,
	/// Precomputed hash of `(ident, name)`.
	hash: u64,
}

impl EntryKey {
	pub fn new(ident: usize, name: &str) -> Self {
		let hash = Self::compute_hash(ident, name);
		Self {
			ident,
			name: Arc::from(name),
			hash,
		}
	}

	fn compute_hash(ident: usize, name: &str) -> u64 {
		let mut hasher = ahash::AHasher::default();
		ident.hash(&mut hasher);
		name.hash(&mut hasher);
		hasher.finish()
	}
}

impl Hash for EntryKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		// Use the precomputed hash to avoid re-hashing on every lookup.
		self.hash.hash(state);
	}
}

impl PartialEq for EntryKey {
	fn eq(&self, other: &Self) -> bool {
		self.hash == other.hash && self.ident == other.ident && self.name == other.name
	}
}

impl Eq for EntryKey {}

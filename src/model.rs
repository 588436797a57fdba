use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::resolve::{CacheControl, Getter, Resolution, Setter};

/// A domain object whose attributes can be read and written by name.
///
/// The cache resolves each attribute through three tiers, first match wins:
///
/// 1. [`Model::resolve_get`] / [`Model::resolve_set`]: the per-type
///    resolution protocol. A type that implements these controls resolution
///    outright, including delegation to other objects and cacheability.
/// 2. [`Model::getter`] / [`Model::setter`]: the accessor table. Named
///    accessors are preferred over plain fields when both exist.
/// 3. [`Model::field`] / [`Model::set_field`]: plain field storage.
///
/// # Example
///
/// ```
/// use attrpath::{Model, Value};
///
/// struct Address {
///     city: String,
/// }
///
/// impl Model for Address {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "city" => Some(Value::new(self.city.clone())),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, name: &str, value: Value) -> bool {
///         match name {
///             "city" => match value.downcast_ref::<String>() {
///                 Some(city) => {
///                     self.city = city.clone();
///                     true
///                 }
///                 None => false,
///             },
///             _ => false,
///         }
///     }
/// }
/// ```
pub trait Model: Any + Send + Sync {
	/// Read a plain field by name. `None` means the model has no such field.
	fn field(&self, name: &str) -> Option<Value>;

	/// Write a plain field by name.
	///
	/// Returns `false` when the model has no such field and cannot create
	/// one. Map-backed models such as [`Record`] accept any name.
	fn set_field(&mut self, name: &str, value: Value) -> bool;

	/// Named getter accessor for `name`, if the type provides one.
	///
	/// Accessors are preferred over plain fields.
	fn getter(&self, name: &str) -> Option<Getter> {
		let _ = name;
		None
	}

	/// Named setter accessor for `name`, if the type provides one.
	///
	/// A setter must not write back through the cache into its own object;
	/// it runs while the object's write lock is held.
	fn setter(&self, name: &str) -> Option<Setter> {
		let _ = name;
		None
	}

	/// Per-type read resolution override. Returning `None` falls through to
	/// the accessor table and then plain fields.
	fn resolve_get(&self, name: &str, ctl: &mut CacheControl) -> Option<Resolution<Getter>> {
		let _ = (name, ctl);
		None
	}

	/// Per-type write resolution override.
	fn resolve_set(&self, name: &str, ctl: &mut CacheControl) -> Option<Resolution<Setter>> {
		let _ = (name, ctl);
		None
	}

	/// Type name used in diagnostics and error messages.
	fn model_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl dyn Model {
	/// Downcast to a concrete model type.
	pub fn downcast_ref<M: Model>(&self) -> Option<&M> {
		(self as &dyn Any).downcast_ref()
	}

	/// Downcast to a concrete model type, mutably.
	pub fn downcast_mut<M: Model>(&mut self) -> Option<&mut M> {
		(self as &mut dyn Any).downcast_mut()
	}
}

/// Shared handle to a [`Model`].
///
/// Objects are cheap to clone and safe to share across threads. The cache
/// keys entries by [`Object::ident`], the address of the underlying
/// allocation, which is stable for the allocation's lifetime and may be
/// reused afterwards; the cache guards against that reuse with weak
/// references.
#[derive(Clone)]
pub struct Object {
	inner: Arc<RwLock<dyn Model>>,
}

impl Object {
	/// Wrap a model in a shared handle.
	pub fn new<M: Model>(model: M) -> Self {
		Self {
			inner: Arc::new(RwLock::new(model)),
		}
	}

	/// Stable identity of this object for the lifetime of its allocation.
	pub fn ident(&self) -> usize {
		Arc::as_ptr(&self.inner) as *const () as usize
	}

	/// Read access to the model.
	///
	/// Reads are recursive so accessors may take further read locks on the
	/// object they are invoked with.
	pub fn read(&self) -> RwLockReadGuard<'_, dyn Model> {
		self.inner.read_recursive()
	}

	/// Write access to the model.
	pub fn write(&self) -> RwLockWriteGuard<'_, dyn Model> {
		self.inner.write()
	}

	/// A weak handle that does not keep the model alive.
	pub fn downgrade(&self) -> WeakObject {
		WeakObject {
			inner: Arc::downgrade(&self.inner),
		}
	}

	/// True when both handles point at the same allocation.
	pub fn ptr_eq(&self, other: &Object) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Object").field("ident", &self.ident()).finish()
	}
}

/// Weak counterpart of [`Object`]. Upgrades fail once the model is dropped.
#[derive(Clone)]
pub struct WeakObject {
	inner: Weak<RwLock<dyn Model>>,
}

impl WeakObject {
	/// Recover a strong handle while the model is still alive.
	pub fn upgrade(&self) -> Option<Object> {
		self.inner.upgrade().map(|inner| Object { inner })
	}
}

/// A type-erased attribute value.
///
/// Values are `Arc`-backed, so cloning is a reference-count bump. A value
/// may hold an [`Object`], which is how intermediate segments of a dotted
/// path stay resolvable.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
	/// Erase a concrete value.
	pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
		Self(Arc::new(value))
	}

	/// Borrow the concrete value, if the type matches.
	pub fn downcast_ref<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.0.downcast_ref()
	}

	/// Clone the `Arc` without cloning the underlying value.
	///
	/// Returns `None` if the type doesn't match.
	pub fn downcast_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.0).downcast::<T>().ok()
	}

	/// Check the erased type without downcasting.
	pub fn is<T: Send + Sync + 'static>(&self) -> bool {
		self.0.is::<T>()
	}

	/// The held [`Object`], when this value is one.
	pub fn object(&self) -> Option<Object> {
		self.downcast_ref::<Object>().cloned()
	}
}

impl From<Object> for Value {
	fn from(obj: Object) -> Self {
		Value::new(obj)
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Value(..)")
	}
}

/// Map-backed dynamic model with heterogeneous `name -> value` storage.
///
/// Any field name is writable, so writes create fields on demand.
///
/// # Example
///
/// ```
/// use attrpath::{AccessCache, Object, Record, Value};
///
/// let record = Object::new(Record::new().with("title", Value::new("hello".to_string())));
/// let cache = AccessCache::new();
///
/// let title = cache.get(&record, "title").unwrap();
/// assert_eq!(title.downcast_ref::<String>().map(String::as_str), Some("hello"));
///
/// // Unknown names are created on write.
/// cache.set(&record, "count", Value::new(3u64)).unwrap();
/// assert_eq!(cache.get(&record, "count").unwrap().downcast_ref::<u64>(), Some(&3));
/// ```
#[derive(Default)]
pub struct Record {
	fields: HashMap<String, Value>,
}

impl Record {
	/// Create an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a field, builder-style.
	pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
		self.fields.insert(name.into(), value);
		self
	}
}

impl Model for Record {
	fn field(&self, name: &str) -> Option<Value> {
		self.fields.get(name).cloned()
	}

	fn set_field(&mut self, name: &str, value: Value) -> bool {
		self.fields.insert(name.to_owned(), value);
		true
	}

	fn model_name(&self) -> &'static str {
		"Record"
	}
}

use std::sync::Arc;

use tracing::trace;

use crate::model::{Model, Object, Value};

/// A getter accessor: computes an attribute's value from a model.
pub type Getter = Arc<dyn Fn(&dyn Model) -> Value + Send + Sync>;

/// A setter accessor: writes an attribute's value into a model.
pub type Setter = Arc<dyn Fn(&mut dyn Model, Value) + Send + Sync>;

/// Retention for the objects a cached strategy references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Retention {
	/// Weakly held; the entry invalidates when a referenced object dies.
	Weak,
	/// Strongly held; the entry keeps its objects alive and is only removed
	/// by a wholesale clear.
	Strong,
}

/// Handed to [`Model::resolve_get`]/[`Model::resolve_set`] so a resolution
/// can opt out of caching or ask for strong retention.
pub struct CacheControl {
	cacheable: bool,
	retention: Retention,
}

impl CacheControl {
	pub(crate) fn new() -> Self {
		Self {
			cacheable: true,
			retention: Retention::Weak,
		}
	}

	/// Mark the current resolution non-cacheable.
	///
	/// Use for volatile attributes whose resolution must be recomputed on
	/// every access.
	pub fn disable(&mut self) {
		self.cacheable = false;
	}

	/// Cache this resolution with strong references.
	///
	/// The entry keeps the objects it references alive and is never
	/// invalidated automatically; only a wholesale clear removes it.
	pub fn retain_strong(&mut self) {
		self.retention = Retention::Strong;
	}

	pub(crate) fn is_cacheable(&self) -> bool {
		self.cacheable
	}

	pub(crate) fn retention(&self) -> Retention {
		self.retention
	}
}

/// How one attribute of one model is reached.
///
/// Returned by the resolution protocol; `A` is [`Getter`] on the read path
/// and [`Setter`] on the write path.
pub enum Resolution<A> {
	/// Plain field access on the model itself, under the given name.
	///
	/// The name need not match the requested attribute, so a protocol can
	/// map a public name onto a different storage field.
	Field(Arc<str>),
	/// Accessor invoked with the model itself.
	Accessor(A),
	/// Plain field access on another object.
	BoundField(Object, Arc<str>),
	/// Accessor bound to another object.
	BoundAccessor(Object, A),
	/// Do not resolve; the caller's default applies instead.
	///
	/// Never cached. On the write path, where no default exists, this is
	/// reported as a missing attribute.
	UseDefault,
}

impl<A> Resolution<A> {
	/// Plain field access under `name`.
	pub fn field(name: &str) -> Self {
		Resolution::Field(Arc::from(name))
	}

	/// Plain field access on another object.
	pub fn bound_field(target: Object, name: &str) -> Self {
		Resolution::BoundField(target, Arc::from(name))
	}
}

impl Resolution<Getter> {
	/// Accessor invoked with the model itself.
	pub fn getter(f: impl Fn(&dyn Model) -> Value + Send + Sync + 'static) -> Self {
		Resolution::Accessor(Arc::new(f))
	}

	/// Evaluate against the owning object, bypassing any cache.
	///
	/// Outer `None` is the use-default signal; inner `None` means the
	/// attribute does not exist.
	pub(crate) fn evaluate(&self, owner: &Object) -> Option<Option<Value>> {
		match self {
			Resolution::Field(name) => Some(owner.read().field(name)),
			Resolution::Accessor(get) => Some(Some(get(&*owner.read()))),
			Resolution::BoundField(target, name) => Some(target.read().field(name)),
			Resolution::BoundAccessor(target, get) => Some(Some(get(&*target.read()))),
			Resolution::UseDefault => None,
		}
	}
}

impl Resolution<Setter> {
	/// Accessor invoked with the model itself.
	pub fn setter(f: impl Fn(&mut dyn Model, Value) + Send + Sync + 'static) -> Self {
		Resolution::Accessor(Arc::new(f))
	}

	/// Evaluate against the owning object, bypassing any cache.
	///
	/// `None` is the use-default signal; `Some(false)` means the target
	/// model rejected the field name.
	pub(crate) fn evaluate(&self, owner: &Object, value: Value) -> Option<bool> {
		match self {
			Resolution::Field(name) => Some(owner.write().set_field(name, value)),
			Resolution::Accessor(set) => {
				set(&mut *owner.write(), value);
				Some(true)
			}
			Resolution::BoundField(target, name) => Some(target.write().set_field(name, value)),
			Resolution::BoundAccessor(target, set) => {
				set(&mut *target.write(), value);
				Some(true)
			}
			Resolution::UseDefault => None,
		}
	}
}

/// Resolve how to read `name` from `obj`.
///
/// Precedence: per-type protocol, then the accessor table, then plain field
/// access. The protocol wins outright when it answers.
pub(crate) fn resolve_get(obj: &Object, name: &str) -> (Resolution<Getter>, CacheControl) {
	let mut ctl = CacheControl::new();
	let model = obj.read();
	if let Some(resolution) = model.resolve_get(name, &mut ctl) {
		return (resolution, ctl);
	}
	if let Some(get) = model.getter(name) {
		trace!(model = model.model_name(), attr = name, "read resolved via accessor table");
		return (Resolution::Accessor(get), ctl);
	}
	(Resolution::field(name), ctl)
}

/// Resolve how to write `name` on `obj`. Same precedence as the read path.
pub(crate) fn resolve_set(obj: &Object, name: &str) -> (Resolution<Setter>, CacheControl) {
	let mut ctl = CacheControl::new();
	let model = obj.read();
	if let Some(resolution) = model.resolve_set(name, &mut ctl) {
		return (resolution, ctl);
	}
	if let Some(set) = model.setter(name) {
		trace!(model = model.model_name(), attr = name, "write resolved via accessor table");
		return (Resolution::Accessor(set), ctl);
	}
	(Resolution::field(name), ctl)
}

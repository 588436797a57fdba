use std::sync::Arc;

use crate::model::{Object, Value, WeakObject};
use crate::resolve::{Getter, Resolution, Retention, Setter};

/// How a strategy holds on to an object it needs at apply time.
#[derive(Clone)]
pub(crate) enum Retained {
	Weak(WeakObject),
	Strong(Object),
}

impl Retained {
	fn of(obj: Object, retention: Retention) -> Self {
		match retention {
			Retention::Weak => Retained::Weak(obj.downgrade()),
			Retention::Strong => Retained::Strong(obj),
		}
	}

	/// Resolve to a live object, or `None` if the target died.
	fn live(&self) -> Option<Object> {
		match self {
			Retained::Weak(weak) => weak.upgrade(),
			Retained::Strong(obj) => Some(obj.clone()),
		}
	}

	fn is_weak(&self) -> bool {
		matches!(self, Retained::Weak(_))
	}
}

#[derive(Clone)]
enum Op<A> {
	/// Plain field access on the keyed object.
	Field(Arc<str>),
	/// Accessor invoked with the keyed object.
	Accessor(A),
	/// Plain field access on a delegate object.
	BoundField(Retained, Arc<str>),
	/// Accessor bound to a delegate object.
	BoundAccessor(Retained, A),
}

/// A cached decision on how to reach one attribute of one object.
///
/// Strategies cache the access path, never the value; applying a strategy
/// always consults the live object.
#[derive(Clone)]
pub(crate) struct Strategy<A> {
	/// Liveness anchor for the object the entry is keyed by.
	owner: Retained,
	op: Op<A>,
}

pub(crate) type GetStrategy = Strategy<Getter>;
pub(crate) type SetStrategy = Strategy<Setter>;

/// Outcome of applying a cached strategy.
pub(crate) enum Applied<T> {
	/// The strategy ran against live objects.
	Done(T),
	/// A weakly held object died; the entry must be dropped and recomputed.
	Stale,
}

impl<A> Strategy<A> {
	/// Build a cacheable strategy from a protocol resolution.
	///
	/// Returns `None` for [`Resolution::UseDefault`], which is never cached.
	pub fn from_resolution(owner: &Object, resolution: Resolution<A>, retention: Retention) -> Option<Self> {
		let op = match resolution {
			Resolution::Field(name) => Op::Field(name),
			Resolution::Accessor(accessor) => Op::Accessor(accessor),
			Resolution::BoundField(target, name) => Op::BoundField(Retained::of(target, retention), name),
			Resolution::BoundAccessor(target, accessor) => {
				Op::BoundAccessor(Retained::of(target, retention), accessor)
			}
			Resolution::UseDefault => return None,
		};
		Some(Self {
			owner: Retained::of(owner.clone(), retention),
			op,
		})
	}

	/// True while every object this strategy references is still alive.
	pub fn is_live(&self) -> bool {
		fn alive(retained: &Retained) -> bool {
			match retained {
				Retained::Weak(weak) => weak.upgrade().is_some(),
				Retained::Strong(_) => true,
			}
		}

		alive(&self.owner)
			&& match &self.op {
				Op::BoundField(target, _) | Op::BoundAccessor(target, _) => alive(target),
				Op::Field(_) | Op::Accessor(_) => true,
			}
	}

	/// True when the strategy holds weak references and must be registered
	/// with the sweep queue.
	pub fn needs_watch(&self) -> bool {
		self.owner.is_weak()
			|| match &self.op {
				Op::BoundField(target, _) | Op::BoundAccessor(target, _) => target.is_weak(),
				Op::Field(_) | Op::Accessor(_) => false,
			}
	}

	/// The keyed identity is only trustworthy while the object it was taken
	/// from is alive; a dead owner means the address may now belong to an
	/// unrelated object.
	fn owner_current(&self, owner: &Object) -> bool {
		match &self.owner {
			Retained::Weak(weak) => weak.upgrade().is_some_and(|live| live.ptr_eq(owner)),
			Retained::Strong(_) => true,
		}
	}
}

impl Strategy<Getter> {
	/// Read the attribute. `Done(None)` means the attribute does not exist.
	pub fn get(&self, owner: &Object) -> Applied<Option<Value>> {
		if !self.owner_current(owner) {
			return Applied::Stale;
		}
		match &self.op {
			Op::Field(name) => Applied::Done(owner.read().field(name)),
			Op::Accessor(get) => Applied::Done(Some(get(&*owner.read()))),
			Op::BoundField(target, name) => match target.live() {
				Some(target) => Applied::Done(target.read().field(name)),
				None => Applied::Stale,
			},
			Op::BoundAccessor(target, get) => match target.live() {
				Some(target) => Applied::Done(Some(get(&*target.read()))),
				None => Applied::Stale,
			},
		}
	}
}

impl Strategy<Setter> {
	/// Write the attribute. `Done(false)` means the model rejected the name.
	pub fn set(&self, owner: &Object, value: Value) -> Applied<bool> {
		if !self.owner_current(owner) {
			return Applied::Stale;
		}
		match &self.op {
			Op::Field(name) => Applied::Done(owner.write().set_field(name, value)),
			Op::Accessor(set) => {
				set(&mut *owner.write(), value);
				Applied::Done(true)
			}
			Op::BoundField(target, name) => match target.live() {
				Some(target) => Applied::Done(target.write().set_field(name, value)),
				None => Applied::Stale,
			},
			Op::BoundAccessor(target, set) => match target.live() {
				Some(target) => {
					set(&mut *target.write(), value);
					Applied::Done(true)
				}
				None => Applied::Stale,
			},
		}
	}
}

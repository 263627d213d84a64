//! Change listener registrations and the notification queue.
//!
//! Every write produces a batch of [`Notification`]s that is appended to a
//! FIFO queue. Only the outermost write drains the queue, so a listener that
//! writes another option never interrupts the pass it was called from: its
//! notifications run after everything already queued.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashMap as HashMap;
use vimopt_primitives::EditorId;

use crate::OptionGroup;
use crate::scope::OptionAccessScope;
use crate::value::OptionValue;

/// Called when the value of a global option changes.
pub type GlobalListener = Rc<dyn Fn(&OptionGroup)>;

/// Called once per editor whose effective value changed.
pub type EffectiveListener = Rc<dyn Fn(&OptionGroup, EditorId)>;

/// Called with the new value observed at the registration's scope.
pub type ScopedListener = Rc<dyn Fn(&OptionGroup, &OptionValue)>;

/// Handle returned by listener registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "listener#{}", self.0)
	}
}

pub(crate) struct ScopedEntry {
	pub id: ListenerId,
	pub scope: OptionAccessScope,
	pub listener: ScopedListener,
}

/// Per-option listener multimaps.
#[derive(Default)]
pub(crate) struct Listeners {
	next_id: u64,
	global: HashMap<Box<str>, Vec<(ListenerId, GlobalListener)>>,
	effective: HashMap<Box<str>, Vec<(ListenerId, EffectiveListener)>>,
	scoped: HashMap<Box<str>, Vec<ScopedEntry>>,
}

impl Listeners {
	fn next_id(&mut self) -> ListenerId {
		self.next_id += 1;
		ListenerId(self.next_id)
	}

	pub(crate) fn add_global(&mut self, option: &str, listener: GlobalListener) -> ListenerId {
		let id = self.next_id();
		self.global
			.entry(Box::from(option))
			.or_default()
			.push((id, listener));
		id
	}

	pub(crate) fn add_effective(&mut self, option: &str, listener: EffectiveListener) -> ListenerId {
		let id = self.next_id();
		self.effective
			.entry(Box::from(option))
			.or_default()
			.push((id, listener));
		id
	}

	pub(crate) fn add_scoped(
		&mut self,
		option: &str,
		scope: OptionAccessScope,
		listener: ScopedListener,
	) -> ListenerId {
		let id = self.next_id();
		self.scoped
			.entry(Box::from(option))
			.or_default()
			.push(ScopedEntry {
				id,
				scope,
				listener,
			});
		id
	}

	pub(crate) fn remove_global(&mut self, id: ListenerId) -> bool {
		remove_where(&mut self.global, |(entry, _)| *entry == id)
	}

	pub(crate) fn remove_effective(&mut self, id: ListenerId) -> bool {
		remove_where(&mut self.effective, |(entry, _)| *entry == id)
	}

	pub(crate) fn remove_scoped(&mut self, id: ListenerId) -> bool {
		remove_where(&mut self.scoped, |entry| entry.id == id)
	}

	/// Returns `true` while `id` is registered in any category.
	pub(crate) fn contains(&self, id: ListenerId) -> bool {
		self.global.values().flatten().any(|(entry, _)| *entry == id)
			|| self.effective.values().flatten().any(|(entry, _)| *entry == id)
			|| self.scoped.values().flatten().any(|entry| entry.id == id)
	}

	pub(crate) fn global_for(&self, option: &str) -> &[(ListenerId, GlobalListener)] {
		self.global.get(option).map(Vec::as_slice).unwrap_or_default()
	}

	pub(crate) fn effective_for(&self, option: &str) -> &[(ListenerId, EffectiveListener)] {
		self.effective.get(option).map(Vec::as_slice).unwrap_or_default()
	}

	pub(crate) fn scoped_for(&self, option: &str) -> &[ScopedEntry] {
		self.scoped.get(option).map(Vec::as_slice).unwrap_or_default()
	}

	/// Drops every registration for an unregistered option.
	pub(crate) fn forget_option(&mut self, option: &str) {
		self.global.remove(option);
		self.effective.remove(option);
		self.scoped.remove(option);
	}
}

fn remove_where<T>(map: &mut HashMap<Box<str>, Vec<T>>, pred: impl Fn(&T) -> bool) -> bool {
	let mut removed = false;
	for entries in map.values_mut() {
		let before = entries.len();
		entries.retain(|entry| !pred(entry));
		removed |= entries.len() != before;
	}
	map.retain(|_, entries| !entries.is_empty());
	removed
}

/// One pending listener invocation.
pub(crate) enum Notification {
	Global {
		id: ListenerId,
		listener: GlobalListener,
	},
	Effective {
		id: ListenerId,
		listener: EffectiveListener,
		editor: EditorId,
	},
	Scoped {
		id: ListenerId,
		listener: ScopedListener,
		value: OptionValue,
	},
}

impl Notification {
	fn id(&self) -> ListenerId {
		match self {
			Notification::Global { id, .. }
			| Notification::Effective { id, .. }
			| Notification::Scoped { id, .. } => *id,
		}
	}

	fn run(self, group: &OptionGroup) {
		match self {
			Notification::Global { listener, .. } => listener(group),
			Notification::Effective {
				listener, editor, ..
			} => listener(group, editor),
			Notification::Scoped {
				listener, value, ..
			} => listener(group, &value),
		}
	}
}

/// FIFO of pending notifications, drained by the outermost write.
#[derive(Default)]
pub(crate) struct Dispatcher {
	pending: RefCell<VecDeque<Notification>>,
	draining: Cell<bool>,
}

/// Ends a drain pass. A pass cut short by a panicking listener drops the
/// rest of its queue.
struct DrainGuard<'a>(&'a Dispatcher);

impl Drop for DrainGuard<'_> {
	fn drop(&mut self) {
		self.0.pending.borrow_mut().clear();
		self.0.draining.set(false);
	}
}

impl Dispatcher {
	/// Queues `batch` and, unless a pass is already running, drains the queue.
	pub(crate) fn dispatch(&self, group: &OptionGroup, batch: Vec<Notification>) {
		if batch.is_empty() && self.pending.borrow().is_empty() {
			return;
		}
		self.pending.borrow_mut().extend(batch);

		if self.draining.replace(true) {
			tracing::trace!(
				domain = "options",
				queued = self.pending.borrow().len(),
				"nested option change queued behind running dispatch"
			);
			return;
		}
		let _guard = DrainGuard(self);

		loop {
			let next = self.pending.borrow_mut().pop_front();
			let Some(notification) = next else {
				break;
			};
			if group.listener_registered(notification.id()) {
				notification.run(group);
			}
		}
	}
}

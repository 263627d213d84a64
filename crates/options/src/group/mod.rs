//! The option engine.
//!
//! [`OptionGroup`] is the single entry point for reading, writing, resetting
//! and observing options. Every mutation follows the same order:
//!
//! 1. the [`ScopedStore`] commits the value and reports what changed,
//! 2. derived-value cache entries for every affected editor are dropped,
//! 3. listener notifications are queued and drained.
//!
//! Methods take `&self`: state lives behind `RefCell`s that are never borrowed
//! while a listener or parser runs, so callbacks may read and write options.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};
use vimopt_primitives::{EditorHandle, EditorId};

use crate::access::{EffectiveOptions, GlobalOptions};
use crate::cache::DerivedCache;
use crate::descriptor::{OptionDescriptor, OptionScope};
use crate::error::{OptionError, Result};
use crate::listeners::{Dispatcher, ListenerId, Listeners, Notification};
use crate::registry::{OptionRef, OptionRegistry};
use crate::scope::OptionAccessScope;
use crate::store::{Changed, ScopedStore};
use crate::value::{FromOptionValue, OptionValue};


/// Registry, scoped storage, listeners and derived-value cache for one editor host.
#[derive(Default)]
pub struct OptionGroup {
	registry: RefCell<OptionRegistry>,
	store: RefCell<ScopedStore>,
	listeners: RefCell<Listeners>,
	cache: RefCell<DerivedCache>,
	dispatcher: Dispatcher,
}

impl OptionGroup {
	pub fn new() -> Self {
		Self::default()
	}

	// ── Registry ──

	/// Registers an option under its name and aliases.
	///
	/// No value is stored until the option is written or
	/// [`initialise_options`](Self::initialise_options) runs; reads fall back
	/// to the default.
	pub fn add_option(&self, def: OptionDescriptor) -> Result<OptionRef> {
		let def = self.registry.borrow_mut().add(def)?;
		debug!(
			domain = "options",
			option = def.name(),
			scope = def.scope().as_str(),
			"option registered"
		);
		Ok(def)
	}

	/// Unregisters an option and drops its values, cached parses and listeners.
	///
	/// Returns `None` without side effects when nothing is registered under `key`.
	pub fn remove_option(&self, key: &str) -> Option<OptionRef> {
		let def = self.registry.borrow_mut().remove(key)?;
		self.store.borrow_mut().forget_option(def.name());
		self.cache.borrow_mut().invalidate_option(def.name());
		self.listeners.borrow_mut().forget_option(def.name());
		debug!(domain = "options", option = def.name(), "option removed");
		Some(def)
	}

	/// Resolves a name or alias.
	pub fn get_option(&self, key: &str) -> Option<OptionRef> {
		self.registry.borrow().get(key)
	}

	/// Resolves a name or alias, failing with a suggestion when unknown.
	pub fn require_option(&self, key: &str) -> Result<OptionRef> {
		self.registry.borrow().require(key)
	}

	/// All registered options in registration order.
	pub fn get_all_options(&self) -> Vec<OptionRef> {
		self.registry.borrow().all()
	}

	fn resolve(&self, option: &OptionDescriptor) -> Result<OptionRef> {
		self.require_option(option.name())
	}

	// ── Lifecycle ──

	/// Repopulates every global value with its default. Safe to call repeatedly.
	///
	/// Listeners are not notified.
	pub fn initialise_options(&self) {
		let options = self.get_all_options();
		self.store.borrow_mut().initialise_global(&options);
		self.cache.borrow_mut().clear();
		debug!(domain = "options", count = options.len(), "global options initialised");
	}

	/// Creates the local values of a newly opened editor.
	///
	/// `source` is the editor the new one was opened from. With `is_split` the
	/// new window copies the source window's local values, otherwise its
	/// per-window globals. An unknown `source` is treated as absent.
	/// Listeners are not notified.
	pub fn initialise_local_options(&self, handle: EditorHandle, source: Option<EditorId>, is_split: bool) {
		let options = self.get_all_options();
		{
			let mut store = self.store.borrow_mut();
			let source = source.and_then(|id| {
				let found = store.editor(id);
				if found.is_none() {
					warn!(
						domain = "options",
						editor = %handle.editor,
						source = %id,
						"source editor not initialised; using global values"
					);
				}
				found
			});
			store.initialise_local(&options, handle, source, is_split);
		}
		self.cache.borrow_mut().invalidate_editor(handle.editor);
		debug!(
			domain = "options",
			editor = %handle.editor,
			buffer = %handle.buffer,
			window = %handle.window,
			is_split,
			"local options initialised"
		);
	}

	/// Forgets a closed editor. Buffer and window values survive while another
	/// editor still uses them.
	pub fn release_editor(&self, editor: EditorId) -> bool {
		let released = self.store.borrow_mut().release(editor).is_some();
		if released {
			self.cache.borrow_mut().invalidate_editor(editor);
			debug!(domain = "options", editor = %editor, "editor released");
		}
		released
	}

	/// Handles of every initialised editor.
	pub fn editors(&self) -> Vec<EditorHandle> {
		self.store.borrow().editors()
	}

	/// Resets global options, the editor's buffer values and the editor's window
	/// values to their defaults.
	///
	/// Global-local options are unset for the editor rather than defaulted, so
	/// the editor observes their current global value again. Listeners are
	/// notified as for normal writes.
	pub fn reset_all_options(&self, editor: EditorId) -> Result<()> {
		let handle = self
			.store
			.borrow()
			.editor(editor)
			.ok_or_else(|| OptionError::UninitializedOption {
				option: "all".to_string(),
				editor,
			})?;

		for def in self.get_all_options() {
			let default = self.store.borrow().default_value(&def);
			match def.scope() {
				OptionScope::Global => {
					self.set_option_value(&def, OptionAccessScope::Global, default)?;
				}
				OptionScope::LocalToBuffer => {
					self.set_option_value(&def, OptionAccessScope::Global, default.clone())?;
					self.set_option_value(&def, OptionAccessScope::Local(editor), default)?;
				}
				OptionScope::LocalToWindow => {
					self.set_option_value(&def, OptionAccessScope::Global, default.clone())?;
					self.store
						.borrow_mut()
						.set_window_global(&def, handle, default.clone());
					self.set_option_value(&def, OptionAccessScope::Local(editor), default)?;
				}
				OptionScope::GlobalOrLocalToBuffer | OptionScope::GlobalOrLocalToWindow => {
					if let Some(unset) = def.unset_value().cloned() {
						self.set_option_value(&def, OptionAccessScope::Local(editor), unset)?;
					}
				}
			}
		}
		debug!(domain = "options", editor = %editor, "all options reset");
		Ok(())
	}

	/// Clears every stored value, editor record, cached parse and default
	/// override. Registrations and listeners are kept.
	pub fn reset_all_options_for_testing(&self) {
		self.store.borrow_mut().clear();
		self.cache.borrow_mut().clear();
	}

	// ── Values ──

	/// Reads an option at `scope`.
	///
	/// `Global` returns the global value, which for local-only options is the
	/// value new editors start from. `Local`/`Effective` return the value the
	/// editor observes.
	pub fn get_option_value(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<OptionValue> {
		let def = self.resolve(option)?;
		self.store.borrow().value(&def, scope)
	}

	/// Reads an option and extracts it as `T`.
	pub fn get_typed<T: FromOptionValue>(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<T> {
		let value = self.get_option_value(option, scope)?;
		T::from_option(&value).ok_or_else(|| OptionError::TypeMismatch {
			option: option.name().to_string(),
			expected: T::option_type(),
			got: value.type_name(),
		})
	}

	pub fn get_bool(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<bool> {
		self.get_typed(option, scope)
	}

	pub fn get_int(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<i64> {
		self.get_typed(option, scope)
	}

	pub fn get_string(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<String> {
		self.get_typed(option, scope)
	}

	/// Writes an option at `scope`, then notifies listeners.
	///
	/// The value must match the option's type. The unset sentinel of a
	/// global-local option is also accepted at `Local` scope.
	pub fn set_option_value(
		&self,
		option: &OptionDescriptor,
		scope: OptionAccessScope,
		value: impl Into<OptionValue>,
	) -> Result<()> {
		let def = self.resolve(option)?;
		let value = value.into().coerce_to(def.value_type());
		check_value(&def, scope, &value)?;

		let changed = self.store.borrow_mut().write(&def, scope, value)?;
		if changed.any() {
			self.publish(&def, scope, changed);
		}
		Ok(())
	}

	/// Writes the default value at `scope`.
	///
	/// Unlike [`reset_all_options`](Self::reset_all_options), a `Local` reset
	/// of a global-local option stores the default instead of unsetting it.
	pub fn reset_default_value(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<()> {
		let def = self.resolve(option)?;
		let default = self.store.borrow().default_value(&def);
		self.set_option_value(&def, scope, default)
	}

	/// Makes the editor's local value follow the global one again (`:setlocal opt<`).
	///
	/// Buffer-local options copy the global value and window-local options copy
	/// the window's own global value. Global-local options are unset.
	pub fn reset_to_global_value(&self, option: &OptionDescriptor, editor: EditorId) -> Result<()> {
		let def = self.resolve(option)?;
		let scope = OptionAccessScope::Local(editor);
		match (def.scope(), def.unset_value()) {
			(OptionScope::Global, _) => Ok(()),
			(_, Some(unset)) => self.set_option_value(&def, scope, unset.clone()),
			(OptionScope::LocalToWindow, None) => {
				let snapshot = {
					let store = self.store.borrow();
					let handle = store.editor(editor).ok_or_else(|| OptionError::UninitializedOption {
						option: def.name().to_string(),
						editor,
					})?;
					store.window_global_value(&def, handle)
				};
				self.set_option_value(&def, scope, snapshot)
			}
			(_, None) => {
				let global = self.store.borrow().global_value(&def);
				self.set_option_value(&def, scope, global)
			}
		}
	}

	/// Returns `true` if the value read at `scope` equals the default.
	pub fn is_default_value(&self, option: &OptionDescriptor, scope: OptionAccessScope) -> Result<bool> {
		let def = self.resolve(option)?;
		let store = self.store.borrow();
		Ok(store.value(&def, scope)? == store.default_value(&def))
	}

	/// Returns `true` if a global-local option defers to its global value for `editor`.
	pub fn is_unset_value(&self, option: &OptionDescriptor, editor: EditorId) -> Result<bool> {
		let def = self.resolve(option)?;
		if !def.scope().is_global_local() {
			return Ok(false);
		}
		let local = self.store.borrow().local_value(&def, editor)?;
		Ok(def.is_unset(&local))
	}

	/// Replaces the default used by every later reset and default lookup.
	/// Values already stored are untouched.
	pub fn override_default_value(&self, option: &OptionDescriptor, value: impl Into<OptionValue>) -> Result<()> {
		let def = self.resolve(option)?;
		let value = value.into().coerce_to(def.value_type());
		if !value.matches_type(def.value_type()) {
			return Err(OptionError::TypeMismatch {
				option: def.name().to_string(),
				expected: def.value_type(),
				got: value.type_name(),
			});
		}
		self.store.borrow_mut().override_default(&def, value);
		Ok(())
	}

	// ── Derived values ──

	/// Returns `parse` applied to the effective value, memoized per editor.
	///
	/// `editor` is `None` for the global value and must otherwise be
	/// initialised. The parser runs only on the first call after the effective
	/// value changed.
	pub fn get_parsed_effective_option_value<T: 'static>(
		&self,
		option: &OptionDescriptor,
		editor: Option<EditorId>,
		parse: impl FnOnce(&OptionValue) -> T,
	) -> Result<Rc<T>> {
		let def = self.resolve(option)?;
		if let Some(editor) = editor
			&& self.store.borrow().editor(editor).is_none()
		{
			return Err(OptionError::UninitializedOption {
				option: def.name().to_string(),
				editor,
			});
		}
		let cached = self.cache.borrow().get::<T>(def.name(), editor);
		if let Some(hit) = cached {
			trace!(domain = "options", option = def.name(), editor = ?editor, "parsed value cache hit");
			return Ok(hit);
		}

		let scope = match editor {
			Some(editor) => OptionAccessScope::Local(editor),
			None => OptionAccessScope::Global,
		};
		let value = self.store.borrow().value(&def, scope)?;
		let parsed = Rc::new(parse(&value));
		trace!(domain = "options", option = def.name(), editor = ?editor, "parsed value cached");
		self.cache
			.borrow_mut()
			.insert(def.name(), editor, parsed.clone());
		Ok(parsed)
	}

	// ── Listeners ──

	/// Calls `listener` whenever the value of a global option changes.
	///
	/// Registering against a local or global-local option is allowed but the
	/// listener never fires.
	pub fn add_global_option_change_listener(
		&self,
		option: &OptionDescriptor,
		listener: impl Fn(&OptionGroup) + 'static,
	) -> Result<ListenerId> {
		let def = self.resolve(option)?;
		if def.scope() != OptionScope::Global {
			warn!(
				domain = "options",
				option = def.name(),
				scope = def.scope().as_str(),
				"global change listener on a non-global option will never fire"
			);
		}
		Ok(self
			.listeners
			.borrow_mut()
			.add_global(def.name(), Rc::new(listener)))
	}

	pub fn remove_global_option_change_listener(&self, id: ListenerId) -> bool {
		self.listeners.borrow_mut().remove_global(id)
	}

	/// Calls `listener` once for each editor whose effective value changed.
	pub fn add_effective_option_value_change_listener(
		&self,
		option: &OptionDescriptor,
		listener: impl Fn(&OptionGroup, EditorId) + 'static,
	) -> Result<ListenerId> {
		let def = self.resolve(option)?;
		Ok(self
			.listeners
			.borrow_mut()
			.add_effective(def.name(), Rc::new(listener)))
	}

	pub fn remove_effective_option_value_change_listener(&self, id: ListenerId) -> bool {
		self.listeners.borrow_mut().remove_effective(id)
	}

	/// Observes one option at one scope, receiving the new value.
	///
	/// A `Global` registration fires when the global value changes; an editor
	/// registration fires when that editor's effective value changes. With
	/// `execute_on_add` the listener also runs once immediately with the
	/// current value.
	pub fn add_listener(
		&self,
		option: &OptionDescriptor,
		scope: OptionAccessScope,
		listener: impl Fn(&OptionGroup, &OptionValue) + 'static,
		execute_on_add: bool,
	) -> Result<ListenerId> {
		let def = self.resolve(option)?;
		let current = if execute_on_add {
			Some(self.store.borrow().value(&def, scope)?)
		} else {
			None
		};

		let listener = Rc::new(listener);
		let id = self
			.listeners
			.borrow_mut()
			.add_scoped(def.name(), scope, listener.clone());

		if let Some(value) = current {
			self.dispatcher.dispatch(
				self,
				vec![Notification::Scoped {
					id,
					listener,
					value,
				}],
			);
		}
		Ok(id)
	}

	pub fn remove_listener(&self, id: ListenerId) -> bool {
		self.listeners.borrow_mut().remove_scoped(id)
	}

	pub(crate) fn listener_registered(&self, id: ListenerId) -> bool {
		self.listeners.borrow().contains(id)
	}

	/// Invalidates cached parses and dispatches listeners for a committed write.
	fn publish(&self, def: &OptionRef, scope: OptionAccessScope, changed: Changed) {
		debug!(
			domain = "options",
			option = def.name(),
			scope = %scope,
			global = changed.global,
			local = ?changed.local.map(|h| h.editor),
			"option changed"
		);

		let editors = self.affected_editors(def, changed);
		{
			let mut cache = self.cache.borrow_mut();
			if changed.global {
				cache.invalidate(def.name(), None);
			}
			for &editor in &editors {
				cache.invalidate(def.name(), Some(editor));
			}
		}

		let batch = self.notifications(def, changed.global, &editors);
		trace!(
			domain = "options",
			option = def.name(),
			editors = editors.len(),
			notifications = batch.len(),
			"dispatching option change"
		);
		self.dispatcher.dispatch(self, batch);
	}

	/// Editors whose effective value a write changed, each at most once.
	fn affected_editors(&self, def: &OptionDescriptor, changed: Changed) -> Vec<EditorId> {
		let store = self.store.borrow();
		let Some(partition) = def.scope().partition() else {
			return if changed.global {
				store.editor_ids()
			} else {
				Vec::new()
			};
		};

		let mut editors = Vec::new();
		if changed.global && def.scope().is_global_local() {
			editors = store.editors_deferring(def);
		}
		if let Some(handle) = changed.local {
			for editor in store.editors_sharing(partition, handle) {
				if !editors.contains(&editor) {
					editors.push(editor);
				}
			}
		}
		editors
	}

	/// Global listeners first, then effective-value listeners, then scoped listeners.
	fn notifications(&self, def: &OptionDescriptor, global_changed: bool, editors: &[EditorId]) -> Vec<Notification> {
		let listeners = self.listeners.borrow();
		let store = self.store.borrow();
		let mut batch = Vec::new();

		if global_changed && def.scope() == OptionScope::Global {
			for (id, listener) in listeners.global_for(def.name()) {
				batch.push(Notification::Global {
					id: *id,
					listener: listener.clone(),
				});
			}
		}

		for &editor in editors {
			for (id, listener) in listeners.effective_for(def.name()) {
				batch.push(Notification::Effective {
					id: *id,
					listener: listener.clone(),
					editor,
				});
			}
		}

		for entry in listeners.scoped_for(def.name()) {
			let fires = match entry.scope.editor() {
				None => global_changed,
				Some(editor) => editors.contains(&editor),
			};
			if !fires {
				continue;
			}
			match store.value(def, entry.scope) {
				Ok(value) => batch.push(Notification::Scoped {
					id: entry.id,
					listener: entry.listener.clone(),
					value,
				}),
				Err(err) => {
					trace!(domain = "options", option = def.name(), %err, "skipping scoped listener");
				}
			}
		}

		batch
	}

	// ── Views ──

	/// View over global options only.
	pub fn global(&self) -> GlobalOptions<'_> {
		GlobalOptions::new(self)
	}

	/// View over the values `editor` observes.
	pub fn effective(&self, editor: EditorId) -> EffectiveOptions<'_> {
		EffectiveOptions::new(self, editor)
	}
}

fn check_value(def: &OptionDescriptor, scope: OptionAccessScope, value: &OptionValue) -> Result<()> {
	if value.matches_type(def.value_type()) {
		return Ok(());
	}
	if matches!(scope, OptionAccessScope::Local(_)) && def.is_unset(value) {
		return Ok(());
	}
	Err(OptionError::TypeMismatch {
		option: def.name().to_string(),
		expected: def.value_type(),
		got: value.type_name(),
	})
}

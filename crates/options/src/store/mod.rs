//! Runtime storage for option values.
//!
//! [`ScopedStore`] owns every partition: the global values, one
//! [`OptionStore`] per buffer, and one [`WindowStore`] per window. Editors are
//! handles into those maps, so the store never holds on to host objects.
//!
//! All scope resolution happens here. Listener dispatch and caching live in
//! [`OptionGroup`](crate::OptionGroup), which consumes the [`Changed`] report
//! returned by [`ScopedStore::write`].

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};
use vimopt_primitives::{BufferId, EditorHandle, EditorId, WindowId};

use crate::descriptor::{OptionDescriptor, OptionScope, Partition};
use crate::error::{OptionError, Result};
use crate::registry::OptionRef;
use crate::scope::OptionAccessScope;
use crate::value::{OptionType, OptionValue};


/// Option values keyed by primary option name.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionStore {
	values: HashMap<Box<str>, OptionValue>,
}

impl OptionStore {
	pub(crate) fn get(&self, name: &str) -> Option<&OptionValue> {
		self.values.get(name)
	}

	pub(crate) fn set(&mut self, name: &str, value: OptionValue) {
		self.values.insert(Box::from(name), value);
	}

	pub(crate) fn remove(&mut self, name: &str) -> Option<OptionValue> {
		self.values.remove(name)
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.values.len()
	}
}

/// Values for one window.
#[derive(Debug, Clone, Default)]
pub(crate) struct WindowStore {
	/// Window-local and global-local-to-window values.
	local: OptionStore,
	/// Per-window global values, the template for windows split from this one.
	global: OptionStore,
}

/// What a write changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Changed {
	/// The global partition value changed.
	pub global: bool,
	/// The local partition of this editor's buffer or window changed.
	pub local: Option<EditorHandle>,
}

impl Changed {
	pub(crate) fn any(&self) -> bool {
		self.global || self.local.is_some()
	}
}

#[derive(Debug, Default)]
pub(crate) struct ScopedStore {
	global: OptionStore,
	default_overrides: OptionStore,
	buffers: HashMap<BufferId, OptionStore>,
	windows: HashMap<WindowId, WindowStore>,
	/// Open editors in initialisation order.
	editors: IndexMap<EditorId, EditorHandle, FxBuildHasher>,
}

impl ScopedStore {
	/// The default used for resets and for lazily absent global entries.
	pub(crate) fn default_value(&self, def: &OptionDescriptor) -> OptionValue {
		self.default_overrides
			.get(def.name())
			.cloned()
			.unwrap_or_else(|| def.default_value().clone())
	}

	pub(crate) fn override_default(&mut self, def: &OptionDescriptor, value: OptionValue) {
		self.default_overrides.set(def.name(), value);
	}

	pub(crate) fn editor(&self, editor: EditorId) -> Option<EditorHandle> {
		self.editors.get(&editor).copied()
	}

	pub(crate) fn editors(&self) -> Vec<EditorHandle> {
		self.editors.values().copied().collect()
	}

	fn handle(&self, def: &OptionDescriptor, editor: EditorId) -> Result<EditorHandle> {
		self.editor(editor)
			.ok_or_else(|| OptionError::UninitializedOption {
				option: def.name().to_string(),
				editor,
			})
	}

	fn local_store(&self, partition: Partition, handle: EditorHandle) -> Option<&OptionStore> {
		match partition {
			Partition::Buffer => self.buffers.get(&handle.buffer),
			Partition::Window => self.windows.get(&handle.window).map(|w| &w.local),
		}
	}

	fn local_store_mut(&mut self, partition: Partition, handle: EditorHandle) -> &mut OptionStore {
		match partition {
			Partition::Buffer => self.buffers.entry(handle.buffer).or_default(),
			Partition::Window => &mut self.windows.entry(handle.window).or_default().local,
		}
	}

	/// The global partition value.
	///
	/// For local-only options this is the value new editors start from.
	pub(crate) fn global_value(&self, def: &OptionDescriptor) -> OptionValue {
		self.global
			.get(def.name())
			.cloned()
			.unwrap_or_else(|| self.default_value(def))
	}

	/// The stored local value, which for global-local options may be the unset sentinel.
	///
	/// Options registered after the editor was initialised have no entry yet
	/// and read as freshly initialised.
	pub(crate) fn local_value(&self, def: &OptionDescriptor, editor: EditorId) -> Result<OptionValue> {
		let Some(partition) = def.scope().partition() else {
			return Ok(self.global_value(def));
		};
		let handle = self.handle(def, editor)?;
		Ok(self.local_value_at(def, partition, handle))
	}

	fn local_value_at(
		&self,
		def: &OptionDescriptor,
		partition: Partition,
		handle: EditorHandle,
	) -> OptionValue {
		if let Some(value) = self
			.local_store(partition, handle)
			.and_then(|store| store.get(def.name()))
		{
			return value.clone();
		}
		match def.unset_value() {
			Some(unset) => unset.clone(),
			None => self.global_value(def),
		}
	}

	/// The value `editor` observes, resolving global-local fallback.
	pub(crate) fn effective_value(&self, def: &OptionDescriptor, editor: EditorId) -> Result<OptionValue> {
		let local = self.local_value(def, editor)?;
		if def.is_unset(&local) {
			return Ok(self.global_value(def));
		}
		Ok(local)
	}

	pub(crate) fn value(&self, def: &OptionDescriptor, scope: OptionAccessScope) -> Result<OptionValue> {
		match scope {
			OptionAccessScope::Global => Ok(self.global_value(def)),
			OptionAccessScope::Local(editor) | OptionAccessScope::Effective(editor) => {
				self.effective_value(def, editor)
			}
		}
	}

	/// The per-window global value of a window-local option.
	pub(crate) fn window_global_value(&self, def: &OptionDescriptor, handle: EditorHandle) -> OptionValue {
		self.windows
			.get(&handle.window)
			.and_then(|w| w.global.get(def.name()))
			.cloned()
			.unwrap_or_else(|| self.global_value(def))
	}

	fn set_global(&mut self, def: &OptionDescriptor, value: OptionValue) -> bool {
		let changed = self.global_value(def) != value;
		self.global.set(def.name(), value);
		changed
	}

	fn set_local(
		&mut self,
		def: &OptionDescriptor,
		partition: Partition,
		handle: EditorHandle,
		value: OptionValue,
	) -> bool {
		let changed = self.local_value_at(def, partition, handle) != value;
		self.local_store_mut(partition, handle).set(def.name(), value);
		changed
	}

	pub(crate) fn set_window_global(&mut self, def: &OptionDescriptor, handle: EditorHandle, value: OptionValue) {
		self.windows
			.entry(handle.window)
			.or_default()
			.global
			.set(def.name(), value);
	}

	/// Commits `value` at `scope` and reports which partitions changed.
	///
	/// Fails before touching any partition when the scope names an editor that
	/// was never initialised and the option has local storage.
	pub(crate) fn write(
		&mut self,
		def: &OptionDescriptor,
		scope: OptionAccessScope,
		value: OptionValue,
	) -> Result<Changed> {
		let mut changed = Changed::default();
		let partition = def.scope().partition();

		match (scope, partition) {
			(OptionAccessScope::Global, _) | (_, None) => {
				changed.global = self.set_global(def, value);
			}
			(OptionAccessScope::Local(editor), Some(partition)) => {
				let handle = self.handle(def, editor)?;
				if self.set_local(def, partition, handle, value) {
					changed.local = Some(handle);
				}
			}
			(OptionAccessScope::Effective(editor), Some(partition)) => {
				let handle = self.handle(def, editor)?;
				let local = match (def.scope(), def.unset_value()) {
					(OptionScope::LocalToWindow, _) => {
						self.set_window_global(def, handle, value.clone());
						value.clone()
					}
					(_, Some(unset))
						if !matches!(def.value_type(), OptionType::Bool | OptionType::Int) =>
					{
						unset.clone()
					}
					_ => value.clone(),
				};
				changed.global = self.set_global(def, value);
				if self.set_local(def, partition, handle, local) {
					changed.local = Some(handle);
				}
			}
		}

		Ok(changed)
	}

	/// Editors sharing `handle`'s buffer or window.
	pub(crate) fn editors_sharing(&self, partition: Partition, handle: EditorHandle) -> Vec<EditorId> {
		self.editors
			.values()
			.filter(|h| match partition {
				Partition::Buffer => h.shares_buffer(&handle),
				Partition::Window => h.shares_window(&handle),
			})
			.map(|h| h.editor)
			.collect()
	}

	/// Editors whose local half of a global-local option is unset.
	pub(crate) fn editors_deferring(&self, def: &OptionDescriptor) -> Vec<EditorId> {
		let Some(partition) = def.scope().partition() else {
			return Vec::new();
		};
		self.editors
			.values()
			.filter(|h| def.is_unset(&self.local_value_at(def, partition, **h)))
			.map(|h| h.editor)
			.collect()
	}

	pub(crate) fn editor_ids(&self) -> Vec<EditorId> {
		self.editors.keys().copied().collect()
	}

	/// Repopulates the global partition with defaults.
	pub(crate) fn initialise_global(&mut self, options: &[OptionRef]) {
		let mut global = OptionStore::default();
		for def in options {
			global.set(def.name(), self.default_value(def));
		}
		self.global = global;
	}

	/// Creates the local values for `handle`.
	///
	/// Buffer values come from the global partition and are only created the
	/// first time a buffer is seen. Window values come from `source`: its local
	/// values when splitting, otherwise its per-window globals. Without a
	/// source they come from the global partition. Local halves of global-local
	/// options always start unset.
	pub(crate) fn initialise_local(
		&mut self,
		options: &[OptionRef],
		handle: EditorHandle,
		source: Option<EditorHandle>,
		is_split: bool,
	) {
		if !self.buffers.contains_key(&handle.buffer) {
			let mut buffer = OptionStore::default();
			for def in options
				.iter()
				.filter(|d| d.scope().partition() == Some(Partition::Buffer))
			{
				let value = match def.unset_value() {
					Some(unset) => unset.clone(),
					None => self.global_value(def),
				};
				buffer.set(def.name(), value);
			}
			self.buffers.insert(handle.buffer, buffer);
		}

		let window_in_use = self
			.editors
			.values()
			.any(|h| h.editor != handle.editor && h.shares_window(&handle));
		let keep_window = self.windows.contains_key(&handle.window) && (source.is_none() || window_in_use);
		if !keep_window {
			let template = source.and_then(|src| self.windows.get(&src.window).map(|w| (src, w)));
			let mut window = WindowStore::default();
			for def in options
				.iter()
				.filter(|d| d.scope().partition() == Some(Partition::Window))
			{
				if let Some(unset) = def.unset_value() {
					window.local.set(def.name(), unset.clone());
					continue;
				}
				let global = self.global_value(def);
				let (local, snapshot) = match template {
					Some((src, w)) => {
						let snapshot = w.global.get(def.name()).cloned().unwrap_or(global);
						let local = if is_split {
							self.local_value_at(def, Partition::Window, src)
						} else {
							snapshot.clone()
						};
						(local, snapshot)
					}
					None => (global.clone(), global),
				};
				window.local.set(def.name(), local);
				window.global.set(def.name(), snapshot);
			}
			self.windows.insert(handle.window, window);
		}

		self.editors.insert(handle.editor, handle);
	}

	/// Forgets `editor`, dropping partitions no other editor uses.
	pub(crate) fn release(&mut self, editor: EditorId) -> Option<EditorHandle> {
		let handle = self.editors.shift_remove(&editor)?;
		if !self.editors.values().any(|h| h.shares_buffer(&handle)) {
			self.buffers.remove(&handle.buffer);
		}
		if !self.editors.values().any(|h| h.shares_window(&handle)) {
			self.windows.remove(&handle.window);
		}
		Some(handle)
	}

	/// Drops every stored value of an unregistered option.
	pub(crate) fn forget_option(&mut self, name: &str) {
		self.global.remove(name);
		self.default_overrides.remove(name);
		for buffer in self.buffers.values_mut() {
			buffer.remove(name);
		}
		for window in self.windows.values_mut() {
			window.local.remove(name);
			window.global.remove(name);
		}
	}

	/// Clears every partition and editor record.
	pub(crate) fn clear(&mut self) {
		*self = Self::default();
	}

	#[cfg(test)]
	pub(crate) fn stored_global_len(&self) -> usize {
		self.global.len()
	}
}

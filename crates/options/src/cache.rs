//! Memoized transforms of effective option values.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap as HashMap;
use vimopt_primitives::EditorId;

/// Parsed values keyed by option name, then by editor (`None` for the global value).
#[derive(Debug, Default)]
pub(crate) struct DerivedCache {
	entries: HashMap<Box<str>, HashMap<Option<EditorId>, Rc<dyn Any>>>,
}

impl DerivedCache {
	/// Returns the cached value if one exists with type `T`.
	pub(crate) fn get<T: 'static>(&self, name: &str, editor: Option<EditorId>) -> Option<Rc<T>> {
		let entry = self.entries.get(name)?.get(&editor)?.clone();
		entry.downcast::<T>().ok()
	}

	pub(crate) fn insert<T: 'static>(&mut self, name: &str, editor: Option<EditorId>, value: Rc<T>) {
		match self.entries.get_mut(name) {
			Some(per_editor) => {
				per_editor.insert(editor, value);
			}
			None => {
				let mut per_editor: HashMap<Option<EditorId>, Rc<dyn Any>> = HashMap::default();
				per_editor.insert(editor, value);
				self.entries.insert(Box::from(name), per_editor);
			}
		}
	}

	pub(crate) fn invalidate(&mut self, name: &str, editor: Option<EditorId>) {
		if let Some(per_editor) = self.entries.get_mut(name) {
			per_editor.remove(&editor);
		}
	}

	pub(crate) fn invalidate_option(&mut self, name: &str) {
		self.entries.remove(name);
	}

	pub(crate) fn invalidate_editor(&mut self, editor: EditorId) {
		for per_editor in self.entries.values_mut() {
			per_editor.remove(&Some(editor));
		}
	}

	pub(crate) fn clear(&mut self) {
		self.entries.clear();
	}
}

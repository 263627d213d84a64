//! Name and alias index over registered option descriptors.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};

use crate::descriptor::OptionDescriptor;
use crate::error::{OptionError, Result};


/// Shared handle to a registered option.
pub type OptionRef = Rc<OptionDescriptor>;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGEST_DISTANCE: usize = 3;

/// Registry of option descriptors keyed by primary name and alias.
#[derive(Debug, Default)]
pub struct OptionRegistry {
	/// Primary names in registration order.
	by_name: IndexMap<Box<str>, OptionRef, FxBuildHasher>,
	/// Primary names and aliases.
	by_key: HashMap<Box<str>, OptionRef>,
}

impl OptionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `def` under its name and every alias.
	///
	/// Nothing is registered when any key collides.
	pub fn add(&mut self, def: OptionDescriptor) -> Result<OptionRef> {
		if !def.default_value().matches_type(def.value_type()) {
			return Err(OptionError::TypeMismatch {
				option: def.name().to_string(),
				expected: def.value_type(),
				got: def.default_value().type_name(),
			});
		}

		let mut seen: Vec<&str> = Vec::new();
		for key in def.names() {
			if self.by_key.contains_key(key) || seen.contains(&key) {
				return Err(OptionError::DuplicateOption {
					name: key.to_string(),
				});
			}
			seen.push(key);
		}

		let def = Rc::new(def);
		for key in def.names() {
			self.by_key.insert(Box::from(key), def.clone());
		}
		self.by_name.insert(Box::from(def.name()), def.clone());
		Ok(def)
	}

	/// Unregisters the option reachable through `key`, dropping all of its keys.
	pub fn remove(&mut self, key: &str) -> Option<OptionRef> {
		let def = self.by_key.get(key)?.clone();
		self.by_key.retain(|_, v| !Rc::ptr_eq(v, &def));
		self.by_name.shift_remove(def.name());
		Some(def)
	}

	/// Resolves a primary name or alias.
	pub fn get(&self, key: &str) -> Option<OptionRef> {
		self.by_key.get(key).cloned()
	}

	/// All registered options in registration order.
	pub fn all(&self) -> Vec<OptionRef> {
		self.by_name.values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	/// Suggests a registered name or alias close to `key`.
	pub fn suggest(&self, key: &str) -> Option<String> {
		self.by_key
			.keys()
			.map(|k| (strsim::levenshtein(key, k), k))
			.filter(|(dist, _)| *dist <= SUGGEST_DISTANCE)
			.min_by(|(da, ka), (db, kb)| da.cmp(db).then_with(|| ka.cmp(kb)))
			.map(|(_, k)| k.to_string())
	}

	/// Resolves `key` or builds an [`OptionError::UnknownOption`] with a suggestion.
	pub fn require(&self, key: &str) -> Result<OptionRef> {
		self.get(key).ok_or_else(|| OptionError::UnknownOption {
			name: key.to_string(),
			suggestion: self.suggest(key),
		})
	}
}

//! Name-based views over an [`OptionGroup`].
//!
//! Hosts that resolve options by name (`:set ts=4`, scripting bridges) use
//! these instead of holding descriptors.

use std::rc::Rc;

use vimopt_primitives::EditorId;

use crate::OptionGroup;
use crate::descriptor::OptionScope;
use crate::error::{OptionError, Result};
use crate::registry::OptionRef;
use crate::scope::OptionAccessScope;
use crate::value::{FromOptionValue, OptionValue};

/// Option reads and writes by name at a fixed scope.
pub trait OptionAccess {
	/// Resolves a name or alias visible through this view.
	fn lookup(&self, name: &str) -> Result<OptionRef>;

	/// Options visible through this view, in registration order.
	fn options(&self) -> Vec<OptionRef>;

	fn option_raw(&self, name: &str) -> Result<OptionValue>;

	fn set_option_raw(&self, name: &str, value: OptionValue) -> Result<()>;

	/// Reads an option and extracts it as `T`.
	fn option<T: FromOptionValue>(&self, name: &str) -> Result<T>
	where
		Self: Sized,
	{
		let value = self.option_raw(name)?;
		T::from_option(&value).ok_or_else(|| OptionError::TypeMismatch {
			option: name.to_string(),
			expected: T::option_type(),
			got: value.type_name(),
		})
	}
}

/// Global options only, read and written at [`OptionAccessScope::Global`].
#[derive(Clone, Copy)]
pub struct GlobalOptions<'a> {
	group: &'a OptionGroup,
}

impl<'a> GlobalOptions<'a> {
	pub(crate) fn new(group: &'a OptionGroup) -> Self {
		Self { group }
	}
}

impl OptionAccess for GlobalOptions<'_> {
	fn lookup(&self, name: &str) -> Result<OptionRef> {
		let def = self.group.require_option(name)?;
		if def.scope() != OptionScope::Global {
			return Err(OptionError::NotGlobal {
				option: def.name().to_string(),
			});
		}
		Ok(def)
	}

	fn options(&self) -> Vec<OptionRef> {
		self.group
			.get_all_options()
			.into_iter()
			.filter(|def| def.scope() == OptionScope::Global)
			.collect()
	}

	fn option_raw(&self, name: &str) -> Result<OptionValue> {
		let def = self.lookup(name)?;
		self.group.get_option_value(&def, OptionAccessScope::Global)
	}

	fn set_option_raw(&self, name: &str, value: OptionValue) -> Result<()> {
		let def = self.lookup(name)?;
		self.group
			.set_option_value(&def, OptionAccessScope::Global, value)
	}
}

/// Every option as one editor observes it.
///
/// Writes behave like `:set`: they update the editor's local value and the
/// global value together.
#[derive(Clone, Copy)]
pub struct EffectiveOptions<'a> {
	group: &'a OptionGroup,
	editor: EditorId,
}

impl<'a> EffectiveOptions<'a> {
	pub(crate) fn new(group: &'a OptionGroup, editor: EditorId) -> Self {
		Self { group, editor }
	}

	pub fn editor(&self) -> EditorId {
		self.editor
	}

	/// Memoized transform of an effective value.
	pub fn parsed<T: 'static>(&self, name: &str, parse: impl FnOnce(&OptionValue) -> T) -> Result<Rc<T>> {
		let def = self.lookup(name)?;
		self.group
			.get_parsed_effective_option_value(&def, Some(self.editor), parse)
	}
}

impl OptionAccess for EffectiveOptions<'_> {
	fn lookup(&self, name: &str) -> Result<OptionRef> {
		self.group.require_option(name)
	}

	fn options(&self) -> Vec<OptionRef> {
		self.group.get_all_options()
	}

	fn option_raw(&self, name: &str) -> Result<OptionValue> {
		let def = self.lookup(name)?;
		self.group
			.get_option_value(&def, OptionAccessScope::Local(self.editor))
	}

	fn set_option_raw(&self, name: &str, value: OptionValue) -> Result<()> {
		let def = self.lookup(name)?;
		self.group
			.set_option_value(&def, OptionAccessScope::Effective(self.editor), value)
	}
}

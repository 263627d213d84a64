use crate::list::ListStyle;
use crate::value::{OptionType, OptionValue};

/// The scope class an option is declared with.
///
/// Fixed for the lifetime of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionScope {
	/// One value shared by every editor.
	Global,
	/// One value per buffer, no global fallback.
	LocalToBuffer,
	/// One value per window, no global fallback.
	LocalToWindow,
	/// Global value with an optional per-buffer override.
	GlobalOrLocalToBuffer,
	/// Global value with an optional per-window override.
	GlobalOrLocalToWindow,
}

/// Which local partition holds an option's per-editor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Partition {
	Buffer,
	Window,
}

impl OptionScope {
	/// Returns `true` for the two hybrid scopes.
	pub fn is_global_local(self) -> bool {
		matches!(
			self,
			OptionScope::GlobalOrLocalToBuffer | OptionScope::GlobalOrLocalToWindow
		)
	}

	/// Returns `true` for options that only exist per buffer or per window.
	pub fn is_local_only(self) -> bool {
		matches!(self, OptionScope::LocalToBuffer | OptionScope::LocalToWindow)
	}

	pub(crate) fn partition(self) -> Option<Partition> {
		match self {
			OptionScope::Global => None,
			OptionScope::LocalToBuffer | OptionScope::GlobalOrLocalToBuffer => {
				Some(Partition::Buffer)
			}
			OptionScope::LocalToWindow | OptionScope::GlobalOrLocalToWindow => {
				Some(Partition::Window)
			}
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			OptionScope::Global => "global",
			OptionScope::LocalToBuffer => "buffer",
			OptionScope::LocalToWindow => "window",
			OptionScope::GlobalOrLocalToBuffer => "global-or-buffer",
			OptionScope::GlobalOrLocalToWindow => "global-or-window",
		}
	}
}

/// Immutable metadata for one option.
///
/// Built with [`OptionDescriptor::new`] or one of the typed shorthands and
/// handed to [`OptionGroup::add_option`](crate::OptionGroup::add_option),
/// which validates the default against the declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
	name: Box<str>,
	aliases: Vec<Box<str>>,
	scope: OptionScope,
	value_type: OptionType,
	default: OptionValue,
	unset: Option<OptionValue>,
}

impl OptionDescriptor {
	pub fn new(
		name: impl Into<Box<str>>,
		scope: OptionScope,
		value_type: OptionType,
		default: impl Into<OptionValue>,
	) -> Self {
		Self {
			name: name.into(),
			aliases: Vec::new(),
			scope,
			value_type,
			default: default.into().coerce_to(value_type),
			unset: scope
				.is_global_local()
				.then(|| value_type.default_unset_value()),
		}
	}

	pub fn bool(name: impl Into<Box<str>>, scope: OptionScope, default: bool) -> Self {
		Self::new(name, scope, OptionType::Bool, default)
	}

	pub fn int(name: impl Into<Box<str>>, scope: OptionScope, default: i64) -> Self {
		Self::new(name, scope, OptionType::Int, default)
	}

	pub fn string(name: impl Into<Box<str>>, scope: OptionScope, default: &str) -> Self {
		Self::new(name, scope, OptionType::String, default)
	}

	pub fn list(
		name: impl Into<Box<str>>,
		scope: OptionScope,
		style: ListStyle,
		default: &str,
	) -> Self {
		Self::new(
			name,
			scope,
			OptionType::List(style),
			OptionValue::List(default.to_string()),
		)
	}

	/// Adds an abbreviation (`ts` for `tabstop`).
	pub fn with_alias(mut self, alias: impl Into<Box<str>>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	/// Replaces the unset sentinel of a global-local option. Ignored for other scopes.
	pub fn with_unset_value(mut self, unset: impl Into<OptionValue>) -> Self {
		if self.scope.is_global_local() {
			self.unset = Some(unset.into().coerce_to(self.value_type));
		}
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn aliases(&self) -> impl Iterator<Item = &str> {
		self.aliases.iter().map(AsRef::as_ref)
	}

	/// Primary name followed by every alias.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.name()).chain(self.aliases())
	}

	pub fn scope(&self) -> OptionScope {
		self.scope
	}

	pub fn value_type(&self) -> OptionType {
		self.value_type
	}

	/// The declared default. Overrides installed with
	/// [`OptionGroup::override_default_value`](crate::OptionGroup::override_default_value)
	/// are not reflected here.
	pub fn default_value(&self) -> &OptionValue {
		&self.default
	}

	/// The "use global" sentinel, present only for global-local options.
	pub fn unset_value(&self) -> Option<&OptionValue> {
		self.unset.as_ref()
	}

	/// Returns `true` if `value` is this option's unset sentinel.
	pub fn is_unset(&self, value: &OptionValue) -> bool {
		self.unset.as_ref() == Some(value)
	}
}

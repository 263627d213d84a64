use core::fmt;

use crate::list::ListStyle;

/// The value of an option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
	/// Toggle value (`:set number` / `:set nonumber`).
	Bool(bool),
	/// Number value.
	Int(i64),
	/// Free-form string value.
	String(String),
	/// Raw text of a comma or flag separated list. The separator is defined by
	/// the owning option's [`OptionType::List`] style.
	List(String),
}

impl OptionValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			OptionValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			OptionValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the text of a `String` or `List` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			OptionValue::String(v) | OptionValue::List(v) => Some(v),
			_ => None,
		}
	}

	/// Splits a `List` value into its items using `style`.
	///
	/// Returns `None` for non-list values.
	pub fn list_items(&self, style: ListStyle) -> Option<Vec<&str>> {
		match self {
			OptionValue::List(raw) => Some(style.split(raw)),
			_ => None,
		}
	}

	/// Returns true if this value matches the given type.
	pub fn matches_type(&self, ty: OptionType) -> bool {
		matches!(
			(self, ty),
			(OptionValue::Bool(_), OptionType::Bool)
				| (OptionValue::Int(_), OptionType::Int)
				| (OptionValue::String(_), OptionType::String)
				| (OptionValue::List(_), OptionType::List(_))
		)
	}

	/// Reinterprets string text as a list when `ty` is a list type.
	///
	/// `From<&str>` always yields `String`, so list writes go through here.
	pub fn coerce_to(self, ty: OptionType) -> Self {
		match (self, ty) {
			(OptionValue::String(raw), OptionType::List(_)) => OptionValue::List(raw),
			(value, _) => value,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			OptionValue::Bool(_) => "bool",
			OptionValue::Int(_) => "int",
			OptionValue::String(_) => "string",
			OptionValue::List(_) => "list",
		}
	}
}

impl fmt::Display for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OptionValue::Bool(v) => write!(f, "{v}"),
			OptionValue::Int(v) => write!(f, "{v}"),
			OptionValue::String(v) | OptionValue::List(v) => f.write_str(v),
		}
	}
}

impl From<bool> for OptionValue {
	fn from(v: bool) -> Self {
		OptionValue::Bool(v)
	}
}

impl From<i64> for OptionValue {
	fn from(v: i64) -> Self {
		OptionValue::Int(v)
	}
}

impl From<String> for OptionValue {
	fn from(v: String) -> Self {
		OptionValue::String(v)
	}
}

impl From<&str> for OptionValue {
	fn from(v: &str) -> Self {
		OptionValue::String(v.to_string())
	}
}

/// The type of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
	/// Toggle type.
	Bool,
	/// Number type.
	Int,
	/// String type.
	String,
	/// String list with the given separator style.
	List(ListStyle),
}

impl OptionType {
	/// Returns the type name used in diagnostics.
	pub fn name(self) -> &'static str {
		match self {
			OptionType::Bool => "bool",
			OptionType::Int => "int",
			OptionType::String => "string",
			OptionType::List(_) => "list",
		}
	}

	/// Sentinel stored in the local half of a global-local option to mean
	/// "use the global value".
	///
	/// Toggles have no spare boolean, so they share the number sentinel `-1`.
	pub fn default_unset_value(self) -> OptionValue {
		match self {
			OptionType::Bool | OptionType::Int => OptionValue::Int(-1),
			OptionType::String => OptionValue::String(String::new()),
			OptionType::List(_) => OptionValue::List(String::new()),
		}
	}
}

impl fmt::Display for OptionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

// Seal the FromOptionValue trait to prevent external implementations.
mod sealed {
	pub trait Sealed {}
	impl Sealed for i64 {}
	impl Sealed for bool {}
	impl Sealed for String {}
}

/// Trait for types that can be extracted from an [`OptionValue`].
pub trait FromOptionValue: sealed::Sealed + Sized {
	/// Extracts the value from an `OptionValue`, returning `None` if the type doesn't match.
	fn from_option(value: &OptionValue) -> Option<Self>;

	/// Returns the `OptionType` corresponding to this Rust type.
	fn option_type() -> OptionType;
}

impl FromOptionValue for i64 {
	fn from_option(value: &OptionValue) -> Option<Self> {
		value.as_int()
	}

	fn option_type() -> OptionType {
		OptionType::Int
	}
}

impl FromOptionValue for bool {
	fn from_option(value: &OptionValue) -> Option<Self> {
		value.as_bool()
	}

	fn option_type() -> OptionType {
		OptionType::Bool
	}
}

impl FromOptionValue for String {
	fn from_option(value: &OptionValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}

	fn option_type() -> OptionType {
		OptionType::String
	}
}

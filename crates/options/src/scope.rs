use core::fmt;

use vimopt_primitives::EditorId;

/// The scope a read or write is performed at.
///
/// | scope | command | writes |
/// |-------|---------|--------|
/// | `Global` | `:setglobal` | global value only |
/// | `Local(e)` | `:setlocal` | `e`'s buffer/window value (global value for global options) |
/// | `Effective(e)` | `:set` | global and local values, following Vim |
///
/// Reads at `Local(e)` and `Effective(e)` both return the value `e` observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionAccessScope {
	Global,
	Local(EditorId),
	Effective(EditorId),
}

impl OptionAccessScope {
	/// The editor this scope targets, if any.
	pub fn editor(self) -> Option<EditorId> {
		match self {
			OptionAccessScope::Global => None,
			OptionAccessScope::Local(editor) | OptionAccessScope::Effective(editor) => Some(editor),
		}
	}
}

impl fmt::Display for OptionAccessScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OptionAccessScope::Global => f.write_str("global"),
			OptionAccessScope::Local(editor) => write!(f, "local({editor})"),
			OptionAccessScope::Effective(editor) => write!(f, "effective({editor})"),
		}
	}
}

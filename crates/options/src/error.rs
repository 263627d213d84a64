use vimopt_primitives::EditorId;

use crate::value::OptionType;

/// Errors raised by the option engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
	#[error(
		"unknown option: {name}{}",
		.suggestion.as_deref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default()
	)]
	UnknownOption {
		name: String,
		suggestion: Option<String>,
	},

	/// A name or alias is already taken by a registered option.
	#[error("option name or alias already registered: {name}")]
	DuplicateOption { name: String },

	/// Local storage was read before `initialise_local_options` ran for the editor.
	#[error("local options for '{option}' not initialised for {editor}")]
	UninitializedOption { option: String, editor: EditorId },

	#[error("type mismatch for option '{option}': expected {expected}, got {got}")]
	TypeMismatch {
		option: String,
		expected: OptionType,
		got: &'static str,
	},

	#[error("invalid value for option '{option}': {reason}")]
	InvalidValue { option: String, reason: String },

	/// A global-only view was asked for an option that is not declared global.
	#[error("'{option}' is not a global option")]
	NotGlobal { option: String },
}

pub type Result<T, E = OptionError> = std::result::Result<T, E>;

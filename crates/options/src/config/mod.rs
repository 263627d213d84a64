//! Option defaults loaded from TOML.
//!
//! ```toml
//! [global]
//! tabstop = 4
//! expandtab = "yes"
//! listchars = ["tab:>-", "eol:$"]
//! ```
//!
//! Entries are applied at [`OptionAccessScope::Global`], so for local options
//! they set the value new editors start from.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::OptionGroup;
use crate::descriptor::OptionDescriptor;
use crate::error::OptionError;
use crate::parse;
use crate::registry::OptionRef;
use crate::scope::OptionAccessScope;
use crate::value::{OptionType, OptionValue};


/// Errors raised while loading option configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("unknown option: {key}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
	UnknownOption {
		key: String,
		suggestion: Option<String>,
	},

	/// The TOML value cannot represent the option's type.
	#[error("type mismatch for option '{option}': expected {expected}, got {got}")]
	OptionTypeMismatch {
		option: String,
		expected: &'static str,
		got: &'static str,
	},

	#[error(transparent)]
	Option(#[from] OptionError),
}

/// The `[global]` table of an options file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionsConfig {
	#[serde(default)]
	pub global: toml::Table,
}

impl OptionsConfig {
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&text)
	}

	/// Writes every entry into `group` and returns how many were applied.
	///
	/// All entries are resolved and converted first; nothing is written when
	/// any of them fails.
	pub fn apply(&self, group: &OptionGroup) -> Result<usize, ConfigError> {
		let mut resolved: Vec<(OptionRef, OptionValue)> = Vec::with_capacity(self.global.len());
		for (key, raw) in &self.global {
			let def = group.require_option(key).map_err(|err| match err {
				OptionError::UnknownOption { suggestion, .. } => ConfigError::UnknownOption {
					key: key.clone(),
					suggestion,
				},
				other => ConfigError::Option(other),
			})?;
			let value = convert(&def, key, raw)?;
			resolved.push((def, value));
		}

		for (def, value) in &resolved {
			group.set_option_value(def, OptionAccessScope::Global, value.clone())?;
		}
		debug!(domain = "options", count = resolved.len(), "option config applied");
		Ok(resolved.len())
	}
}

fn convert(def: &OptionDescriptor, key: &str, raw: &toml::Value) -> Result<OptionValue, ConfigError> {
	let mismatch = |got: &'static str| ConfigError::OptionTypeMismatch {
		option: key.to_string(),
		expected: def.value_type().name(),
		got,
	};

	let value = match (def.value_type(), raw) {
		(OptionType::Bool, toml::Value::Boolean(b)) => OptionValue::Bool(*b),
		(OptionType::Int, toml::Value::Integer(i)) => OptionValue::Int(*i),
		(_, toml::Value::String(s)) => parse::parse_value(def, s)?,
		(OptionType::List(style), toml::Value::Array(items)) => {
			let items = items
				.iter()
				.map(|item| item.as_str().ok_or_else(|| mismatch(item.type_str())))
				.collect::<Result<Vec<_>, _>>()?;
			OptionValue::List(style.join(&items))
		}
		(_, other) => return Err(mismatch(other.type_str())),
	};
	Ok(value)
}

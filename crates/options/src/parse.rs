//! Parsing option values from text.
//!
//! Shared by configuration loading and `:set`-style command handlers.

use crate::descriptor::OptionDescriptor;
use crate::error::{OptionError, Result};
use crate::value::{OptionType, OptionValue};

/// Parses `raw` into a value of the option's declared type.
pub fn parse_value(def: &OptionDescriptor, raw: &str) -> Result<OptionValue> {
	parse_value_for_type(raw, def.value_type()).map_err(|reason| OptionError::InvalidValue {
		option: def.name().to_string(),
		reason,
	})
}

/// Parses `raw` for a known type. List text is taken verbatim.
pub fn parse_value_for_type(raw: &str, ty: OptionType) -> std::result::Result<OptionValue, String> {
	match ty {
		OptionType::Bool => parse_bool(raw).map(OptionValue::Bool),
		OptionType::Int => parse_int(raw).map(OptionValue::Int),
		OptionType::String => Ok(OptionValue::String(raw.to_string())),
		OptionType::List(_) => Ok(OptionValue::List(raw.to_string())),
	}
}

/// Parses a boolean from common spellings.
pub fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
	match raw.to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!(
			"invalid boolean: '{raw}' (expected true/false, yes/no, on/off, 1/0)"
		)),
	}
}

/// Parses a decimal integer, accepting a leading sign.
pub fn parse_int(raw: &str) -> std::result::Result<i64, String> {
	raw.trim()
		.parse::<i64>()
		.map_err(|_| format!("invalid integer: '{raw}'"))
}

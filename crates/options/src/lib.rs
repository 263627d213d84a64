//! Vim-style option engine.
//!
//! Options are named, typed settings declared with one [`OptionScope`]:
//! global, local to a buffer or window, or global-local (an independent global
//! value plus a per-buffer or per-window override that may be unset).
//! [`OptionGroup`] owns the registry, the scoped values of every open editor,
//! change listeners, and a cache of parsed effective values.
//!
//! The engine never interprets an option. Catalogs register descriptors, hosts
//! hand out [`EditorHandle`]s, and command layers translate `:set`,
//! `:setlocal` and `:setglobal` into [`OptionAccessScope`]s.
//!
//! ```
//! use vimopt_options::{OptionAccessScope, OptionDescriptor, OptionGroup, OptionScope};
//! use vimopt_options::primitives::{BufferId, EditorHandle, EditorId, WindowId};
//!
//! let group = OptionGroup::new();
//! let tabstop = group
//! 	.add_option(OptionDescriptor::int("tabstop", OptionScope::LocalToBuffer, 8).with_alias("ts"))
//! 	.unwrap();
//!
//! let editor = EditorHandle::new(EditorId(1), BufferId(1), WindowId(1));
//! group.initialise_options();
//! group.initialise_local_options(editor, None, false);
//!
//! group.set_option_value(&tabstop, OptionAccessScope::Local(editor.editor), 4).unwrap();
//! assert_eq!(group.get_int(&tabstop, OptionAccessScope::Local(editor.editor)).unwrap(), 4);
//! assert_eq!(group.get_int(&tabstop, OptionAccessScope::Global).unwrap(), 8);
//! ```

pub mod access;
mod cache;
pub mod config;
mod descriptor;
mod error;
mod group;
pub mod list;
mod listeners;
pub mod parse;
mod registry;
mod scope;
mod store;
mod value;

pub use access::{EffectiveOptions, GlobalOptions, OptionAccess};
pub use config::{ConfigError, OptionsConfig};
pub use descriptor::{OptionDescriptor, OptionScope};
pub use error::{OptionError, Result};
pub use group::OptionGroup;
pub use list::ListStyle;
pub use listeners::{EffectiveListener, GlobalListener, ListenerId, ScopedListener};
pub use registry::{OptionRef, OptionRegistry};
pub use scope::OptionAccessScope;
pub use value::{FromOptionValue, OptionType, OptionValue};
pub use vimopt_primitives as primitives;
pub use vimopt_primitives::{EditorHandle, EditorId};

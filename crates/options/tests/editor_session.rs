//! Drives the engine the way a host editor does: a descriptor catalog, a
//! minimal `:set` command layer, config loading and split windows.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use vimopt_options::primitives::{BufferId, EditorHandle, EditorId};
use vimopt_options::{
	ListStyle, OptionAccess, OptionAccessScope, OptionDescriptor, OptionGroup, OptionScope, OptionType, OptionValue,
	OptionsConfig, Result, parse,
};

fn catalog(group: &OptionGroup) {
	let defs = [
		OptionDescriptor::string("fileformat", OptionScope::LocalToBuffer, "unix").with_alias("ff"),
		OptionDescriptor::int("tabstop", OptionScope::LocalToBuffer, 8).with_alias("ts"),
		OptionDescriptor::bool("list", OptionScope::LocalToWindow, false),
		OptionDescriptor::list("listchars", OptionScope::GlobalOrLocalToWindow, ListStyle::Comma, "eol:$")
			.with_alias("lcs"),
		OptionDescriptor::list("whichwrap", OptionScope::Global, ListStyle::Flags, "bs").with_alias("ww"),
		OptionDescriptor::int("undolevels", OptionScope::GlobalOrLocalToBuffer, 1000).with_alias("ul"),
	];
	for def in defs {
		group.add_option(def).unwrap();
	}
	group.initialise_options();
}

/// `name=value`, `name+=item`, `name-=item`, `name` and `noname`.
fn run_set(group: &OptionGroup, scope: OptionAccessScope, arg: &str) -> Result<()> {
	let (name, op, raw) = match arg.find(['+', '-', '^', '=']) {
		Some(i) if arg[i..].starts_with('=') => (&arg[..i], "=", &arg[i + 1..]),
		Some(i) => (&arg[..i], &arg[i..i + 2], &arg[i + 2..]),
		None => (arg, "", ""),
	};

	if op.is_empty() {
		let (name, on) = match group.get_option(name) {
			Some(_) => (name, true),
			None => (name.trim_start_matches("no"), false),
		};
		let def = group.require_option(name)?;
		return group.set_option_value(&def, scope, on);
	}

	let def = group.require_option(name)?;
	let value = match (op, def.value_type()) {
		("=", _) => parse::parse_value(&def, raw)?,
		(_, OptionType::List(style)) => {
			let current = group.get_option_value(&def, scope)?;
			let text = current.as_str().unwrap_or_default();
			OptionValue::List(match op {
				"+=" => style.append(text, raw),
				"^=" => style.prepend(text, raw),
				_ => style.remove(text, raw),
			})
		}
		(_, OptionType::Int) => {
			let current = group.get_int(&def, scope)?;
			let delta = parse::parse_int(raw).unwrap_or_default();
			OptionValue::Int(if op == "+=" { current + delta } else { current - delta })
		}
		_ => parse::parse_value(&def, raw)?,
	};
	group.set_option_value(&def, scope, value)
}

#[test]
fn command_layer_round_trip() {
	let _ = tracing_subscriber::fmt::try_init();
	let group = OptionGroup::new();
	catalog(&group);

	let buffer = BufferId::next();
	let first = EditorHandle::open(buffer);
	group.initialise_local_options(first, None, false);
	let e = first.editor;

	run_set(&group, OptionAccessScope::Effective(e), "ts=4").unwrap();
	run_set(&group, OptionAccessScope::Effective(e), "ts+=2").unwrap();
	run_set(&group, OptionAccessScope::Local(e), "list").unwrap();
	run_set(&group, OptionAccessScope::Local(e), "lcs+=tab:>-").unwrap();
	run_set(&group, OptionAccessScope::Effective(e), "ww+=hl").unwrap();
	run_set(&group, OptionAccessScope::Effective(e), "ww-=b").unwrap();

	let view = group.effective(e);
	assert_eq!(view.option::<i64>("ts").unwrap(), 6);
	assert_eq!(view.option::<bool>("list").unwrap(), true);
	assert_eq!(view.option::<String>("lcs").unwrap(), "eol:$,tab:>-");
	assert_eq!(group.global().option::<String>("ww").unwrap(), "shl");

	run_set(&group, OptionAccessScope::Local(e), "nolist").unwrap();
	assert_eq!(view.option::<bool>("list").unwrap(), false);

	assert!(run_set(&group, OptionAccessScope::Local(e), "ts=wide").is_err());
	assert!(run_set(&group, OptionAccessScope::Local(e), "tabstp=2").is_err());
}

#[test]
fn config_then_editors_then_splits() {
	let group = OptionGroup::new();
	catalog(&group);
	OptionsConfig::from_toml("[global]\nts = 2\nlist = true\nlcs = [\"tab:>-\", \"trail:-\"]\n")
		.unwrap()
		.apply(&group)
		.unwrap();

	let buffer = BufferId::next();
	let first = EditorHandle::open(buffer);
	group.initialise_local_options(first, None, false);

	let ts = group.get_option("ts").unwrap();
	let list = group.get_option("list").unwrap();
	let lcs = group.get_option("lcs").unwrap();
	assert_eq!(group.get_int(&ts, OptionAccessScope::Local(first.editor)).unwrap(), 2);
	assert_eq!(group.get_bool(&list, OptionAccessScope::Local(first.editor)).unwrap(), true);
	assert_eq!(
		group
			.get_string(&lcs, OptionAccessScope::Local(first.editor))
			.unwrap(),
		"tab:>-,trail:-"
	);

	group
		.set_option_value(&list, OptionAccessScope::Local(first.editor), false)
		.unwrap();
	let split = EditorHandle::open(buffer);
	group.initialise_local_options(split, Some(first.editor), true);
	let fresh = EditorHandle::open(buffer);
	group.initialise_local_options(fresh, Some(first.editor), false);

	assert_eq!(group.get_bool(&list, OptionAccessScope::Local(split.editor)).unwrap(), false);
	assert_eq!(group.get_bool(&list, OptionAccessScope::Local(fresh.editor)).unwrap(), true);

	group
		.set_option_value(&ts, OptionAccessScope::Local(split.editor), 3)
		.unwrap();
	assert_eq!(group.get_int(&ts, OptionAccessScope::Local(fresh.editor)).unwrap(), 3);
}

#[test]
fn renderer_reparses_only_on_change() {
	let group = OptionGroup::new();
	catalog(&group);

	let editor = EditorHandle::open(BufferId::next());
	group.initialise_local_options(editor, None, false);
	let other = EditorHandle::open(BufferId::next());
	group.initialise_local_options(other, None, false);

	let parses = Rc::new(RefCell::new(Vec::<EditorId>::new()));
	let render = |id: EditorId| {
		let parses = parses.clone();
		group
			.effective(id)
			.parsed("listchars", move |value| {
				parses.borrow_mut().push(id);
				value
					.list_items(ListStyle::Comma)
					.unwrap_or_default()
					.into_iter()
					.filter_map(|item| item.split_once(':'))
					.map(|(k, v)| (k.to_string(), v.to_string()))
					.collect::<Vec<_>>()
			})
			.unwrap()
	};

	assert_eq!(*render(editor.editor), vec![("eol".to_string(), "$".to_string())]);
	render(editor.editor);
	render(other.editor);
	assert_eq!(parses.borrow().len(), 2);

	let lcs = group.get_option("lcs").unwrap();
	group
		.set_option_value(&lcs, OptionAccessScope::Local(editor.editor), "tab:>-")
		.unwrap();
	assert_eq!(*render(editor.editor), vec![("tab".to_string(), ">-".to_string())]);
	render(other.editor);
	assert_eq!(*parses.borrow(), vec![editor.editor, other.editor, editor.editor]);

	group
		.set_option_value(&lcs, OptionAccessScope::Global, "trail:-")
		.unwrap();
	render(editor.editor);
	assert_eq!(*render(other.editor), vec![("trail".to_string(), "-".to_string())]);
	assert_eq!(parses.borrow().len(), 4);
}

#[test]
fn closing_editors_releases_shared_state_last() {
	let group = OptionGroup::new();
	catalog(&group);
	let ul = group.get_option("ul").unwrap();

	let buffer = BufferId::next();
	let a = EditorHandle::open(buffer);
	let b = EditorHandle::open(buffer);
	group.initialise_local_options(a, None, false);
	group.initialise_local_options(b, Some(a.editor), true);

	group
		.set_option_value(&ul, OptionAccessScope::Local(a.editor), 10)
		.unwrap();
	assert!(group.release_editor(a.editor));
	assert_eq!(group.get_int(&ul, OptionAccessScope::Local(b.editor)).unwrap(), 10);

	assert!(group.release_editor(b.editor));
	let reopened = EditorHandle::open(buffer);
	group.initialise_local_options(reopened, None, false);
	assert!(group.is_unset_value(&ul, reopened.editor).unwrap());
	assert_eq!(group.get_int(&ul, OptionAccessScope::Local(reopened.editor)).unwrap(), 1000);
	assert_eq!(group.editors(), vec![reopened]);
}

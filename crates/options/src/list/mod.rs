//! Item vocabulary for list-valued options.
//!
//! List options keep their raw Vim text (`"unnamed,unnamedplus"`, `"aoO"`) as
//! the stored [`OptionValue::List`](crate::OptionValue::List). [`ListStyle`]
//! interprets that text the way `:set+=`, `:set^=` and `:set-=` do.


/// How the items of a list option are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListStyle {
	/// Items separated by commas. Empty items are ignored.
	Comma,
	/// Every character is one flag.
	Flags,
}

impl ListStyle {
	/// Splits raw option text into items.
	pub fn split(self, raw: &str) -> Vec<&str> {
		match self {
			ListStyle::Comma => raw.split(',').filter(|item| !item.is_empty()).collect(),
			ListStyle::Flags => raw
				.char_indices()
				.map(|(i, c)| &raw[i..i + c.len_utf8()])
				.collect(),
		}
	}

	/// Joins items back into raw option text.
	pub fn join<S: AsRef<str>>(self, items: &[S]) -> String {
		let sep = match self {
			ListStyle::Comma => ",",
			ListStyle::Flags => "",
		};
		items
			.iter()
			.map(AsRef::as_ref)
			.filter(|item| !item.is_empty())
			.collect::<Vec<_>>()
			.join(sep)
	}

	/// Returns `true` if every item of `item` is present in `raw`.
	///
	/// An empty `item` is never contained.
	pub fn contains(self, raw: &str, item: &str) -> bool {
		let wanted = self.split(item);
		if wanted.is_empty() {
			return false;
		}
		let have = self.split(raw);
		wanted.iter().all(|w| have.contains(w))
	}

	/// Appends the items of `item` that are not yet present (`:set+=`).
	pub fn append(self, raw: &str, item: &str) -> String {
		let mut items = self.split(raw);
		for new in self.split(item) {
			if !items.contains(&new) {
				items.push(new);
			}
		}
		self.join(&items)
	}

	/// Prepends the items of `item` that are not yet present (`:set^=`).
	pub fn prepend(self, raw: &str, item: &str) -> String {
		let existing = self.split(raw);
		let mut items: Vec<&str> = Vec::new();
		for new in self.split(item) {
			if !existing.contains(&new) && !items.contains(&new) {
				items.push(new);
			}
		}
		items.extend(existing);
		self.join(&items)
	}

	/// Removes every item of `item` from `raw` (`:set-=`).
	pub fn remove(self, raw: &str, item: &str) -> String {
		let unwanted = self.split(item);
		let items: Vec<&str> = self
			.split(raw)
			.into_iter()
			.filter(|existing| !unwanted.contains(existing))
			.collect();
		self.join(&items)
	}
}

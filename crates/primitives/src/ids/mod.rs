use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};


macro_rules! define_id {
	($(#[$doc:meta])* $name:ident, $counter:ident, $prefix:literal) => {
		static $counter: AtomicU64 = AtomicU64::new(1);

		$(#[$doc])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(pub u64);

		impl $name {
			/// Generates a new process-unique ID.
			pub fn next() -> Self {
				Self($counter.fetch_add(1, Ordering::Relaxed))
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, concat!($prefix, "#{}"), self.0)
			}
		}
	};
}

define_id!(
	/// Identifies one open editor (a view onto a buffer inside a window).
	EditorId,
	NEXT_EDITOR_ID,
	"editor"
);

define_id!(
	/// Identifies a buffer-like unit: the document shared by every editor open on it.
	BufferId,
	NEXT_BUFFER_ID,
	"buffer"
);

define_id!(
	/// Identifies a window-like unit.
	WindowId,
	NEXT_WINDOW_ID,
	"window"
);

/// Binds an editor to the buffer and window it displays.
///
/// Editors sharing a [`BufferId`] share buffer-local option values, and
/// editors sharing a [`WindowId`] share window-local option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorHandle {
	pub editor: EditorId,
	pub buffer: BufferId,
	pub window: WindowId,
}

impl EditorHandle {
	pub const fn new(editor: EditorId, buffer: BufferId, window: WindowId) -> Self {
		Self {
			editor,
			buffer,
			window,
		}
	}

	/// Allocates fresh editor and window IDs for a new view onto `buffer`.
	pub fn open(buffer: BufferId) -> Self {
		Self::new(EditorId::next(), buffer, WindowId::next())
	}

	/// Returns `true` if both handles point at the same buffer.
	pub fn shares_buffer(&self, other: &EditorHandle) -> bool {
		self.buffer == other.buffer
	}

	/// Returns `true` if both handles point at the same window.
	pub fn shares_window(&self, other: &EditorHandle) -> bool {
		self.window == other.window
	}
}

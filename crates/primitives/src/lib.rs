//! Identity types shared between the option engine and its host editor.
//!
//! The option engine never owns editors, buffers or windows. It only keys its
//! storage by the handles defined here, which the host hands out and keeps
//! stable for as long as the underlying object is open.

/// Identifier types for editors, buffers and windows.
pub mod ids;

pub use ids::{BufferId, EditorHandle, EditorId, WindowId};

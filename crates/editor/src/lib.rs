//! Document sessions and the interactive loop.
//!
//! [`Editor`] owns every open [`DocumentSession`] and is driven from a single
//! thread: text mutations and caret moves come in through its methods, and
//! [`Editor::tick`] drains finished analyses, starts queued ones and fires
//! due deadlines. Background analysis never touches session state directly;
//! its results arrive over the executor's completion channel and are applied
//! by the reconciler inside `tick`.
//!
//! Collaborators (views, status bar, the text widget) are reached through the
//! [`EditorHost`] callbacks.

mod editor;
mod error;
mod host;
mod session;

pub use editor::{Editor, TickReport};
pub use error::{EditorError, Result};
pub use host::{EditorHost, Jump};
pub use session::DocumentSession;

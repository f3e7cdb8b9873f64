//! Text editing for entry bodies.
//!
//! [`TextBuffer`] is the editing state machine; [`session`] runs it against
//! an input source and renderer supplied by the front end.

pub mod buffer;
pub mod session;

pub use buffer::{TextBuffer, APPEND_MARKER};
pub use session::{run_editor, EditOutcome, EditorEvent, InputSource, NullRenderer, Renderer};

//! Event loop that drives a [`TextBuffer`] from an external input source.
//!
//! The core never touches the terminal: key events come in through
//! [`InputSource`] and the buffer is handed to a [`Renderer`] after every
//! event.

use super::buffer::TextBuffer;
use crate::error::Result;

/// One editing keystroke, already decoded by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Char(char),
    Newline,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Finish,
    Cancel,
}

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Editing confirmed; may hold a single empty line.
    Finished(Vec<String>),
    Cancelled,
}

pub trait InputSource {
    /// Block until the next event. `Ok(None)` means the input is exhausted.
    fn next_event(&mut self) -> Result<Option<EditorEvent>>;
}

pub trait Renderer {
    fn render(&mut self, buffer: &TextBuffer) -> Result<()>;
}

/// Renderer for non-interactive front ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _buffer: &TextBuffer) -> Result<()> {
        Ok(())
    }
}

/// Apply one non-terminal event to the buffer.
pub fn apply(buffer: &mut TextBuffer, event: EditorEvent) {
    match event {
        EditorEvent::Char(c) => buffer.insert_char(c),
        EditorEvent::Newline => buffer.newline(),
        EditorEvent::Backspace => buffer.backspace(),
        EditorEvent::Delete => buffer.delete_forward(),
        EditorEvent::Up => buffer.move_up(),
        EditorEvent::Down => buffer.move_down(),
        EditorEvent::Left => buffer.move_left(),
        EditorEvent::Right => buffer.move_right(),
        EditorEvent::Finish | EditorEvent::Cancel => {}
    }
}

/// Run an editing session until the user finishes or cancels.
///
/// Exhausted input counts as finishing.
pub fn run_editor<I, R>(mut buffer: TextBuffer, input: &mut I, renderer: &mut R) -> Result<EditOutcome>
where
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.render(&buffer)?;
    loop {
        match input.next_event()? {
            None | Some(EditorEvent::Finish) => return Ok(EditOutcome::Finished(buffer.finish())),
            Some(EditorEvent::Cancel) => return Ok(EditOutcome::Cancelled),
            Some(event) => {
                apply(&mut buffer, event);
                renderer.render(&buffer)?;
            }
        }
    }
}

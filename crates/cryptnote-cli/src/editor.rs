//! Front ends for the body editor.
//!
//! On a terminal, [`TerminalKeys`] reads crossterm key events in raw mode and
//! [`TerminalView`] redraws the buffer on the alternate screen of stderr.
//! Piped stdin goes through [`LineInput`], which types every line verbatim.

use std::collections::VecDeque;
use std::io::{self, BufRead, Lines, Stderr, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};

use cryptnote_core::editor::{EditorEvent, InputSource, Renderer};
use cryptnote_core::{CryptnoteError, Result, TextBuffer};

const STATUS_LINE: &str = "Ctrl+D or Ctrl+G to save, Esc to cancel";

/// Rows the status line takes from the top of the screen.
pub const STATUS_ROWS: u16 = 1;

/// Editor event for a terminal key press, if it has one.
pub fn map_key(key: KeyEvent) -> Option<EditorEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Char('d') | KeyCode::Char('g') if ctrl => EditorEvent::Finish,
        KeyCode::Char('c') if ctrl => EditorEvent::Cancel,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => EditorEvent::Char(c),
        KeyCode::Tab => EditorEvent::Char('\t'),
        KeyCode::Enter => EditorEvent::Newline,
        KeyCode::Backspace => EditorEvent::Backspace,
        KeyCode::Delete => EditorEvent::Delete,
        KeyCode::Up => EditorEvent::Up,
        KeyCode::Down => EditorEvent::Down,
        KeyCode::Left => EditorEvent::Left,
        KeyCode::Right => EditorEvent::Right,
        KeyCode::Esc => EditorEvent::Cancel,
        _ => return None,
    };
    Some(event)
}

/// Key presses from the controlling terminal. Needs raw mode, which
/// [`TerminalView`] holds.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl InputSource for TerminalKeys {
    fn next_event(&mut self) -> Result<Option<EditorEvent>> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = map_key(key) {
                    return Ok(Some(event));
                }
            }
        }
    }
}

/// Raw mode plus the alternate screen for as long as the value lives.
pub struct TerminalView {
    out: Stderr,
}

impl TerminalView {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stderr();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self { out })
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn screen_pos(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl Renderer for TerminalView {
    fn render(&mut self, buffer: &TextBuffer) -> Result<()> {
        let top = buffer.viewport_top();
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            Print(STATUS_LINE)
        )?;
        let visible = buffer
            .lines()
            .iter()
            .skip(top)
            .take(buffer.viewport_height());
        for (row, line) in visible.enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, screen_pos(row).saturating_add(STATUS_ROWS)),
                Print(line)
            )?;
        }
        let row = screen_pos(buffer.cursor_line() - top).saturating_add(STATUS_ROWS);
        queue!(
            self.out,
            cursor::MoveTo(screen_pos(buffer.cursor_column()), row)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Piped input: each line is typed as-is, with a newline between lines.
/// End of input finishes the session.
pub struct LineInput<R> {
    lines: Lines<R>,
    pending: VecDeque<EditorEvent>,
    started: bool,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: VecDeque::new(),
            started: false,
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn next_event(&mut self) -> Result<Option<EditorEvent>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            let line = match self.lines.next().transpose() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(None),
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    return Err(CryptnoteError::Validation(
                        "Input is not valid UTF-8".to_string(),
                    ))
                }
                Err(err) => return Err(err.into()),
            };
            if self.started {
                self.pending.push_back(EditorEvent::Newline);
            }
            self.started = true;
            self.pending
                .extend(line.trim_end_matches('\r').chars().map(EditorEvent::Char));
        }
    }
}

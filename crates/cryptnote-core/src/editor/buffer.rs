//! Cursor-addressed multi-line text buffer.
//!
//! Columns count `char`s, not bytes. The buffer always holds at least one
//! line, and after every transition the cursor sits inside the viewport.

/// Marker line inserted between existing content and appended text.
pub const APPEND_MARKER: &str = "--- APPENDED CONTENT ---";

const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor_line: usize,
    cursor_column: usize,
    viewport_top: usize,
    viewport_height: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// A buffer holding one empty line.
    pub fn new() -> Self {
        Self::with_lines(Vec::new())
    }

    /// A buffer seeded with `lines`, cursor at the start.
    pub fn with_lines(lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        Self {
            lines,
            cursor_line: 0,
            cursor_column: 0,
            viewport_top: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    /// A buffer for appending to `existing`: the old lines, a blank line, the
    /// append marker and a blank line, with the cursor at the very end.
    pub fn for_append(existing: Vec<String>) -> Self {
        let mut lines = existing;
        lines.extend([String::new(), APPEND_MARKER.to_string(), String::new()]);
        let mut buffer = Self::with_lines(lines);
        buffer.cursor_line = buffer.lines.len() - 1;
        buffer.cursor_column = buffer.current_len();
        buffer.scroll_to_cursor();
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn cursor_column(&self) -> usize {
        self.cursor_column
    }

    pub fn viewport_top(&self) -> usize {
        self.viewport_top
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Resize the visible window. A height of zero is treated as one line.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.scroll_to_cursor();
    }

    /// Insert `c` at the cursor. `'\n'` splits the line.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let at = self.byte_offset(self.cursor_column);
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_column += 1;
    }

    /// Split the current line at the cursor; the tail starts the next line.
    pub fn newline(&mut self) {
        let at = self.byte_offset(self.cursor_column);
        let tail = self.lines[self.cursor_line].split_off(at);
        self.lines.insert(self.cursor_line + 1, tail);
        self.cursor_line += 1;
        self.cursor_column = 0;
        self.scroll_to_cursor();
    }

    /// Delete before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self) {
        if self.cursor_column > 0 {
            let at = self.byte_offset(self.cursor_column - 1);
            self.lines[self.cursor_line].remove(at);
            self.cursor_column -= 1;
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_column = self.current_len();
            self.lines[self.cursor_line].push_str(&current);
            self.scroll_to_cursor();
        }
    }

    /// Delete under the cursor, pulling up the next line at end of line.
    pub fn delete_forward(&mut self) {
        if self.cursor_column < self.current_len() {
            let at = self.byte_offset(self.cursor_column);
            self.lines[self.cursor_line].remove(at);
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_column();
            self.scroll_to_cursor();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.clamp_column();
            self.scroll_to_cursor();
        }
    }

    /// Move left, wrapping to the end of the previous line.
    pub fn move_left(&mut self) {
        if self.cursor_column > 0 {
            self.cursor_column -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_column = self.current_len();
            self.scroll_to_cursor();
        }
    }

    /// Move right, wrapping to the start of the next line.
    pub fn move_right(&mut self) {
        if self.cursor_column < self.current_len() {
            self.cursor_column += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_column = 0;
            self.scroll_to_cursor();
        }
    }

    /// End editing and hand back the lines.
    pub fn finish(self) -> Vec<String> {
        self.lines
    }

    fn current_len(&self) -> usize {
        self.lines[self.cursor_line].chars().count()
    }

    fn clamp_column(&mut self) {
        self.cursor_column = self.cursor_column.min(self.current_len());
    }

    fn byte_offset(&self, column: usize) -> usize {
        let line = &self.lines[self.cursor_line];
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(offset, _)| offset)
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor_line < self.viewport_top {
            self.viewport_top = self.cursor_line;
        } else if self.cursor_line >= self.viewport_top + self.viewport_height {
            self.viewport_top = self.cursor_line + 1 - self.viewport_height;
        }
    }
}

//! Input echo, line commit, and command history
//!
//! Two modes, set by the interpreter collaborator:
//! - Character mode: every keystroke is forwarded immediately, nothing is
//!   buffered or echoed, and history is untouched.
//! - Line mode: keystrokes build an editable buffer that the panel echoes as
//!   the virtual trailing run of the current line. A line terminator commits
//!   the buffer: it becomes real document text, lands in history, and is
//!   forwarded whole.
//!
//! The history ring holds the last 100 committed lines; recall replaces the
//! live buffer without mutating history. A symbol key toggles a flag that
//! suppresses recall navigation while set (the host uses those keys for
//! symbol entry); the back key clears it.

use log::debug;
use std::collections::VecDeque;

const COMMAND_HISTORY_MAX_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Line,
    Character,
}

/// Bounded ring of committed input lines plus a recall cursor.
#[derive(Debug, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        CommandHistory::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Record a committed line, evicting the oldest entries past capacity,
    /// and park the cursor one past the newest entry.
    pub fn push(&mut self, line: String) {
        self.entries.push_back(line);
        while self.entries.len() > COMMAND_HISTORY_MAX_SIZE {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Step the cursor toward older entries (floor: the oldest).
    pub fn older(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step the cursor toward newer entries (ceiling: the newest).
    pub fn newer(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

/// What the panel should do with a processed keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Character mode: hand the character straight to the interpreter.
    Forward(char),
    /// Line mode: the committed line to append, record, and forward.
    Commit(String),
    /// Line mode: the echo buffer changed; re-wrap and redraw the current line.
    Echo,
    /// Nothing to do.
    Ignored,
}

#[derive(Debug)]
pub struct InputController {
    mode: InputMode,
    buffer: String,
    history: CommandHistory,
    symbol_pressed: bool,
}

impl InputController {
    pub fn new() -> Self {
        InputController {
            mode: InputMode::Line,
            buffer: String::new(),
            history: CommandHistory::new(),
            symbol_pressed: false,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        debug!("input: mode -> {:?}", mode);
        self.mode = mode;
    }

    /// The uncommitted buffer, echoed as the current line's virtual run.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Process a typed character. Terminators never reach the buffer; the
    /// committed text is handed back with the terminator already stripped.
    /// Empty lines still commit.
    pub fn type_char(&mut self, ch: char) -> InputAction {
        match self.mode {
            InputMode::Character => {
                self.buffer.clear();
                InputAction::Forward(ch)
            }
            InputMode::Line => {
                if ch == '\n' || ch == '\r' {
                    let line = std::mem::take(&mut self.buffer);
                    debug!("input: commit {:?}", line);
                    self.history.push(line.clone());
                    InputAction::Commit(line)
                } else {
                    self.buffer.push(ch);
                    InputAction::Echo
                }
            }
        }
    }

    /// Delete the last buffered character (line mode only).
    pub fn backspace(&mut self) -> InputAction {
        if self.mode == InputMode::Line && self.buffer.pop().is_some() {
            InputAction::Echo
        } else {
            InputAction::Ignored
        }
    }

    /// Recall the previous history entry into the buffer.
    pub fn history_older(&mut self) -> InputAction {
        if self.symbol_pressed || self.mode != InputMode::Line {
            return InputAction::Ignored;
        }
        match self.history.older() {
            Some(entry) => {
                self.buffer = entry.to_string();
                InputAction::Echo
            }
            None => InputAction::Ignored,
        }
    }

    /// Recall the next history entry into the buffer.
    pub fn history_newer(&mut self) -> InputAction {
        if self.symbol_pressed || self.mode != InputMode::Line {
            return InputAction::Ignored;
        }
        match self.history.newer() {
            Some(entry) => {
                self.buffer = entry.to_string();
                InputAction::Echo
            }
            None => InputAction::Ignored,
        }
    }

    /// The symbol key toggles suppression of history navigation.
    pub fn symbol_key(&mut self) {
        self.symbol_pressed = !self.symbol_pressed;
    }

    /// The back key cancels symbol entry.
    pub fn back_key(&mut self) {
        self.symbol_pressed = false;
    }

    /// Drop the buffer and the whole history (viewport re-initialization).
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.symbol_pressed = false;
    }
}

impl Default for InputController {
    fn default() -> Self {
        InputController::new()
    }
}

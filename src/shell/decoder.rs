//! Input decoder for terminal character sequences.
//!
//! Turns raw terminal characters into line editing events: ANSI arrow key
//! sequences, the VTY control keys and the `?` help key.
//!
//! This is a pure decoder - it doesn't manage buffers or I/O.

/// Decoder state for escape sequence handling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputState {
    /// Normal input mode
    Normal,

    /// Saw first ESC character
    EscapeStart,

    /// Saw ESC [ (start of escape sequence)
    EscapeSequence,
}

/// Logical input event from terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// No event (accumulating sequence)
    None,

    /// Regular character typed
    Char(char),

    /// Backspace key (ASCII BS or DEL)
    Backspace,

    /// Enter key (CR, LF or CR LF)
    Enter,

    /// Tab key
    Tab,

    /// `?`
    Help,

    /// Up arrow key (history previous)
    UpArrow,

    /// Down arrow key (history next)
    DownArrow,

    /// Double ESC pressed
    DoubleEsc,

    /// Ctrl-C
    Interrupt,

    /// Ctrl-Z
    Suspend,

    /// Ctrl-D
    EndOfInput,

    /// Ctrl-U
    KillLine,
}

/// Terminal input decoder with escape sequence handling.
#[derive(Debug)]
pub struct InputDecoder {
    /// Current decoder state
    state: InputState,

    /// Previous character was CR; a following LF is swallowed
    after_cr: bool,
}

impl InputDecoder {
    /// Create new decoder in Normal state.
    pub fn new() -> Self {
        Self {
            state: InputState::Normal,
            after_cr: false,
        }
    }

    /// Decode single character into input event.
    ///
    /// # Arguments
    ///
    /// * `c` - Character to decode
    ///
    /// # Returns
    ///
    /// Event indicating what input occurred
    ///
    /// # Examples
    ///
    /// ```
    /// use nut_vty::shell::decoder::{InputDecoder, InputEvent};
    ///
    /// let mut decoder = InputDecoder::new();
    /// assert_eq!(decoder.decode_char('s'), InputEvent::Char('s'));
    /// assert_eq!(decoder.decode_char('?'), InputEvent::Help);
    /// assert_eq!(decoder.decode_char('\x1a'), InputEvent::Suspend);
    ///
    /// // Telnet line ending
    /// assert_eq!(decoder.decode_char('\r'), InputEvent::Enter);
    /// assert_eq!(decoder.decode_char('\n'), InputEvent::None);
    /// ```
    pub fn decode_char(&mut self, c: char) -> InputEvent {
        let after_cr = core::mem::replace(&mut self.after_cr, false);
        match self.state {
            InputState::Normal => self.decode_normal(c, after_cr),
            InputState::EscapeStart => self.decode_escape_start(c),
            InputState::EscapeSequence => self.decode_escape_sequence(c),
        }
    }

    /// Decode character in Normal state.
    fn decode_normal(&mut self, c: char, after_cr: bool) -> InputEvent {
        match c {
            '\x1b' => {
                self.state = InputState::EscapeStart;
                InputEvent::None
            }

            '\r' => {
                self.after_cr = true;
                InputEvent::Enter
            }
            '\n' if after_cr => InputEvent::None,
            '\n' => InputEvent::Enter,
            // Telnet sends CR NUL for a bare return
            '\0' => InputEvent::None,

            '\t' => InputEvent::Tab,
            '?' => InputEvent::Help,
            '\x08' | '\x7f' => InputEvent::Backspace,

            '\x03' => InputEvent::Interrupt,
            '\x04' => InputEvent::EndOfInput,
            '\x15' => InputEvent::KillLine,
            '\x1a' => InputEvent::Suspend,

            c if c.is_control() => InputEvent::None,

            _ => InputEvent::Char(c),
        }
    }

    /// Decode character after seeing ESC.
    fn decode_escape_start(&mut self, c: char) -> InputEvent {
        match c {
            '\x1b' => {
                self.state = InputState::Normal;
                InputEvent::DoubleEsc
            }

            '[' => {
                self.state = InputState::EscapeSequence;
                InputEvent::None
            }

            // ESC followed by anything else: keep the character
            _ => {
                self.state = InputState::Normal;
                InputEvent::Char(c)
            }
        }
    }

    /// Decode character in escape sequence (after ESC [).
    fn decode_escape_sequence(&mut self, c: char) -> InputEvent {
        self.state = InputState::Normal;

        match c {
            'A' => InputEvent::UpArrow,
            'B' => InputEvent::DownArrow,
            _ => InputEvent::None,
        }
    }

    /// Reset decoder state to Normal.
    pub fn reset(&mut self) {
        self.state = InputState::Normal;
        self.after_cr = false;
    }

    /// Get current decoder state (for testing/debugging).
    #[cfg(test)]
    pub fn state(&self) -> InputState {
        self.state
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

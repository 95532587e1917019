//! Interpreter sessions and the interactive shell.
//!
//! [`Interpreter`] runs command lines against a [`Registry`](crate::tree::Registry)
//! on behalf of a [`Session`]. [`Shell`] puts a terminal in front of it:
//! character-at-a-time input, echo, line editing, history, password prompts,
//! Tab completion and `?` help.

use core::fmt;

use log::{debug, info};

use crate::config::{DefaultConfig, ShellConfig, VTY_BUFSIZ, VTY_MAXHIST};
use crate::error::{CliError, CmdError};
use crate::io::CharIo;
use crate::tree::NodeId;

// Sub-modules
pub mod builtins;
pub mod decoder;
pub mod handlers;
pub mod history;
pub mod interpreter;
pub mod persist;
pub mod replay;
pub mod session;

// Re-export key types
pub use decoder::{InputDecoder, InputEvent};
pub use handlers::{CommandHandlers, NoHandlers};
pub use history::CommandHistory;
pub use interpreter::Interpreter;
pub use session::{NodeContext, ParentFrame, Session, SessionStatus};

/// Terminal bell, sent when input is refused.
const BELL: char = '\x07';

/// Shell lifecycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CliState {
    /// Not started, or deactivated; input is ignored
    Inactive,

    /// Reading lines
    Active,

    /// The session ended; the transport should hang up
    Closed,
}

/// Interactive VTY shell.
///
/// Owns one [`Interpreter`] and the [`Session`] it drives, and talks to the
/// terminal through a [`CharIo`].
///
/// Generic over:
/// - `'r`: Lifetime of the command registry (typically 'static)
/// - `IO`: CharIo implementation
/// - `H`: CommandHandlers implementation
/// - `C`: ShellConfig implementation
pub struct Shell<'r, IO, H, C = DefaultConfig>
where
    IO: CharIo,
    H: CommandHandlers,
    C: ShellConfig,
{
    /// Command interpreter
    interpreter: Interpreter<'r, H, C>,

    /// Session being driven
    session: Session,

    /// Lifecycle state
    state: CliState,

    /// Line being edited; `C::MAX_INPUT` bounds it at runtime
    input_buffer: heapless::String<VTY_BUFSIZ>,

    /// Input decoder (escape sequence state machine)
    decoder: InputDecoder,

    /// Command history; `C::HISTORY_SIZE` bounds it at runtime
    #[cfg_attr(not(feature = "history"), allow(dead_code))]
    history: CommandHistory<VTY_MAXHIST, VTY_BUFSIZ>,

    /// I/O interface
    io: IO,
}

// ============================================================================
// Debug implementation
// ============================================================================

impl<IO, H, C> fmt::Debug for Shell<'_, IO, H, C>
where
    IO: CharIo,
    H: CommandHandlers,
    C: ShellConfig,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("input_buffer", &self.input_buffer.as_str())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Core methods
// ============================================================================

impl<'r, IO, H, C> Shell<'r, IO, H, C>
where
    IO: CharIo,
    H: CommandHandlers,
    C: ShellConfig,
{
    /// Create new Shell.
    ///
    /// Starts in `Inactive` state. Call `activate()` to show the banner and
    /// the first prompt.
    pub fn new(interpreter: Interpreter<'r, H, C>, io: IO) -> Self {
        Self {
            interpreter,
            session: Session::new(NodeId::VIEW),
            state: CliState::Inactive,
            input_buffer: heapless::String::new(),
            decoder: InputDecoder::new(),
            history: CommandHistory::with_limit(C::HISTORY_SIZE),
            io,
        }
    }

    /// Start a session: print the message of the day and the first prompt.
    ///
    /// The session starts at the login prompt when a login password is
    /// configured, otherwise in view mode.
    pub fn activate(&mut self) -> Result<(), IO::Error> {
        let host = self.interpreter.host();
        let start = if host.requires_login() {
            NodeId::AUTH
        } else {
            NodeId::VIEW
        };

        self.session = Session::new(start);
        self.session.set_lines(host.lines);
        self.input_buffer.clear();
        self.decoder.reset();
        self.history.reset_position();
        self.state = CliState::Active;
        debug!("session started at node {}", start);

        if let Some(motd) = host.motd_text() {
            self.io.write_text(&motd)?;
            if !motd.ends_with('\n') {
                self.io.write_str("\r\n")?;
            }
        }
        self.write_prompt()
    }

    /// Deactivate the shell (transition to Inactive state).
    ///
    /// Input is ignored until `activate()` starts a fresh session.
    pub fn deactivate(&mut self) {
        self.state = CliState::Inactive;
        self.input_buffer.clear();
        self.decoder.reset();
    }

    /// Process a single character of input.
    ///
    /// Main entry point for character-by-character processing.
    /// Returns Ok(()) on success, Err on I/O error.
    pub fn process_char(&mut self, c: char) -> Result<(), IO::Error> {
        if self.state != CliState::Active {
            return Ok(());
        }

        match self.decoder.decode_char(c) {
            InputEvent::None => Ok(()), // Still accumulating sequence

            InputEvent::Char(ch) => self.handle_char(ch),

            InputEvent::Backspace => {
                if self.input_buffer.pop().is_some() && !self.at_password_prompt() {
                    self.io.write_str("\x08 \x08")?;
                }
                Ok(())
            }

            InputEvent::DoubleEsc | InputEvent::KillLine => {
                self.input_buffer.clear();
                self.clear_line_and_redraw()
            }

            InputEvent::Enter => self.handle_enter(),

            InputEvent::Tab => self.handle_tab(),

            InputEvent::Help => self.handle_help(),

            InputEvent::UpArrow => self.handle_history_previous(),

            InputEvent::DownArrow => self.handle_history_next(),

            InputEvent::Interrupt => {
                self.input_buffer.clear();
                self.history.reset_position();
                self.io.write_str("\r\n")?;
                self.write_prompt()
            }

            InputEvent::Suspend => self.handle_suspend(),

            InputEvent::EndOfInput => self.handle_end_of_input(),
        }
    }

    /// Poll for incoming characters and process them.
    ///
    /// Convenience for simple blocking transports. Event-driven transports
    /// read on their own and feed [`process_char()`](Self::process_char).
    ///
    /// # Returns
    ///
    /// - `Ok(())` if no character available or character processed successfully
    /// - `Err` on I/O error
    pub fn poll(&mut self) -> Result<(), IO::Error> {
        if let Some(c) = self.io.get_char()? {
            self.process_char(c)?;
        }
        Ok(())
    }

    // ========================================
    // Accessors
    // ========================================

    /// Lifecycle state.
    pub fn state(&self) -> CliState {
        self.state
    }

    /// The session ended (`exit` at a root node, too many bad passwords or a
    /// fatal command error).
    pub fn is_closed(&self) -> bool {
        self.state == CliState::Closed
    }

    /// Session being driven.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Session being driven, mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The interpreter.
    pub fn interpreter(&self) -> &Interpreter<'r, H, C> {
        &self.interpreter
    }

    /// The interpreter, mutably.
    pub fn interpreter_mut(&mut self) -> &mut Interpreter<'r, H, C> {
        &mut self.interpreter
    }

    // ========================================
    // Line editing
    // ========================================

    /// Password prompts read a line without echo and without help keys.
    fn at_password_prompt(&self) -> bool {
        matches!(self.session.node(), NodeId::AUTH | NodeId::AUTH_ENABLE)
    }

    /// Append to the line buffer, refusing to grow beyond `C::MAX_INPUT`.
    fn insert(&mut self, s: &str) -> Result<(), CliError> {
        if self.input_buffer.len() + s.len() > C::MAX_INPUT {
            return Err(CliError::BufferFull);
        }
        self.input_buffer
            .push_str(s)
            .map_err(|_| CliError::BufferFull)
    }

    fn handle_char(&mut self, ch: char) -> Result<(), IO::Error> {
        let mut utf8 = [0u8; 4];
        match self.insert(ch.encode_utf8(&mut utf8)) {
            Ok(()) if self.at_password_prompt() => Ok(()),
            Ok(()) => self.io.put_char(ch),
            Err(_) => self.io.put_char(BELL),
        }
    }

    /// Write the prompt for the current node.
    fn write_prompt(&mut self) -> Result<(), IO::Error> {
        let prompt = self.interpreter.prompt(&self.session);
        self.io.write_str(&prompt)
    }

    /// Prompt plus the line typed so far, after help output.
    fn write_prompt_and_line(&mut self) -> Result<(), IO::Error> {
        self.write_prompt()?;
        if !self.at_password_prompt() {
            self.io.write_str(self.input_buffer.as_str())?;
        }
        Ok(())
    }

    /// Clear current line and redraw with prompt and buffer.
    fn clear_line_and_redraw(&mut self) -> Result<(), IO::Error> {
        self.io.write_str("\r\x1b[K")?; // CR + clear to end of line
        self.write_prompt_and_line()
    }

    // ========================================
    // Line execution
    // ========================================

    /// Handle Enter key (run the line or check a password).
    fn handle_enter(&mut self) -> Result<(), IO::Error> {
        let input = core::mem::take(&mut self.input_buffer);
        self.io.write_str("\r\n")?;

        if self.at_password_prompt() {
            self.handle_password(input.as_str())?;
        } else {
            self.handle_input_line(input.as_str())?;
        }

        if self.session.is_closing() {
            info!("session closed");
            self.state = CliState::Closed;
            return Ok(());
        }
        self.write_prompt()
    }

    /// Check a line typed at the login or enable password prompt.
    fn handle_password(&mut self, input: &str) -> Result<(), IO::Error> {
        let node = self.session.node();
        let host = self.interpreter.host();
        let accepted = if node == NodeId::AUTH {
            host.check_password(input)
        } else {
            host.check_enable(input)
        };

        if accepted {
            self.session.reset_auth_failures();
            self.session.set_node(if node == NodeId::AUTH {
                NodeId::VIEW
            } else {
                NodeId::ENABLE
            });
            return Ok(());
        }

        let failures = self.session.record_auth_failure();
        debug!("bad password at node {} ({} failures)", node, failures);
        if failures < C::MAX_AUTH_FAILURES {
            return Ok(());
        }

        if node == NodeId::AUTH {
            info!("too many failed logins");
            self.io.write_str("% Bad passwords, too many failures!\r\n")?;
            self.session.close();
        } else {
            self.io.write_str("% Bad enable passwords, too many failures!\r\n")?;
            self.session.reset_auth_failures();
            self.session.set_node(NodeId::VIEW);
        }
        Ok(())
    }

    /// Run a command line and print what it produced.
    fn handle_input_line(&mut self, input: &str) -> Result<(), IO::Error> {
        self.history.add(input);

        let result = self.interpreter.execute(&mut self.session, input);

        let output = self.session.take_output();
        self.io.write_text(&output)?;
        if !output.is_empty() && !output.ends_with('\n') {
            self.io.write_str("\r\n")?;
        }

        if let Err(e) = result
            && let Some(message) = command_error_message(&e)
        {
            self.io.write_str(message)?;
            self.io.write_str("\r\n")?;
        }
        Ok(())
    }

    /// Ctrl-Z: leave configuration for enable mode.
    fn handle_suspend(&mut self) -> Result<(), IO::Error> {
        if self.at_password_prompt() {
            return Ok(());
        }
        self.input_buffer.clear();
        self.history.reset_position();
        self.io.write_str("\r\n")?;
        self.interpreter.end(&mut self.session);
        self.write_prompt()
    }

    /// Ctrl-D: `exit` on an empty line, ignored otherwise.
    fn handle_end_of_input(&mut self) -> Result<(), IO::Error> {
        if !self.input_buffer.is_empty() {
            return Ok(());
        }
        self.io.write_str("\r\n")?;
        builtins::exit(&self.interpreter, &mut self.session);
        if self.session.is_closing() {
            info!("session closed");
            self.state = CliState::Closed;
            return Ok(());
        }
        self.write_prompt()
    }

    // ========================================
    // History
    // ========================================

    fn handle_history_previous(&mut self) -> Result<(), IO::Error> {
        if self.at_password_prompt() {
            return Ok(());
        }
        if let Some(entry) = self.history.previous_command() {
            self.input_buffer = entry;
            self.clear_line_and_redraw()?;
        }
        Ok(())
    }

    fn handle_history_next(&mut self) -> Result<(), IO::Error> {
        if self.at_password_prompt() || !self.history.is_navigating() {
            return Ok(());
        }
        match self.history.next_command() {
            Some(entry) => self.input_buffer = entry,
            None => self.input_buffer.clear(),
        }
        self.clear_line_and_redraw()
    }

    // ========================================
    // Completion and help
    // ========================================

    /// Handle Tab completion.
    fn handle_tab(&mut self) -> Result<(), IO::Error> {
        #[cfg(feature = "completion")]
        {
            if self.at_password_prompt() {
                return Ok(());
            }

            use crate::tree::Completion;

            let completion = self
                .interpreter
                .complete(&self.session, self.input_buffer.as_str());

            match completion {
                Ok(Completion::Full(word)) => {
                    let mut replacement = String::with_capacity(word.len() + 1);
                    replacement.push_str(word);
                    replacement.push(' ');
                    self.replace_word(&replacement)?;
                }
                Ok(Completion::Prefix(prefix)) => self.replace_word(prefix)?,
                Ok(Completion::List(matches)) => {
                    self.io.write_str("\r\n")?;
                    for (i, m) in matches.iter().enumerate() {
                        if i != 0 && i % 6 == 0 {
                            self.io.write_str("\r\n")?;
                        }
                        self.io.write_str(&format!("{m:<10} "))?;
                    }
                    self.io.write_str("\r\n")?;
                    self.write_prompt_and_line()?;
                }
                Err(CmdError::NothingToDo) => {
                    self.io.write_str("\r\n")?;
                    self.write_prompt_and_line()?;
                }
                Err(e) => {
                    self.io.write_str("\r\n")?;
                    self.io.write_str(match e {
                        CmdError::Ambiguous => "% Ambiguous command.",
                        _ => "% There is no matched command.",
                    })?;
                    self.io.write_str("\r\n")?;
                    self.write_prompt_and_line()?;
                }
            }
        }

        Ok(())
    }

    /// Replace the word under the cursor with `text`.
    #[cfg(feature = "completion")]
    fn replace_word(&mut self, text: &str) -> Result<(), IO::Error> {
        let buffer = self.input_buffer.as_str();
        let start = if buffer.ends_with(char::is_whitespace) {
            buffer.len()
        } else {
            buffer.rfind(char::is_whitespace).map_or(0, |i| i + 1)
        };

        let saved = self.input_buffer.clone();
        self.input_buffer.truncate(start);
        if self.insert(text).is_err() {
            self.input_buffer = saved;
            return self.io.put_char(BELL);
        }
        self.clear_line_and_redraw()
    }

    /// Handle `?`: describe what may follow, or insert it literally at
    /// password prompts and without the `completion` feature.
    fn handle_help(&mut self) -> Result<(), IO::Error> {
        #[cfg(feature = "completion")]
        {
            if !self.at_password_prompt() {
                return self.describe_line();
            }
        }
        self.handle_char('?')
    }

    /// Print `?` help for the line typed so far, then redraw it.
    #[cfg(feature = "completion")]
    fn describe_line(&mut self) -> Result<(), IO::Error> {
        let help = self
            .interpreter
            .describe(&self.session, self.input_buffer.as_str());

        self.io.write_str("\r\n")?;
        match help {
            Ok(items) => {
                let width = items.iter().map(|i| help_text(i.text()).len()).max().unwrap_or(0);
                for item in &items {
                    let text = help_text(item.text());
                    if text.is_empty() {
                        continue;
                    }
                    let doc = item.doc();
                    if doc.is_empty() {
                        self.io.write_str(&format!("  {text}\r\n"))?;
                    } else {
                        self.io.write_str(&format!("  {text:<width$}  {doc}\r\n"))?;
                    }
                }
            }
            Err(CmdError::Ambiguous) => self.io.write_str("% Ambiguous command.\r\n")?,
            Err(_) => self.io.write_str("% There is no matched command.\r\n")?,
        }
        self.write_prompt_and_line()
    }

    // ========================================
    // Test-only accessors
    // ========================================

    /// Get reference to I/O interface (test-only).
    ///
    /// Available in both unit tests and integration tests.
    #[doc(hidden)]
    pub fn __test_io(&self) -> &IO {
        &self.io
    }

    /// Get mutable reference to I/O interface (test-only).
    ///
    /// Available in both unit tests and integration tests.
    #[doc(hidden)]
    pub fn __test_io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Get reference to input buffer (test-only).
    ///
    /// Available in both unit tests and integration tests.
    #[doc(hidden)]
    pub fn __test_get_input_buffer(&self) -> &str {
        self.input_buffer.as_str()
    }
}

/// Vararg tokens are listed without their leading dot.
#[cfg(feature = "completion")]
fn help_text(text: &str) -> &str {
    text.strip_prefix('.').unwrap_or(text)
}

/// Terminal message for a failed command line.
///
/// `None` for failures that already reported themselves.
pub fn command_error_message(err: &CmdError) -> Option<&'static str> {
    match err {
        CmdError::NoMatch => Some("% Unknown command."),
        CmdError::Incomplete => Some("% Command incomplete."),
        CmdError::Ambiguous => Some("% Ambiguous command."),
        CmdError::ArgcExceeded => Some("% Too many arguments."),
        CmdError::InvalidIndent | CmdError::NothingToDo | CmdError::Fatal(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

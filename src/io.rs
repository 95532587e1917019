//! Character I/O abstraction for the interactive shell.
//!
//! The `CharIo` trait provides non-blocking character-level I/O that can sit
//! on top of a telnet socket, a serial console or stdio.

/// Transport-agnostic character I/O trait.
///
/// `put_char()` and `write_str()` MUST NOT block indefinitely; transports
/// buffer output and flush it after each `process_char()`.
pub trait CharIo {
    /// Transport-specific error type
    type Error;

    /// Non-blocking character read.
    ///
    /// Returns:
    /// - `Ok(Some(char))` if character available
    /// - `Ok(None)` if no character available (non-blocking)
    /// - `Err(Self::Error)` on I/O error
    fn get_char(&mut self) -> Result<Option<char>, Self::Error>;

    /// Write character to output buffer.
    fn put_char(&mut self, c: char) -> Result<(), Self::Error>;

    /// Write string to output buffer.
    ///
    /// Default implementation uses `put_char()` repeatedly.
    /// Override for more efficient bulk writes if needed.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for c in s.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }

    /// Write text produced by the interpreter, turning every `\n` into the
    /// terminal's `\r\n`.
    fn write_text(&mut self, s: &str) -> Result<(), Self::Error> {
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                self.write_str("\r\n")?;
            }
            self.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capture(String);

    impl CharIo for Capture {
        type Error = ();

        fn get_char(&mut self) -> Result<Option<char>, ()> {
            Ok(None)
        }

        fn put_char(&mut self, c: char) -> Result<(), ()> {
            self.0.push(c);
            Ok(())
        }
    }

    #[test]
    fn test_default_write_str() {
        let mut io = Capture(String::new());
        io.write_str("bsc> ").unwrap();
        assert_eq!(io.0, "bsc> ");
    }

    #[test]
    fn test_write_text_converts_newlines() {
        let mut io = Capture(String::new());
        io.write_text("a\nb\n").unwrap();
        assert_eq!(io.0, "a\r\nb\r\n");

        let mut io = Capture(String::new());
        io.write_text("no newline").unwrap();
        assert_eq!(io.0, "no newline");
    }
}

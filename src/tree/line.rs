//! Input line tokenizing.
//!
//! Splits a command line into words, borrowing from the input. Configuration
//! text additionally carries its leading indentation, which the replayer uses
//! to track node nesting.
//!
//! # Example
//!
//! ```
//! use nut_vty::tree::line::Line;
//!
//! let line = Line::parse_indented("  bts 0\n").unwrap();
//! assert_eq!(line.indent(), "  ");
//! assert_eq!(line.words(), &["bts", "0"]);
//! ```

use core::cmp::Ordering;

use crate::error::CmdError;

/// Tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    indent: &'a str,
    words: Vec<&'a str>,
}

impl<'a> Line<'a> {
    /// Split an interactive line.
    ///
    /// Leading whitespace is ignored. Comment lines (`!` or `#` first) and
    /// blank lines produce no words.
    pub fn parse(input: &'a str) -> Self {
        let body = input.trim_start();
        Self {
            indent: &input[..input.len() - body.len()],
            words: split_words(body),
        }
    }

    /// Split a configuration line, keeping its indentation.
    ///
    /// Indentation is made of spaces only. Line breaks inside the leading
    /// whitespace restart it (blank lines glued to the front).
    ///
    /// # Returns
    ///
    /// `Err(CmdError::InvalidIndent)` when the indentation contains a tab or
    /// any other whitespace character.
    pub fn parse_indented(input: &'a str) -> Result<Self, CmdError> {
        let mut start = 0;
        let mut end = 0;

        for (i, c) in input.char_indices() {
            match c {
                ' ' => end = i + 1,
                '\n' | '\r' => {
                    start = i + 1;
                    end = i + 1;
                }
                c if c.is_whitespace() => return Err(CmdError::InvalidIndent),
                _ => break,
            }
        }

        Ok(Self {
            indent: &input[start..end],
            words: split_words(&input[end..]),
        })
    }

    /// Leading indentation.
    pub fn indent(&self) -> &'a str {
        self.indent
    }

    /// Words in input order.
    pub fn words(&self) -> &[&'a str] {
        &self.words
    }

    /// No words (blank or comment line).
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// First word, if any.
    pub fn first(&self) -> Option<&'a str> {
        self.words.first().copied()
    }
}

fn split_words(body: &str) -> Vec<&str> {
    if body.starts_with(['!', '#']) {
        return Vec::new();
    }
    body.split_whitespace().collect()
}

/// Line being typed, as seen by `?` and Tab.
///
/// `current` is the word under the cursor. It is `None` when the line is
/// empty or ends in whitespace, meaning the user asks about the next word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialLine<'a> {
    /// Completed words before the cursor
    pub words: Vec<&'a str>,

    /// Word being typed
    pub current: Option<&'a str>,
}

impl<'a> PartialLine<'a> {
    /// Split the line typed so far.
    pub fn parse(input: &'a str) -> Self {
        let mut words: Vec<&str> = input.split_whitespace().collect();
        let at_boundary = input.is_empty() || input.ends_with(char::is_whitespace);
        let current = if at_boundary { None } else { words.pop() };
        Self { words, current }
    }

    /// Position of the word under the cursor.
    pub fn index(&self) -> usize {
        self.words.len()
    }

    /// Same line with the first word removed.
    pub fn shifted(&self) -> Self {
        match self.words.split_first() {
            Some((_, rest)) => Self {
                words: rest.to_vec(),
                current: self.current,
            },
            None => Self {
                words: Vec::new(),
                current: None,
            },
        }
    }

    /// First word of the line, typed or complete.
    pub fn first(&self) -> Option<&'a str> {
        self.words.first().copied().or(self.current)
    }
}

/// Compare two indentation strings.
///
/// The shorter one must be a prefix of the longer one.
///
/// # Returns
///
/// The length ordering of `a` against `b`, or `None` when they disagree on
/// their common prefix.
pub fn indent_cmp(a: &str, b: &str) -> Option<Ordering> {
    let common = a.len().min(b.len());
    if a.as_bytes()[..common] != b.as_bytes()[..common] {
        return None;
    }
    Some(a.len().cmp(&b.len()))
}

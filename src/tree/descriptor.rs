//! Descriptor compiler.
//!
//! Turns a pattern string plus its newline separated help text into the
//! per-position alternative sets the matcher walks.

use log::trace;

use super::token::{Token, TokenDesc};
use crate::error::RegistryError;

/// Compiled pattern.
///
/// Level `i` holds every token the user may type at input position `i`. Plain
/// patterns have one alternative per level; `(a|b|c)` groups contribute one
/// level with several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    levels: Vec<Vec<TokenDesc>>,
    mandatory: usize,
}

impl Descriptor {
    /// Compile `pattern`, attaching `doc` lines to tokens in order.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Command pattern such as `"show bts [<0-255>]"`
    /// * `doc` - One help line per token; missing lines leave the help empty
    ///
    /// # Returns
    ///
    /// The compiled descriptor, or [`RegistryError::MalformedPattern`] for an
    /// empty pattern, a `|` outside a group or a group left open.
    pub fn compile(pattern: &str, doc: &str) -> Result<Self, RegistryError> {
        let malformed = |reason| RegistryError::MalformedPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let s = pattern.as_bytes();
        let mut docs = DocLines::new(doc);
        let mut levels: Vec<Vec<TokenDesc>> = Vec::new();
        // 0: outside a group, 1: group just opened, >1: inside a group
        let mut multiple = 0usize;
        let mut i = 0;

        loop {
            skip_ws(s, &mut i);
            if s.get(i) == Some(&b'(') {
                multiple = 1;
                i += 1;
            }
            if s.get(i) == Some(&b')') {
                multiple = 0;
                i += 1;
            }
            if s.get(i) == Some(&b'|') {
                if multiple == 0 {
                    return Err(malformed("'|' outside of an alternation group"));
                }
                i += 1;
            }
            skip_ws(s, &mut i);
            if s.get(i) == Some(&b'(') {
                multiple = 1;
                i += 1;
            }

            if i >= s.len() {
                break;
            }

            let start = i;
            while i < s.len() && !s[i].is_ascii_whitespace() && s[i] != b')' && s[i] != b'|' {
                i += 1;
            }

            let desc = TokenDesc {
                token: Token::compile(&pattern[start..i]),
                doc: docs.next().unwrap_or_default().to_string(),
            };

            match (multiple, levels.last_mut()) {
                (0, _) | (1, _) | (_, None) => levels.push(vec![desc]),
                (_, Some(level)) => level.push(desc),
            }
            if multiple > 0 {
                multiple += 1;
            }
        }

        if multiple > 0 {
            return Err(malformed("unterminated alternation group"));
        }
        if levels.is_empty() {
            return Err(malformed("empty pattern"));
        }

        let mandatory = mandatory_len(&levels);
        trace!(
            "compiled '{}': {} levels, {} mandatory",
            pattern,
            levels.len(),
            mandatory
        );

        Ok(Self { levels, mandatory })
    }

    /// Per-position alternative sets.
    pub fn levels(&self) -> &[Vec<TokenDesc>] {
        &self.levels
    }

    /// Number of leading positions the user must fill.
    pub fn mandatory(&self) -> usize {
        self.mandatory
    }

    /// Order the final level's alternatives by token text.
    pub(crate) fn sort_last_level(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            level.sort_by(|a, b| a.text().cmp(b.text()));
        }
    }
}

/// Leading levels up to the first lone optional token.
///
/// A group always counts: one of its alternatives must be chosen.
fn mandatory_len(levels: &[Vec<TokenDesc>]) -> usize {
    levels
        .iter()
        .take_while(|level| !(level.len() == 1 && level[0].token.is_optional()))
        .count()
}

fn skip_ws(s: &[u8], i: &mut usize) {
    while *i < s.len() && s[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

/// Iterator over help lines, skipping blank space between them.
struct DocLines<'a> {
    rest: &'a str,
}

impl<'a> DocLines<'a> {
    fn new(doc: &'a str) -> Self {
        Self { rest: doc }
    }
}

impl<'a> Iterator for DocLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(['\r', '\n']).unwrap_or(trimmed.len());
        let (line, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(line)
    }
}

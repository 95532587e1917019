//! Compiled pattern tokens.
//!
//! Pattern markers are recognised once, when a command is installed, and
//! stored as a [`TokenKind`] tag. Matching dispatches on the tag instead of
//! re-inspecting the pattern text.

use log::warn;

/// Longest decimal bound accepted in a `<min-max>` range.
const DECIMAL_STRLEN_MAX: usize = 10;

/// Integer range bounds.
///
/// `<0-512>` is unsigned; a leading minus (`<-100-100>`) makes the range
/// signed, in which case the upper bound may be negative as well
/// (`<-10--5>`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Both bounds non-negative
    Unsigned {
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },

    /// Signed bounds
    Signed {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
}

impl RangeSpec {
    /// Parse `<min-max>` / `<-min-max>`.
    ///
    /// Returns `None` for anything that is not a well-formed range, which
    /// makes the token reject every input.
    pub fn parse(text: &str) -> Option<RangeSpec> {
        let body = text.strip_prefix('<')?;
        let (bounds, _) = body.split_once('>')?;

        if let Some(rest) = bounds.strip_prefix('-') {
            let (lo, hi) = rest.split_once('-')?;
            if lo.len() > DECIMAL_STRLEN_MAX || hi.len() > DECIMAL_STRLEN_MAX {
                return None;
            }
            let min = -lo.parse::<i64>().ok()?;
            let max = hi.parse::<i64>().ok()?;
            Some(RangeSpec::Signed { min, max })
        } else {
            let (lo, hi) = bounds.split_once('-')?;
            if lo.len() > DECIMAL_STRLEN_MAX || hi.len() > DECIMAL_STRLEN_MAX {
                return None;
            }
            let min = lo.parse::<u64>().ok()?;
            let max = hi.parse::<u64>().ok()?;
            Some(RangeSpec::Unsigned { min, max })
        }
    }

    /// Whether `word` parses completely as an integer inside the bounds.
    pub fn accepts(&self, word: &str) -> bool {
        match *self {
            RangeSpec::Unsigned { min, max } => word
                .parse::<u64>()
                .is_ok_and(|v| v >= min && v <= max),
            RangeSpec::Signed { min, max } => word
                .parse::<i64>()
                .is_ok_and(|v| v >= min && v <= max),
        }
    }
}

/// What a pattern token accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal keyword, matched exactly or by prefix
    Keyword,

    /// `<min-max>`; `None` when the bounds are malformed
    Range(Option<RangeSpec>),

    /// `A.B.C.D`
    Ipv4,

    /// `A.B.C.D/M`
    Ipv4Prefix,

    /// `X:X::X:X`
    Ipv6,

    /// `X:X::X:X/M`
    Ipv6Prefix,

    /// `UPPERCASE` free variable
    Variable,

    /// `.REST` swallowing the rest of the line
    Vararg,

    /// `[inner]`; `None` when the brackets enclose nothing
    Optional(Option<Box<Token>>),
}

/// One compiled token: its pattern text plus the recognised kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /// Compile one whitespace-free pattern word.
    pub fn compile(text: &str) -> Token {
        Self::compile_inner(text, true)
    }

    fn compile_inner(text: &str, allow_optional: bool) -> Token {
        let kind = if allow_optional && text.starts_with('[') {
            if text.len() < 3 {
                warn!("optional token '{}' has no content and never matches", text);
                TokenKind::Optional(None)
            } else {
                // Strips the first and last character, whatever the last one is.
                let inner = text
                    .char_indices()
                    .nth(1)
                    .zip(text.char_indices().last())
                    .map(|((start, _), (end, _))| &text[start..end])
                    .unwrap_or("");
                TokenKind::Optional(Some(Box::new(Self::compile_inner(inner, false))))
            }
        } else if text.starts_with('.') {
            TokenKind::Vararg
        } else if text.starts_with('<') {
            let spec = RangeSpec::parse(text);
            if spec.is_none() {
                warn!("range token '{}' is malformed and never matches", text);
            }
            TokenKind::Range(spec)
        } else if text == "X:X::X:X" {
            TokenKind::Ipv6
        } else if text == "X:X::X:X/M" {
            TokenKind::Ipv6Prefix
        } else if text == "A.B.C.D" {
            TokenKind::Ipv4
        } else if text == "A.B.C.D/M" {
            TokenKind::Ipv4Prefix
        } else if text.starts_with(|c: char| c.is_ascii_uppercase()) {
            TokenKind::Variable
        } else {
            TokenKind::Keyword
        };

        Token {
            text: text.to_string(),
            kind,
        }
    }

    /// Pattern text as written.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Recognised kind.
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Placeholder for a user supplied value.
    ///
    /// Typed placeholders (ranges and addresses) count as variables too: their
    /// value is passed to the handler and they never compete as keywords.
    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Variable
                | TokenKind::Range(_)
                | TokenKind::Ipv4
                | TokenKind::Ipv4Prefix
                | TokenKind::Ipv6
                | TokenKind::Ipv6Prefix
        )
    }

    /// `[...]` wrapper.
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, TokenKind::Optional(_))
    }

    /// `.REST` tail.
    pub fn is_vararg(&self) -> bool {
        matches!(self.kind, TokenKind::Vararg)
    }

    /// Token with one optional layer removed.
    ///
    /// Returns `None` for an empty optional, which then matches nothing.
    pub fn deopt(&self) -> Option<&Token> {
        match &self.kind {
            TokenKind::Optional(inner) => inner.as_deref(),
            _ => Some(self),
        }
    }
}

/// Token plus its human readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDesc {
    /// Compiled token
    pub token: Token,

    /// Help text (empty when the doc string ran out of lines)
    pub doc: String,
}

impl TokenDesc {
    /// Pattern text of the token.
    pub fn text(&self) -> &str {
        self.token.text()
    }
}

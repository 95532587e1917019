//! Token classifier.
//!
//! Grades how well one input word matches one compiled pattern token. Grades
//! form a total order and double as acceptance thresholds: callers pass the
//! weakest grade they are prepared to accept and get [`MatchGrade::NoMatch`]
//! for anything that falls short.
//!
//! The address walkers are format checks over partially typed input. They
//! answer `Partly` while the word can still grow into a valid literal, which
//! is what completion and `?` help need.

use std::net::Ipv6Addr;

use super::token::{Token, TokenKind};

/// Match strength, weakest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchGrade {
    /// Word does not fit the token
    NoMatch,
    /// Lenient threshold; never produced by [`classify`]
    Any,
    /// Free variable
    Extend,
    /// IPv4 prefix
    Ipv4Prefix,
    /// IPv4 address
    Ipv4,
    /// IPv6 prefix
    Ipv6Prefix,
    /// IPv6 address
    Ipv6,
    /// Integer range
    Range,
    /// Variadic tail
    Vararg,
    /// Word is a strict prefix of a keyword
    Partly,
    /// Word equals a keyword
    Exact,
}

const IPV6_ADDR_CHARS: &[u8] = b"0123456789abcdefABCDEF:.%";
const IPV6_PREFIX_CHARS: &[u8] = b"0123456789abcdefABCDEF:.%/";

/// Classify `word` against `token`.
///
/// `min` only gates precision: partial keyword matches and partial address
/// walks are rejected when `min` is stronger than what they achieved. Token
/// kinds themselves are never gated, so a free variable still matches at
/// [`MatchGrade::Extend`] under a strict threshold.
///
/// With `recurse` set an optional token is unwrapped once and its content
/// classified. Without it the bracketed text is compared like a keyword.
///
/// # Example
///
/// ```
/// use nut_vty::tree::{MatchGrade, Token, classify};
///
/// let token = Token::compile("<0-512>");
/// assert_eq!(classify(&token, "512", MatchGrade::Exact, true), MatchGrade::Range);
/// assert_eq!(classify(&token, "513", MatchGrade::Any, true), MatchGrade::NoMatch);
/// ```
pub fn classify(token: &Token, word: &str, min: MatchGrade, recurse: bool) -> MatchGrade {
    match token.kind() {
        TokenKind::Optional(inner) if recurse => match inner {
            Some(inner) => classify(inner, word, min, false),
            None => MatchGrade::NoMatch,
        },
        TokenKind::Optional(_) | TokenKind::Keyword => keyword(token.text(), word, min),
        TokenKind::Vararg => MatchGrade::Vararg,
        TokenKind::Range(spec) => {
            if spec.is_some_and(|spec| spec.accepts(word)) {
                MatchGrade::Range
            } else {
                MatchGrade::NoMatch
            }
        }
        TokenKind::Ipv6 => gate(ipv6_walk(word), min, MatchGrade::Ipv6),
        TokenKind::Ipv6Prefix => gate(ipv6_prefix_walk(word), min, MatchGrade::Ipv6Prefix),
        TokenKind::Ipv4 => gate(ipv4_walk(word), min, MatchGrade::Ipv4),
        TokenKind::Ipv4Prefix => gate(ipv4_prefix_walk(word), min, MatchGrade::Ipv4Prefix),
        TokenKind::Variable => MatchGrade::Extend,
    }
}

fn keyword(text: &str, word: &str, min: MatchGrade) -> MatchGrade {
    if !text.starts_with(word) {
        MatchGrade::NoMatch
    } else if text == word {
        MatchGrade::Exact
    } else if MatchGrade::Partly >= min {
        MatchGrade::Partly
    } else {
        MatchGrade::NoMatch
    }
}

fn gate(walk: MatchGrade, min: MatchGrade, grade: MatchGrade) -> MatchGrade {
    if walk >= min { grade } else { MatchGrade::NoMatch }
}

/// Decimal value of a short digit run (empty counts as zero).
fn octet(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'))
}

// ============================================================================
// IPv4
// ============================================================================

/// Walk an IPv4 address literal.
///
/// Returns `Exact` for four in-range octets, `Partly` for fewer (including the
/// empty word and a trailing dot) and `NoMatch` for anything else.
pub fn ipv4_walk(word: &str) -> MatchGrade {
    let s = word.as_bytes();
    let mut dots = 0;
    let mut nums = 0;
    let mut i = 0;

    loop {
        let sp = i;
        while i < s.len() {
            if s[i] == b'.' {
                if dots >= 3 {
                    return MatchGrade::NoMatch;
                }
                match s.get(i + 1) {
                    Some(b'.') => return MatchGrade::NoMatch,
                    None => return MatchGrade::Partly,
                    Some(_) => {}
                }
                dots += 1;
                break;
            }
            if !s[i].is_ascii_digit() {
                return MatchGrade::NoMatch;
            }
            i += 1;
        }

        if i - sp > 3 || octet(&s[sp..i]) > 255 {
            return MatchGrade::NoMatch;
        }
        nums += 1;

        if i == s.len() {
            break;
        }
        i += 1;
    }

    if nums < 4 {
        MatchGrade::Partly
    } else {
        MatchGrade::Exact
    }
}

/// Walk an IPv4 `A.B.C.D/M` prefix.
///
/// Anything short of a mask is `Partly`; the mask must be decimal and at most
/// 32.
pub fn ipv4_prefix_walk(word: &str) -> MatchGrade {
    let s = word.as_bytes();
    let mut dots = 0;
    let mut i = 0;

    loop {
        let sp = i;
        while i < s.len() && s[i] != b'/' {
            if s[i] == b'.' {
                if dots == 3 {
                    return MatchGrade::NoMatch;
                }
                match s.get(i + 1) {
                    Some(b'.') | Some(b'/') => return MatchGrade::NoMatch,
                    None => return MatchGrade::Partly,
                    Some(_) => {}
                }
                dots += 1;
                break;
            }
            if !s[i].is_ascii_digit() {
                return MatchGrade::NoMatch;
            }
            i += 1;
        }

        if i - sp > 3 || octet(&s[sp..i]) > 255 {
            return MatchGrade::NoMatch;
        }

        if dots == 3 && s.get(i) == Some(&b'/') {
            if i + 1 == s.len() {
                return MatchGrade::Partly;
            }
            i += 1;
            break;
        }

        if i == s.len() {
            return MatchGrade::Partly;
        }
        i += 1;
    }

    let mask = &s[i..];
    if !mask.iter().all(u8::is_ascii_digit) {
        return MatchGrade::NoMatch;
    }
    match word[i..].parse::<u32>() {
        Ok(m) if m <= 32 => MatchGrade::Exact,
        _ => MatchGrade::NoMatch,
    }
}

// ============================================================================
// IPv6
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Walk {
    Start,
    Colon,
    Double,
    Addr,
    Dot,
    Slash,
    Mask,
}

/// Walk an IPv6 address literal.
///
/// Words that parse as an address are `Exact`. Otherwise a colon/double-colon
/// walk rejects impossible shapes (two `::`, more than eight groups, groups
/// longer than four digits); whatever survives is accepted as `Exact` too.
pub fn ipv6_walk(word: &str) -> MatchGrade {
    if !word.bytes().all(|b| IPV6_ADDR_CHARS.contains(&b)) {
        return MatchGrade::NoMatch;
    }
    if word.parse::<Ipv6Addr>().is_ok() {
        return MatchGrade::Exact;
    }

    let s = word.as_bytes();
    let mut state = Walk::Start;
    let (mut colons, mut nums, mut doubles) = (0i32, 0, 0);
    let mut sp = 0;
    let mut i = 0;

    while i < s.len() {
        let next = s.get(i + 1).copied();
        match state {
            Walk::Start => {
                if s[i] == b':' {
                    if !matches!(next, Some(b':') | None) {
                        return MatchGrade::NoMatch;
                    }
                    colons -= 1;
                    state = Walk::Colon;
                } else {
                    sp = i;
                    state = Walk::Addr;
                }
                // re-examine this character in the new state
                continue;
            }
            Walk::Colon => {
                colons += 1;
                if next == Some(b':') {
                    state = Walk::Double;
                } else {
                    sp = i + 1;
                    state = Walk::Addr;
                }
            }
            Walk::Double => {
                if doubles > 0 || next == Some(b':') {
                    return MatchGrade::NoMatch;
                }
                if next.is_some() {
                    colons += 1;
                }
                sp = i + 1;
                state = Walk::Addr;
                doubles += 1;
                nums += 1;
            }
            Walk::Addr => {
                if matches!(next, Some(b':') | None) {
                    if i.saturating_sub(sp) > 3 {
                        return MatchGrade::NoMatch;
                    }
                    nums += 1;
                    state = Walk::Colon;
                }
                if next == Some(b'.') {
                    state = Walk::Dot;
                }
            }
            Walk::Dot => state = Walk::Addr,
            Walk::Slash | Walk::Mask => {}
        }

        if nums > 8 || colons > 7 {
            return MatchGrade::NoMatch;
        }
        i += 1;
    }

    MatchGrade::Exact
}

/// Walk an IPv6 `X:X::X:X/M` prefix.
///
/// Anything short of a mask is `Partly`; the mask must be decimal and at most
/// 128.
pub fn ipv6_prefix_walk(word: &str) -> MatchGrade {
    if !word.bytes().all(|b| IPV6_PREFIX_CHARS.contains(&b)) {
        return MatchGrade::NoMatch;
    }

    let s = word.as_bytes();
    let mut state = Walk::Start;
    let (mut colons, mut nums, mut doubles) = (0i32, 0, 0);
    let mut sp = 0;
    let mut i = 0;

    while i < s.len() && state != Walk::Mask {
        let next = s.get(i + 1).copied();
        match state {
            Walk::Start => {
                if s[i] == b':' {
                    if !matches!(next, Some(b':') | None) {
                        return MatchGrade::NoMatch;
                    }
                    colons -= 1;
                    state = Walk::Colon;
                } else {
                    sp = i;
                    state = Walk::Addr;
                }
                continue;
            }
            Walk::Colon => {
                colons += 1;
                match next {
                    Some(b'/') => return MatchGrade::NoMatch,
                    Some(b':') => state = Walk::Double,
                    _ => {
                        sp = i + 1;
                        state = Walk::Addr;
                    }
                }
            }
            Walk::Double => {
                if doubles > 0 || next == Some(b':') {
                    return MatchGrade::NoMatch;
                }
                if !matches!(next, None | Some(b'/')) {
                    colons += 1;
                }
                sp = i + 1;
                state = if next == Some(b'/') {
                    Walk::Slash
                } else {
                    Walk::Addr
                };
                doubles += 1;
                nums += 1;
            }
            Walk::Addr => {
                if matches!(next, Some(b':') | Some(b'.') | Some(b'/') | None) {
                    if i.saturating_sub(sp) > 3 {
                        return MatchGrade::NoMatch;
                    }
                    if s.get(sp..=i).is_some_and(|group| group.contains(&b'/')) {
                        return MatchGrade::NoMatch;
                    }
                    nums += 1;
                    match next {
                        Some(b':') => state = Walk::Colon,
                        Some(b'.') => state = Walk::Dot,
                        Some(b'/') => state = Walk::Slash,
                        _ => {}
                    }
                }
            }
            Walk::Dot => state = Walk::Addr,
            Walk::Slash => {
                if next.is_none() {
                    return MatchGrade::Partly;
                }
                state = Walk::Mask;
            }
            Walk::Mask => {}
        }

        if nums > 11 || colons > 7 {
            return MatchGrade::NoMatch;
        }
        i += 1;
    }

    if state < Walk::Mask {
        return MatchGrade::Partly;
    }

    let mask = &word[i..];
    if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
        return MatchGrade::NoMatch;
    }
    match mask.parse::<u32>() {
        Ok(m) if m <= 128 => MatchGrade::Exact,
        _ => MatchGrade::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grade(pattern: &str, word: &str, min: MatchGrade) -> MatchGrade {
        classify(&Token::compile(pattern), word, min, true)
    }

    #[test]
    fn test_grade_order() {
        assert!(MatchGrade::NoMatch < MatchGrade::Any);
        assert!(MatchGrade::Any < MatchGrade::Extend);
        assert!(MatchGrade::Extend < MatchGrade::Ipv4Prefix);
        assert!(MatchGrade::Ipv6 < MatchGrade::Range);
        assert!(MatchGrade::Range < MatchGrade::Vararg);
        assert!(MatchGrade::Vararg < MatchGrade::Partly);
        assert!(MatchGrade::Partly < MatchGrade::Exact);
    }

    #[test]
    fn test_keyword() {
        assert_eq!(grade("show", "show", MatchGrade::Exact), MatchGrade::Exact);
        assert_eq!(grade("show", "sh", MatchGrade::Any), MatchGrade::Partly);
        assert_eq!(grade("show", "sh", MatchGrade::Exact), MatchGrade::NoMatch);
        assert_eq!(grade("show", "shows", MatchGrade::Any), MatchGrade::NoMatch);
        assert_eq!(grade("show", "x", MatchGrade::Any), MatchGrade::NoMatch);
    }

    #[test]
    fn test_range() {
        for ok in ["0", "512", "17"] {
            assert_eq!(grade("<0-512>", ok, MatchGrade::Any), MatchGrade::Range, "{ok}");
        }
        for bad in ["513", "-1", "abc", "5a"] {
            assert_eq!(grade("<0-512>", bad, MatchGrade::Any), MatchGrade::NoMatch, "{bad}");
        }
        assert_eq!(grade("<-5-5>", "-5", MatchGrade::Any), MatchGrade::Range);
        assert_eq!(grade("<-5-5>", "-6", MatchGrade::Any), MatchGrade::NoMatch);
    }

    #[test]
    fn test_variable_and_vararg_ignore_threshold() {
        assert_eq!(grade("WORD", "anything", MatchGrade::Exact), MatchGrade::Extend);
        assert_eq!(grade(".LINE", "x", MatchGrade::Exact), MatchGrade::Vararg);
        assert_eq!(grade("<1-5>", "3", MatchGrade::Exact), MatchGrade::Range);
    }

    #[test]
    fn test_optional_is_unwrapped_once() {
        assert_eq!(grade("[detail]", "det", MatchGrade::Any), MatchGrade::Partly);
        assert_eq!(grade("[<1-9>]", "4", MatchGrade::Any), MatchGrade::Range);
        assert_eq!(grade("[]", "x", MatchGrade::Any), MatchGrade::NoMatch);

        let token = Token::compile("[detail]");
        assert_eq!(
            classify(&token, "[detail]", MatchGrade::Any, false),
            MatchGrade::Exact
        );
    }

    #[test]
    fn test_ipv4() {
        assert_eq!(ipv4_walk("10.0.0.1"), MatchGrade::Exact);
        assert_eq!(ipv4_walk("10.0.0"), MatchGrade::Partly);
        assert_eq!(ipv4_walk("10.0."), MatchGrade::Partly);
        assert_eq!(ipv4_walk(""), MatchGrade::Partly);
        assert_eq!(ipv4_walk("10.0.0.256"), MatchGrade::NoMatch);
        assert_eq!(ipv4_walk("10..0.1"), MatchGrade::NoMatch);
        assert_eq!(ipv4_walk("10.0.0.1.5"), MatchGrade::NoMatch);
        assert_eq!(ipv4_walk("1000.0.0.1"), MatchGrade::NoMatch);
        assert_eq!(ipv4_walk("a.b.c.d"), MatchGrade::NoMatch);

        assert_eq!(grade("A.B.C.D", "10.0.0.1", MatchGrade::Exact), MatchGrade::Ipv4);
        assert_eq!(grade("A.B.C.D", "10.0.0", MatchGrade::Any), MatchGrade::Ipv4);
        assert_eq!(grade("A.B.C.D", "10.0.0", MatchGrade::Exact), MatchGrade::NoMatch);
    }

    #[test]
    fn test_ipv4_prefix() {
        assert_eq!(ipv4_prefix_walk("10.0.0.1/24"), MatchGrade::Exact);
        assert_eq!(ipv4_prefix_walk("10.0.0.1/32"), MatchGrade::Exact);
        assert_eq!(ipv4_prefix_walk("10.0.0.1/33"), MatchGrade::NoMatch);
        assert_eq!(ipv4_prefix_walk("10.0.0.1/"), MatchGrade::Partly);
        assert_eq!(ipv4_prefix_walk("10.0.0.1"), MatchGrade::Partly);
        assert_eq!(ipv4_prefix_walk("10.0.0./8"), MatchGrade::NoMatch);
        assert_eq!(ipv4_prefix_walk("10.0.0.1/2x"), MatchGrade::NoMatch);

        assert_eq!(
            grade("A.B.C.D/M", "10.0.0.1/24", MatchGrade::Exact),
            MatchGrade::Ipv4Prefix
        );
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(ipv6_walk("2001:db8::1"), MatchGrade::Exact);
        assert_eq!(ipv6_walk("::"), MatchGrade::Exact);
        assert_eq!(ipv6_walk("::ffff:10.0.0.1"), MatchGrade::Exact);
        assert_eq!(ipv6_walk("2001:db8"), MatchGrade::Exact);
        assert_eq!(ipv6_walk("1::2::3"), MatchGrade::NoMatch);
        assert_eq!(ipv6_walk("12345::1"), MatchGrade::NoMatch);
        assert_eq!(ipv6_walk(":1"), MatchGrade::NoMatch);
        assert_eq!(ipv6_walk("fe80::g"), MatchGrade::NoMatch);
        assert_eq!(ipv6_walk("1:2:3:4:5:6:7:8:9"), MatchGrade::NoMatch);
    }

    #[test]
    fn test_ipv6_prefix() {
        assert_eq!(ipv6_prefix_walk("2001:db8::/32"), MatchGrade::Exact);
        assert_eq!(ipv6_prefix_walk("2001:db8::/128"), MatchGrade::Exact);
        assert_eq!(ipv6_prefix_walk("2001:db8::/129"), MatchGrade::NoMatch);
        assert_eq!(ipv6_prefix_walk("2001:db8::/"), MatchGrade::Partly);
        assert_eq!(ipv6_prefix_walk("2001:db8::"), MatchGrade::Partly);
        assert_eq!(ipv6_prefix_walk("2001:db8:/64"), MatchGrade::NoMatch);
        assert_eq!(ipv6_prefix_walk("2001:db8::/6a"), MatchGrade::NoMatch);
    }

    const PATTERNS: &[&str] = &[
        "show", "version", "WORD", "<0-512>", "<-10-10>", "A.B.C.D", "A.B.C.D/M",
        "X:X::X:X", "X:X::X:X/M", ".LINE", "[detail]", "[<1-9>]", "[]",
    ];

    const GRADES: &[MatchGrade] = &[
        MatchGrade::Any,
        MatchGrade::Extend,
        MatchGrade::Ipv4Prefix,
        MatchGrade::Ipv4,
        MatchGrade::Ipv6Prefix,
        MatchGrade::Ipv6,
        MatchGrade::Range,
        MatchGrade::Vararg,
        MatchGrade::Partly,
        MatchGrade::Exact,
    ];

    proptest! {
        #[test]
        fn lowering_threshold_keeps_matches(
            pattern in prop::sample::select(PATTERNS),
            word in "[0-9a-fA-Fsvhow.:/-]{0,12}",
            hi in prop::sample::select(GRADES),
            lo in prop::sample::select(GRADES),
        ) {
            prop_assume!(lo < hi);
            let token = Token::compile(pattern);
            if classify(&token, &word, hi, true) != MatchGrade::NoMatch {
                prop_assert_ne!(classify(&token, &word, lo, true), MatchGrade::NoMatch);
            }
        }
    }
}

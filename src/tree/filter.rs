//! Candidate filtering and ambiguity checks.
//!
//! Resolution narrows a node's command list one input word at a time. Each
//! step runs [`filter`] to drop elements that cannot accept the word and then
//! [`check_ambiguous`] to make sure the survivors agree on what the word means.

use log::trace;

use super::CommandElement;
use super::classify::{MatchGrade, classify, ipv4_prefix_walk, ipv6_prefix_walk};
use super::token::TokenKind;

/// Outcome of [`check_ambiguous`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// Every survivor reads the word the same way
    Unique,

    /// Survivors read the word as different keywords or ranges
    Ambiguous,

    /// Word is only the beginning of an address prefix
    Incomplete,
}

/// Drop candidates whose alternatives at `index` do not accept `word`.
///
/// Runs two passes. The first keeps elements with at least one alternative
/// matching at `min` and records the strongest grade seen. The second drops
/// elements whose best alternative (graded leniently) is weaker than that
/// grade, so `foo bar 10` selects `foo bar <1-255>` over `foo bar WORD`.
///
/// Elements whose pattern is shorter than `index + 1` are always dropped.
///
/// # Returns
///
/// The strongest grade seen, or [`MatchGrade::NoMatch`] when nothing matched.
pub fn filter(
    word: &str,
    candidates: &mut Vec<&CommandElement>,
    index: usize,
    min: MatchGrade,
) -> MatchGrade {
    let mut best = MatchGrade::NoMatch;

    candidates.retain(|element| {
        let Some(level) = element.level(index) else {
            return false;
        };
        let mut matched = false;
        for desc in level {
            let grade = classify(&desc.token, word, min, true);
            if grade != MatchGrade::NoMatch {
                matched = true;
            }
            best = best.max(grade);
        }
        matched
    });

    if best == MatchGrade::NoMatch {
        return MatchGrade::NoMatch;
    }

    candidates.retain(|element| {
        element.level(index).is_some_and(|level| {
            level
                .iter()
                .any(|desc| classify(&desc.token, word, MatchGrade::Any, true) >= best)
        })
    });

    trace!(
        "filter '{}' at {}: {:?}, {} left",
        word,
        index,
        best,
        candidates.len()
    );
    best
}

/// Check that the survivors of [`filter`] agree on `word` at `index`.
///
/// `grade` is the strongest grade [`filter`] reported. Candidates that do not
/// match the word at that grade are dropped. Two candidates only conflict when
/// they matched different keyword or range texts; aliases of the same text
/// are fine.
pub fn check_ambiguous(
    word: &str,
    candidates: &mut Vec<&CommandElement>,
    index: usize,
    grade: MatchGrade,
) -> Ambiguity {
    let mut matched: Option<&str> = None;
    let mut keep = Vec::with_capacity(candidates.len());

    for element in candidates.iter() {
        let mut hits = 0usize;

        for desc in element.level(index).unwrap_or_default() {
            let Some(token) = desc.token.deopt() else {
                continue;
            };
            let text = token.text();

            match grade {
                MatchGrade::Exact => {
                    if !token.is_variable() && text == word {
                        hits += 1;
                    }
                }
                MatchGrade::Partly => {
                    if !token.is_variable() && text.starts_with(word) {
                        if matched.is_some_and(|m| m != text) {
                            return Ambiguity::Ambiguous;
                        }
                        matched = Some(text);
                        hits += 1;
                    }
                }
                MatchGrade::Range => {
                    if let TokenKind::Range(Some(spec)) = token.kind() {
                        if spec.accepts(word) {
                            if matched.is_some_and(|m| m != text) {
                                return Ambiguity::Ambiguous;
                            }
                            matched = Some(text);
                            hits += 1;
                        }
                    }
                }
                MatchGrade::Ipv6 => {
                    if *token.kind() == TokenKind::Ipv6 {
                        hits += 1;
                    }
                }
                MatchGrade::Ipv4 => {
                    if *token.kind() == TokenKind::Ipv4 {
                        hits += 1;
                    }
                }
                MatchGrade::Ipv6Prefix | MatchGrade::Ipv4Prefix => {
                    let walk = if grade == MatchGrade::Ipv6Prefix {
                        ipv6_prefix_walk(word)
                    } else {
                        ipv4_prefix_walk(word)
                    };
                    match walk {
                        MatchGrade::NoMatch => {}
                        MatchGrade::Partly => return Ambiguity::Incomplete,
                        _ => hits += 1,
                    }
                }
                MatchGrade::Extend => {
                    if token.is_variable() {
                        hits += 1;
                    }
                }
                MatchGrade::NoMatch | MatchGrade::Any | MatchGrade::Vararg => {}
            }
        }

        keep.push(hits > 0);
    }

    let mut keep = keep.into_iter();
    candidates.retain(|_| keep.next().unwrap_or(false));
    Ambiguity::Unique
}

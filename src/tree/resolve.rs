//! Resolution engine.
//!
//! Maps a tokenized line onto exactly one command element of a node and
//! collects the words that become handler arguments.

use log::{debug, trace};

use super::classify::MatchGrade;
use super::filter::{Ambiguity, check_ambiguous, filter};
use super::{CommandElement, NodeId};
use crate::error::CmdError;

/// Keyword that runs a privileged command from a configuration node.
pub const DO_SHORTCUT: &str = "do";

/// Successfully resolved line.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'r, 'l> {
    /// Selected command
    pub element: &'r CommandElement,

    /// Values of the placeholder, optional and alternation positions, plus
    /// everything swallowed by a trailing vararg
    pub argv: Vec<&'l str>,
}

/// Whether `first` asks to run the rest of the line at ENABLE.
///
/// The shortcut is inert where the session is not yet privileged, and at
/// ENABLE itself.
pub fn try_do_shortcut(node: NodeId, first: Option<&str>) -> bool {
    first == Some(DO_SHORTCUT)
        && !matches!(
            node,
            NodeId::AUTH | NodeId::VIEW | NodeId::AUTH_ENABLE | NodeId::ENABLE
        )
}

/// Resolve `words` against `elements`.
///
/// # Arguments
///
/// * `elements` - Commands of the current node
/// * `words` - Tokenized line
/// * `strict` - Only accept complete keywords (configuration replay)
/// * `max_argc` - Argument vector limit
///
/// # Returns
///
/// The single matching element with its arguments, or:
///
/// * `NoMatch` - nothing accepts the line
/// * `Incomplete` - the line is a prefix of at least one command
/// * `Ambiguous` - several commands accept the line equally well
/// * `ArgcExceeded` - more than `max_argc - 1` arguments
pub fn resolve<'r, 'l>(
    elements: &'r [CommandElement],
    words: &[&'l str],
    strict: bool,
    max_argc: usize,
) -> Result<Resolved<'r, 'l>, CmdError> {
    let min = if strict {
        MatchGrade::Exact
    } else {
        MatchGrade::Any
    };
    let mut candidates: Vec<&'r CommandElement> = elements.iter().collect();
    let mut grade = MatchGrade::NoMatch;
    let mut index = 0;

    while index < words.len() {
        let word = words[index];
        grade = filter(word, &mut candidates, index, min);
        if grade == MatchGrade::Vararg {
            break;
        }
        match check_ambiguous(word, &mut candidates, index, grade) {
            Ambiguity::Ambiguous => return Err(CmdError::Ambiguous),
            Ambiguity::Incomplete => return Err(CmdError::NoMatch),
            Ambiguity::Unique => {}
        }
        index += 1;
    }

    let mut matched = Vec::new();
    let mut incomplete = 0usize;
    for element in candidates.iter().copied() {
        if grade == MatchGrade::Vararg || index >= element.mandatory() {
            matched.push(element);
        } else {
            incomplete += 1;
        }
    }

    let element = match matched.as_slice() {
        [] if incomplete > 0 => return Err(CmdError::Incomplete),
        [] => return Err(CmdError::NoMatch),
        [element] => *element,
        _ => {
            debug!("'{}' matches {} commands", words.join(" "), matched.len());
            return Err(CmdError::Ambiguous);
        }
    };

    let mut argv = Vec::new();
    let mut varflag = false;
    for (i, word) in words.iter().copied().enumerate() {
        if varflag {
            argv.push(word);
        } else {
            match element.level(i) {
                Some([desc]) => {
                    let token = &desc.token;
                    if token.is_vararg() {
                        varflag = true;
                    }
                    if varflag || token.is_variable() || token.is_optional() {
                        argv.push(word);
                    }
                }
                _ => argv.push(word),
            }
        }

        if argv.len() >= max_argc {
            return Err(CmdError::ArgcExceeded);
        }
    }

    trace!("resolved '{}' with {} args", element.pattern(), argv.len());
    Ok(Resolved { element, argv })
}

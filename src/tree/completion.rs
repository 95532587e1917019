//! `?` help and Tab completion.
//!
//! Both walk the words already typed through the same filter the resolver
//! uses, then look at the candidates' alternatives at the cursor position.
//! These functions are always available; the `completion` feature only
//! controls whether the interactive shell binds them to keys.

use super::CommandElement;
use super::classify::{MatchGrade, ipv4_prefix_walk, ipv4_walk, ipv6_prefix_walk, ipv6_walk};
use super::filter::{Ambiguity, check_ambiguous, filter};
use super::line::PartialLine;
use super::token::{Token, TokenDesc, TokenKind};
use crate::error::CmdError;

/// Text shown for a line that is already a complete command.
pub const END_OF_COMMAND: &str = "<cr>";

/// One entry of `?` output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HelpItem<'r> {
    /// A token the user may type next
    Token(&'r TokenDesc),

    /// The line can be executed as it stands
    EndOfCommand,
}

impl<'r> HelpItem<'r> {
    /// Token text, or `<cr>`.
    pub fn text(&self) -> &'r str {
        match *self {
            HelpItem::Token(desc) => desc.text(),
            HelpItem::EndOfCommand => END_OF_COMMAND,
        }
    }

    /// Help line (empty for `<cr>`).
    pub fn doc(&self) -> &'r str {
        match *self {
            HelpItem::Token(desc) => &desc.doc,
            HelpItem::EndOfCommand => "",
        }
    }
}

/// Tab completion outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<'r> {
    /// Exactly one keyword fits; replace the word with it
    Full(&'r str),

    /// Several keywords share a prefix longer than the typed word
    Prefix(&'r str),

    /// Several keywords fit; show them
    List(Vec<&'r str>),
}

fn push_unique<'r>(items: &mut Vec<HelpItem<'r>>, item: HelpItem<'r>) {
    if !items.iter().any(|i| i.text() == item.text()) {
        items.push(item);
    }
}

/// List what may follow the typed words.
///
/// # Arguments
///
/// * `elements` - Command elements of the current node
/// * `line` - Words typed so far plus the word under the cursor
///
/// # Returns
///
/// Unique help entries, `<cr>` included when the typed words already form a
/// complete command. `Err(CmdError::Ambiguous)` when a typed word is read
/// differently by the candidates, `Err(CmdError::NoMatch)` when nothing fits.
pub fn describe<'r>(
    elements: &'r [CommandElement],
    line: &PartialLine<'_>,
) -> Result<Vec<HelpItem<'r>>, CmdError> {
    let mut candidates: Vec<&'r CommandElement> = elements.iter().collect();
    let index = line.index();

    for (i, word) in line.words.iter().enumerate() {
        let grade = filter(word, &mut candidates, i, MatchGrade::Any);

        if grade == MatchGrade::Vararg {
            // Everything after a vararg is free text.
            let mut items = Vec::new();
            for element in candidates.iter().copied() {
                if let Some(last) = element.levels().last() {
                    for desc in last {
                        push_unique(&mut items, HelpItem::Token(desc));
                    }
                }
            }
            push_unique(&mut items, HelpItem::EndOfCommand);
            return Ok(items);
        }

        match check_ambiguous(word, &mut candidates, i, grade) {
            Ambiguity::Ambiguous => return Err(CmdError::Ambiguous),
            Ambiguity::Incomplete => return Err(CmdError::NoMatch),
            Ambiguity::Unique => {}
        }
    }

    if let Some(word) = line.current {
        filter(word, &mut candidates, index, MatchGrade::Any);
    }

    let mut items = Vec::new();
    for element in candidates.iter().copied() {
        if !element.is_visible() {
            continue;
        }
        match element.level(index) {
            Some(level) => {
                for desc in level {
                    if offers_help(line.current, &desc.token) {
                        push_unique(&mut items, HelpItem::Token(desc));
                    }
                }
            }
            None => {
                if line.current.is_none() && index == element.levels().len() {
                    push_unique(&mut items, HelpItem::EndOfCommand);
                }
            }
        }
    }

    if items.is_empty() {
        Err(CmdError::NoMatch)
    } else {
        Ok(items)
    }
}

/// `?` shows placeholders whenever the typed word could still become one.
fn offers_help(word: Option<&str>, token: &Token) -> bool {
    let walk_ok = |walk: fn(&str) -> MatchGrade| word.is_none_or(|w| walk(w) != MatchGrade::NoMatch);

    match token.kind() {
        TokenKind::Vararg => true,
        TokenKind::Range(spec) => {
            word.is_none_or(|w| spec.is_some_and(|spec| spec.accepts(w)))
        }
        TokenKind::Ipv6 => walk_ok(ipv6_walk),
        TokenKind::Ipv6Prefix => walk_ok(ipv6_prefix_walk),
        TokenKind::Ipv4 => walk_ok(ipv4_walk),
        TokenKind::Ipv4Prefix => walk_ok(ipv4_prefix_walk),
        TokenKind::Optional(_) | TokenKind::Variable => true,
        TokenKind::Keyword => word.is_none_or(|w| token.text().starts_with(w)),
    }
}

/// Complete the word under the cursor.
///
/// Only keywords are completed; placeholders have nothing to insert.
///
/// # Returns
///
/// * `Completion::Full` - a single keyword fits
/// * `Completion::Prefix` - the keywords share a prefix longer than the word
/// * `Completion::List` - several keywords fit
/// * `Err(CmdError::NothingToDo)` - nothing to offer after whitespace
/// * `Err(CmdError::NoMatch)` - nothing starts with the typed word
/// * `Err(CmdError::Ambiguous)` - a preceding word is ambiguous
pub fn complete<'r>(
    elements: &'r [CommandElement],
    line: &PartialLine<'_>,
) -> Result<Completion<'r>, CmdError> {
    let mut candidates: Vec<&'r CommandElement> = elements.iter().collect();
    let index = line.index();

    for (i, word) in line.words.iter().enumerate() {
        let grade = filter(word, &mut candidates, i, MatchGrade::Any);
        if check_ambiguous(word, &mut candidates, i, grade) == Ambiguity::Ambiguous {
            return Err(CmdError::Ambiguous);
        }
    }

    let mut matches: Vec<&'r str> = Vec::new();
    for element in candidates.iter().copied() {
        let Some(level) = element.level(index) else {
            continue;
        };
        for desc in level {
            if completes(line.current, &desc.token) && !matches.contains(&desc.text()) {
                matches.push(desc.text());
            }
        }
    }

    match matches.len() {
        0 if line.current.is_none() => Err(CmdError::NothingToDo),
        0 => Err(CmdError::NoMatch),
        1 => Ok(Completion::Full(matches[0])),
        _ => {
            if let Some(word) = line.current {
                let lcd = common_prefix_len(&matches);
                if lcd > 0 && word.len() < lcd {
                    return Ok(Completion::Prefix(&matches[0][..lcd]));
                }
            }
            Ok(Completion::List(matches))
        }
    }
}

fn completes(word: Option<&str>, token: &Token) -> bool {
    if token.is_optional() || token.is_variable() || token.is_vararg() {
        return false;
    }
    word.is_none_or(|w| token.text().starts_with(w))
}

/// Shortest common prefix length over neighbouring matches, in bytes.
fn common_prefix_len(matches: &[&str]) -> usize {
    matches
        .windows(2)
        .map(|pair| {
            pair[0]
                .char_indices()
                .zip(pair[1].chars())
                .find(|((_, a), b)| a != b)
                .map(|((i, _), _)| i)
                .unwrap_or_else(|| pair[0].len().min(pair[1].len()))
        })
        .min()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{CommandSpec, Descriptor};

    fn install(specs: &[&'static CommandSpec]) -> Vec<CommandElement> {
        specs
            .iter()
            .map(|spec| CommandElement::new(spec, Descriptor::compile(spec.pattern, spec.doc).unwrap()))
            .collect()
    }

    fn texts<'r>(items: &[HelpItem<'r>]) -> Vec<&'r str> {
        items.iter().map(HelpItem::text).collect()
    }

    static SHOW_VERSION: CommandSpec =
        CommandSpec::new("sv", "show version", "Show\nDisplays program version\n");
    static SHOW_VTY: CommandSpec = CommandSpec::new("svi", "show vty-info", "Show\nVTY info\n");
    static SHOW_BTS: CommandSpec =
        CommandSpec::new("sb", "show bts [<0-255>]", "Show\nBTS\nBTS number\n");
    static STATS: CommandSpec = CommandSpec::new("st", "stats", "Statistics\n");
    static HIDDEN: CommandSpec = CommandSpec::new("h", "show secret", "Show\nSecret\n").hidden();
    static ECHO: CommandSpec = CommandSpec::new("e", "echo .MESSAGE", "Echo\nText\n");

    #[test]
    fn test_describe_next_word() {
        let elements = install(&[&SHOW_VERSION, &SHOW_VTY, &SHOW_BTS, &HIDDEN]);
        let items = describe(&elements, &PartialLine::parse("show ")).unwrap();
        assert_eq!(texts(&items), vec!["version", "vty-info", "bts"]);
        assert_eq!(items[0].doc(), "Displays program version");
    }

    #[test]
    fn test_describe_partial_word() {
        let elements = install(&[&SHOW_VERSION, &SHOW_VTY, &SHOW_BTS]);
        let items = describe(&elements, &PartialLine::parse("show v")).unwrap();
        assert_eq!(texts(&items), vec!["version", "vty-info"]);
    }

    #[test]
    fn test_describe_end_of_command() {
        let elements = install(&[&SHOW_BTS]);
        let items = describe(&elements, &PartialLine::parse("show bts ")).unwrap();
        assert_eq!(texts(&items), vec!["[<0-255>]"]);

        let items = describe(&elements, &PartialLine::parse("show bts 3 ")).unwrap();
        assert_eq!(texts(&items), vec!["<cr>"]);
    }

    #[test]
    fn test_describe_vararg() {
        let elements = install(&[&ECHO]);
        let items = describe(&elements, &PartialLine::parse("echo hello wor")).unwrap();
        assert_eq!(texts(&items), vec![".MESSAGE", "<cr>"]);
    }

    #[test]
    fn test_describe_no_match() {
        let elements = install(&[&SHOW_VERSION]);
        assert_eq!(
            describe(&elements, &PartialLine::parse("quit")),
            Err(CmdError::NoMatch)
        );
    }

    #[test]
    fn test_describe_ambiguous_word() {
        let elements = install(&[&SHOW_VERSION, &SHOW_VTY]);
        assert_eq!(
            describe(&elements, &PartialLine::parse("show v ")),
            Err(CmdError::Ambiguous)
        );
    }

    #[test]
    fn test_complete_list_without_false_prefix() {
        let elements = install(&[&SHOW_VERSION, &SHOW_VTY]);
        assert_eq!(
            complete(&elements, &PartialLine::parse("show v")),
            Ok(Completion::List(vec!["version", "vty-info"]))
        );
    }

    #[test]
    fn test_complete_full_and_prefix() {
        let elements = install(&[&SHOW_VERSION, &SHOW_VTY, &STATS]);
        assert_eq!(
            complete(&elements, &PartialLine::parse("show ve")),
            Ok(Completion::Full("version"))
        );
        assert_eq!(
            complete(&elements, &PartialLine::parse("s")),
            Ok(Completion::List(vec!["show", "stats"]))
        );

        static SHOW_A: CommandSpec = CommandSpec::new("a", "show interface", "");
        static SHOW_B: CommandSpec = CommandSpec::new("b", "show interfaces", "");
        let elements = install(&[&SHOW_A, &SHOW_B]);
        assert_eq!(
            complete(&elements, &PartialLine::parse("show in")),
            Ok(Completion::Prefix("interface"))
        );
    }

    #[test]
    fn test_complete_skips_placeholders() {
        let elements = install(&[&SHOW_BTS]);
        assert_eq!(
            complete(&elements, &PartialLine::parse("show bts ")),
            Err(CmdError::NothingToDo)
        );
        assert_eq!(
            complete(&elements, &PartialLine::parse("show x")),
            Err(CmdError::NoMatch)
        );
    }

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len(&["version", "vty-info"]), 1);
        assert_eq!(common_prefix_len(&["start", "status", "stop"]), 2);
        assert_eq!(common_prefix_len(&["abc", "xyz"]), 0);
        assert_eq!(common_prefix_len(&["net", "network"]), 3);
    }
}

//! Configuration replay.
//!
//! Runs configuration text through the strict resolver line by line. Node
//! nesting is read from indentation: a line indented deeper than its parent
//! belongs to the node the previous command entered, a shallower line
//! returns to the ancestor with exactly that indentation.
//!
//! # Example
//!
//! ```text
//! network
//!  bts 0
//!   trx 0
//!  bts 1
//! line vty
//! ```

use core::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use super::handlers::CommandHandlers;
use super::interpreter::Interpreter;
use super::session::{ParentFrame, Session};
use crate::config::ShellConfig;
use crate::error::ReplayError;
use crate::response::replay_tolerates;
use crate::tree::line::indent_cmp;
use crate::tree::Line;

impl<H, C> Interpreter<'_, H, C>
where
    H: CommandHandlers,
    C: ShellConfig,
{
    /// Replay configuration text into `session`.
    ///
    /// Keywords must be spelled out. Warnings are tolerated; the first
    /// other failure stops the replay and is returned with its line.
    ///
    /// # Errors
    ///
    /// * `ReplayError::InvalidIndent` - indentation does not fit the open
    ///   node levels, or grows without a node having been entered
    /// * `ReplayError::Command` - a line was rejected or its handler failed
    /// * `ReplayError::Deferred` - a line belongs to another daemon
    /// * `ReplayError::Io` - reading failed
    pub fn config_from_reader<R: BufRead>(
        &mut self,
        session: &mut Session,
        mut reader: R,
    ) -> Result<(), ReplayError> {
        let mut buf = String::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let text = buf.trim_end_matches(['\n', '\r']);

            let invalid_indent = || {
                warn!("line {}: invalid indentation", line_no);
                ReplayError::InvalidIndent {
                    line_no,
                    line: text.to_string(),
                }
            };

            let line = Line::parse_indented(text).map_err(|_| invalid_indent())?;
            if line.is_empty() {
                continue;
            }

            if !self.align_indent(session, line.indent()) {
                return Err(invalid_indent());
            }

            let frame = ParentFrame {
                node: session.node(),
                context: session.context_handle().cloned(),
                indent: session.indent().map(str::to_string),
            };
            let epoch = session.parent_epoch();

            let result = self.dispatch(session, line.words(), true);
            if !replay_tolerates(&result) {
                let line = text.to_string();
                return Err(match result {
                    Ok(status) => {
                        debug!("line {}: {:?} outcome stops replay", line_no, status);
                        ReplayError::Deferred { line_no, line }
                    }
                    Err(source) => ReplayError::Command {
                        line_no,
                        line,
                        source,
                    },
                });
            }

            if session.node() != frame.node && session.parent_epoch() == epoch {
                session.push_parent(frame);
                session.set_indent(None);
            }
        }

        Ok(())
    }

    /// Replay a configuration file.
    pub fn config_from_file(
        &mut self,
        session: &mut Session,
        path: impl AsRef<Path>,
    ) -> Result<(), ReplayError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.config_from_reader(session, BufReader::new(file))?;
        info!("configuration loaded from {}", path.display());
        Ok(())
    }

    /// Move the session to the level whose indentation is `indent`.
    ///
    /// Returns `false` when no open level fits.
    fn align_indent(&self, session: &mut Session, indent: &str) -> bool {
        let mut cmp = match session.indent() {
            None => {
                // Freshly entered node: the line either opens its first
                // child level or belongs to an ancestor.
                let parent = session.parent().map(|p| p.indent.as_deref().unwrap_or(""));
                let Some(cmp) = parent.map_or(Some(Ordering::Greater), |p| indent_cmp(indent, p))
                else {
                    return false;
                };
                if cmp == Ordering::Greater {
                    debug!("indent {:?} opens node {}", indent, session.node());
                    session.set_indent(Some(indent.to_string()));
                    Ordering::Equal
                } else {
                    debug!("node {} has no child lines", session.node());
                    self.go_parent(session);
                    cmp
                }
            }
            Some(current) => match indent_cmp(indent, current) {
                Some(cmp) => cmp,
                None => return false,
            },
        };

        while cmp == Ordering::Less {
            let before = (session.node(), session.parents().len());
            self.go_parent(session);
            if (session.node(), session.parents().len()) == before {
                return false;
            }
            cmp = match indent_cmp(indent, session.indent().unwrap_or("")) {
                Some(cmp) => cmp,
                None => return false,
            };
        }

        cmp == Ordering::Equal
    }
}

//! Application command handlers.
//!
//! The `CommandHandlers` trait maps command IDs to execution functions,
//! implementing the execution side of the metadata/execution separation
//! pattern. Its defaulted hooks let the application take part in node
//! navigation and configuration dumps.

use core::fmt::Write;

use log::warn;

use super::session::Session;
use crate::error::CmdError;
use crate::response::CmdResult;
use crate::tree::{CommandSpec, NodeId};

/// Application side of the interpreter.
///
/// # Pattern
///
/// Commands use metadata/execution separation:
/// - `CommandSpec` stores const metadata (id, pattern, help)
/// - `CommandHandlers` provides execution logic (this trait)
///
/// The handler dispatches on the unique command ID, not the pattern, so one
/// implementation may back the same command installed at several nodes.
///
/// # Example
///
/// ```rust,ignore
/// struct BscHandlers { bts: Vec<Bts> }
///
/// impl CommandHandlers for BscHandlers {
///     fn execute(&mut self, cmd: &CommandSpec, session: &mut Session, argv: &[&str]) -> CmdResult {
///         match cmd.id {
///             "cfg_bts" => {
///                 let nr: usize = argv[0].parse().map_err(|_| CmdError::NoMatch)?;
///                 session.enter(BscNode::Bts, nr);
///                 Ok(CmdStatus::Success)
///             }
///             _ => Err(CmdError::NoMatch),
///         }
///     }
/// }
/// ```
pub trait CommandHandlers {
    /// Execute an application command.
    ///
    /// # Arguments
    ///
    /// - `cmd`: Metadata of the resolved command
    /// - `session`: Session to print into and move between nodes
    /// - `argv`: Values of the command's placeholder, optional and
    ///   alternation positions, in input order
    ///
    /// # Returns
    ///
    /// - `Ok(CmdStatus::Success)` or `Ok(CmdStatus::Warning)` after printing
    ///   a complaint
    /// - `Err(CmdError::Fatal)` to close the session
    fn execute(&mut self, cmd: &CommandSpec, session: &mut Session, argv: &[&str]) -> CmdResult;

    /// Dump the configuration held at `node`.
    ///
    /// Called for every node installed with `writes_config()`, in node
    /// order. Returns whether anything was written; a `!` separator follows
    /// non-empty dumps.
    fn write_config(&self, node: NodeId, out: &mut dyn Write) -> bool {
        let _ = (node, out);
        false
    }

    /// Custom ascent from an application node.
    ///
    /// Returning `Some(node)` moves the session there before the innermost
    /// parent frame (if any) is restored. Every chain of answers must end at
    /// a canonical node.
    fn go_parent(&self, session: &Session) -> Option<NodeId> {
        let _ = session;
        None
    }

    /// Whether an application node is a child of the global config node.
    ///
    /// `None` falls back to "every application node is".
    fn is_config_node(&self, node: NodeId) -> Option<bool> {
        let _ = node;
        None
    }

    /// Veto `write file` while the running configuration is inconsistent.
    fn config_is_consistent(&self, session: &Session) -> bool {
        let _ = session;
        true
    }
}

/// Handlers for a VTY made of built-in commands only.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoHandlers;

impl CommandHandlers for NoHandlers {
    fn execute(&mut self, cmd: &CommandSpec, _session: &mut Session, _argv: &[&str]) -> CmdResult {
        warn!("no handler for command '{}'", cmd.id);
        Err(CmdError::NoMatch)
    }
}

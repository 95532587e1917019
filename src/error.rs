//! Error types for command resolution, registration, replay and persistence.
//!
//! Each concern gets its own enum so callers can match on exactly the failures
//! that concern can produce. `CmdError` is the graded outcome of resolving and
//! running one command line; the others wrap it where a line number or a file
//! path adds context.

use core::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::NodeId;

/// Graded command failure.
///
/// `NoMatch`, `Incomplete` and `Ambiguous` come from resolution alone and never
/// reach a handler. Handlers may return any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmdError {
    /// No registered command accepts the line
    #[error("unknown command")]
    NoMatch,

    /// The line is a valid prefix of a command but misses mandatory tokens
    #[error("command incomplete")]
    Incomplete,

    /// More than one command accepts the line with equal strength
    #[error("ambiguous command")]
    Ambiguous,

    /// The assembled argument vector exceeds the configured maximum
    #[error("too many arguments")]
    ArgcExceeded,

    /// Indentation in configuration text does not fit the open node levels
    #[error("invalid indentation")]
    InvalidIndent,

    /// Completion of an empty word had nothing to offer
    #[error("nothing to do")]
    NothingToDo,

    /// Handler failure after which the session should close
    #[error("fatal: {0}")]
    Fatal(String),
}

impl From<fmt::Error> for CmdError {
    fn from(_: fmt::Error) -> Self {
        CmdError::Fatal("output failed".into())
    }
}

/// Command registration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Target node was never installed
    #[error("node {0} is not installed")]
    UnknownNode(NodeId),

    /// Node installed twice
    #[error("node {0} is already installed")]
    DuplicateNode(NodeId),

    /// Declared parent node is not installed (yet)
    #[error("parent {parent} of node {node} is not installed")]
    UnknownParent {
        /// Node being installed
        node: NodeId,
        /// Missing parent
        parent: NodeId,
    },

    /// Identical pattern already registered at this node
    #[error("command '{pattern}' is already installed at node {node}")]
    DuplicateCommand {
        /// Target node
        node: NodeId,
        /// Offending pattern string
        pattern: String,
    },

    /// Pattern grammar is broken (stray `|`, unbalanced group, empty pattern)
    #[error("malformed pattern '{pattern}': {reason}")]
    MalformedPattern {
        /// Offending pattern string
        pattern: String,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Configuration replay failure.
///
/// The offending line is preserved for diagnostics.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A line was rejected by the resolution engine or its handler
    #[error("line {line_no}: '{line}': {source}")]
    Command {
        /// 1-based line number
        line_no: usize,
        /// Line text without the trailing newline
        line: String,
        /// Resolution or handler error
        source: CmdError,
    },

    /// Indentation does not match any open node level
    #[error("line {line_no}: '{line}': invalid indentation")]
    InvalidIndent {
        /// 1-based line number
        line_no: usize,
        /// Line text without the trailing newline
        line: String,
    },

    /// A line belongs to another daemon and cannot be applied here
    #[error("line {line_no}: '{line}': command belongs to another daemon")]
    Deferred {
        /// 1-based line number
        line_no: usize,
        /// Line text without the trailing newline
        line: String,
    },

    /// Reading the source failed
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}

static INVALID_INDENT: CmdError = CmdError::InvalidIndent;

impl ReplayError {
    /// The graded command error behind this failure, if any.
    pub fn cmd_error(&self) -> Option<&CmdError> {
        match self {
            ReplayError::Command { source, .. } => Some(source),
            ReplayError::InvalidIndent { .. } => Some(&INVALID_INDENT),
            ReplayError::Deferred { .. } | ReplayError::Io(_) => None,
        }
    }
}

/// Configuration save failure.
///
/// Each variant names the step that failed and the path it failed on.
#[derive(Debug, Error)]
pub enum PersistError {
    /// No configuration file has been set for this host
    #[error("no configuration file set")]
    NoConfigFile,

    /// Application reported the running configuration as inconsistent
    #[error("configuration is not consistent")]
    Inconsistent,

    /// Temporary file could not be created
    #[error("can't open configuration file {}: {source}", path.display())]
    TempOpen {
        /// Temporary file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Writing the rendered configuration failed
    #[error("can't write configuration file {}: {source}", path.display())]
    Write {
        /// Temporary file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Old backup could not be removed
    #[error("can't unlink backup configuration file {}: {source}", path.display())]
    BackupUnlink {
        /// Backup file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Current file could not be linked to the backup name
    #[error("can't backup old configuration file {}: {source}", path.display())]
    BackupLink {
        /// Backup file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Current file could not be removed after backing it up
    #[error("can't unlink configuration file {}: {source}", path.display())]
    Unlink {
        /// Configuration file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Temporary file could not be moved into place
    #[error("can't save configuration file {}: {source}", path.display())]
    Rename {
        /// Configuration file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Permissions on the new file could not be set
    #[error("can't chmod configuration file {}: {source}", path.display())]
    Permissions {
        /// Configuration file path
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },
}

impl PersistError {
    /// Path of the file the failing step operated on.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            PersistError::NoConfigFile | PersistError::Inconsistent => None,
            PersistError::TempOpen { path, .. }
            | PersistError::Write { path, .. }
            | PersistError::BackupUnlink { path, .. }
            | PersistError::BackupLink { path, .. }
            | PersistError::Unlink { path, .. }
            | PersistError::Rename { path, .. }
            | PersistError::Permissions { path, .. } => Some(path),
        }
    }
}

/// Interactive shell failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Line buffer capacity exceeded
    #[error("buffer full")]
    BufferFull,
}

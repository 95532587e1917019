//! Outcome types for command execution.
//!
//! A command either succeeds with a [`CmdStatus`] or fails with a
//! [`CmdError`]. Text the command prints goes to the session's output
//! buffer, not into the status.

use crate::error::CmdError;

/// Successful command outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmdStatus {
    /// Command ran
    Success,

    /// Command ran but complained; the message is already in the output
    Warning,

    /// Command belongs to another daemon and was not run here
    Daemon,
}

impl CmdStatus {
    /// Plain success.
    pub fn is_success(self) -> bool {
        self == CmdStatus::Success
    }
}

/// Result of running one command line.
pub type CmdResult = Result<CmdStatus, CmdError>;

/// Whether configuration replay may continue after `result`.
///
/// Warnings and empty completions are tolerated; everything else aborts.
pub fn replay_tolerates(result: &CmdResult) -> bool {
    matches!(
        result,
        Ok(CmdStatus::Success) | Ok(CmdStatus::Warning) | Err(CmdError::NothingToDo)
    )
}

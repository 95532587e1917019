//! Configuration traits and implementations for interpreter limits.
//!
//! The `ShellConfig` trait allows compile-time configuration of buffer sizes
//! and capacity limits without runtime overhead.

/// Largest line buffer any configuration may ask for.
///
/// The interactive shell allocates this much once and enforces
/// [`ShellConfig::MAX_INPUT`] against it.
pub const VTY_BUFSIZ: usize = 512;

/// Largest command history any configuration may ask for.
pub const VTY_MAXHIST: usize = 20;

/// Shell configuration trait defining buffer sizes and capacity limits.
///
/// All values are const (zero runtime cost).
pub trait ShellConfig {
    /// Maximum input line length (at most [`VTY_BUFSIZ`])
    const MAX_INPUT: usize;

    /// Command history size (at most [`VTY_MAXHIST`])
    const HISTORY_SIZE: usize;

    /// Argument vector limit; a line assembling this many arguments is
    /// rejected with `CmdError::ArgcExceeded`
    const MAX_ARGC: usize;

    /// Wrong passwords accepted before the prompt gives up
    const MAX_AUTH_FAILURES: u32;
}

/// Default configuration, matching classic router CLIs.
///
/// - MAX_INPUT: 512 bytes
/// - HISTORY_SIZE: 20 lines
/// - MAX_ARGC: 256 arguments
/// - MAX_AUTH_FAILURES: 3
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl ShellConfig for DefaultConfig {
    const MAX_INPUT: usize = VTY_BUFSIZ;
    const HISTORY_SIZE: usize = VTY_MAXHIST;
    const MAX_ARGC: usize = 256;
    const MAX_AUTH_FAILURES: u32 = 3;
}

/// Minimal configuration for constrained consoles.
///
/// - MAX_INPUT: 128 bytes
/// - HISTORY_SIZE: 5 lines
/// - MAX_ARGC: 32 arguments
/// - MAX_AUTH_FAILURES: 3
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl ShellConfig for MinimalConfig {
    const MAX_INPUT: usize = 128;
    const HISTORY_SIZE: usize = 5;
    const MAX_ARGC: usize = 32;
    const MAX_AUTH_FAILURES: u32 = 3;
}

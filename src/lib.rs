//! # nut-vty
//!
//! Router-style VTY command interpreter for network daemons.
//!
//! **Key features:**
//! - **Graded matching** - Abbreviated keywords, typed placeholders (ranges,
//!   IPv4/IPv6 addresses and prefixes), optional and alternative tokens
//! - **Node state machine** - View, enable and configuration modes plus
//!   application nodes, with parent tracking for nested configuration
//! - **Configuration replay** - Indentation-driven config files through the
//!   strict resolver, and atomic `write file` with a backup copy
//! - **Interactive shell** - Character-at-a-time terminal with Tab
//!   completion, `?` help, history and password prompts
//! - **Log destinations** - `log stdout`/`log file` commands driving a `log`
//!   backend, see [`logging::init`]
//!
//! ## Optional Features
//!
//! - `authentication` - Encrypted passwords and `service password-encryption`
//! - `completion` - Tab completion and `?` help in the interactive shell
//! - `history` - Command history with up/down arrow navigation
//! - `passwd` - The `nut-vty-passwd` configuration generator
//!
//! The library provides a `#[derive(VtyNode)]` macro that's always available.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::result_large_err)]

// Lets the derive macro's `::nut_vty` paths resolve inside this crate too
extern crate self as nut_vty;

// Re-export derive macro (always available)
pub use nut_vty_macros::VtyNode;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod io;

// Password encryption (always present, but with different contents based on features)
pub mod auth;

pub mod error;
pub mod host;
pub mod logging;
pub mod response;

// Command model, matching and resolution
pub mod tree;

// Sessions, interpreter, persistence and the interactive shell
pub mod shell;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Core I/O
pub use io::CharIo;

// Configuration
pub use config::{DefaultConfig, MinimalConfig, ShellConfig};

// Error types
pub use error::{CliError, CmdError, PersistError, RegistryError, ReplayError};

// Host settings
pub use host::{Host, Motd, Secret};

// Log destinations
pub use logging::{LoggingSettings, Severity, VtyLogger};

// Tree types
pub use tree::{AppInfo, CommandKind, CommandSpec, NodeDef, NodeId, Registry, VtyNode};

// Response types
pub use response::{CmdResult, CmdStatus};

// Shell types
pub use shell::{CliState, CommandHandlers, Interpreter, NoHandlers, Session, Shell};

// Password hashing
#[cfg(feature = "authentication")]
pub use auth::PasswordHasher;
#[cfg(feature = "authentication")]
pub use auth::Sha256Hasher;

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

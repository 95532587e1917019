//! Command tree data structures.
//!
//! A VTY is a set of nodes (interpreter states such as "view", "enable" or
//! "config"), each holding an ordered list of compiled command elements.
//! Command metadata is const-initializable; compilation into descriptor levels
//! happens once, when the element is installed into a [`registry::Registry`].
//!
//! Execution logic lives elsewhere (see `CommandHandlers`), keeping the
//! metadata/execution separation used throughout the crate.

use core::fmt;

// Sub-modules
pub mod classify;
pub mod completion;
pub mod descriptor;
pub mod filter;
pub mod line;
pub mod registry;
pub mod resolve;
pub mod token;

pub use classify::{MatchGrade, classify};
pub use completion::{Completion, HelpItem};
pub use descriptor::Descriptor;
pub use line::{Line, PartialLine};
pub use registry::{AppInfo, Node, NodeDef, Registry, argv_concat};
pub use resolve::Resolved;
pub use token::{Token, TokenDesc, TokenKind};

// ============================================================================
// Node identifiers
// ============================================================================

/// Numeric node identifier.
///
/// Identifiers below [`NodeId::APP_BASE`] are reserved for the library's own
/// nodes. Applications number their nodes from there, usually through
/// `#[derive(VtyNode)]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Login password prompt
    pub const AUTH: NodeId = NodeId(0);
    /// Unprivileged command mode
    pub const VIEW: NodeId = NodeId(1);
    /// Enable password prompt
    pub const AUTH_ENABLE: NodeId = NodeId(2);
    /// Privileged command mode
    pub const ENABLE: NodeId = NodeId(3);
    /// Global configuration
    pub const CONFIG: NodeId = NodeId(4);
    /// Service configuration
    pub const SERVICE: NodeId = NodeId(5);
    /// Debug configuration
    pub const DEBUG: NodeId = NodeId(6);
    /// Logging target configuration
    pub const CFG_LOG: NodeId = NodeId(7);
    /// Statistics reporter configuration
    pub const CFG_STATS: NodeId = NodeId(8);
    /// VTY line configuration
    pub const VTY: NodeId = NodeId(9);

    /// First identifier available to applications.
    pub const APP_BASE: NodeId = NodeId(32);

    /// Application node `n`, counted from [`NodeId::APP_BASE`].
    pub const fn app(n: u32) -> NodeId {
        NodeId(Self::APP_BASE.0 + n)
    }

    /// One of the fixed root states every session converges on.
    pub const fn is_canonical(self) -> bool {
        self.0 <= Self::CONFIG.0
    }

    /// Library-reserved child of the global configuration node.
    pub const fn is_library_config_child(self) -> bool {
        self.0 > Self::CONFIG.0 && self.0 < Self::APP_BASE.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application node enum.
///
/// Usually derived with `#[derive(VtyNode)]`, which numbers variants from
/// [`NodeId::APP_BASE`] by discriminant and names them in kebab-case.
pub trait VtyNode: Copy + 'static {
    /// Numeric identifier of this node.
    fn node_id(self) -> NodeId;

    /// Reverse lookup; `None` for identifiers owned by other enums.
    fn from_node_id(id: NodeId) -> Option<Self>
    where
        Self: Sized;

    /// Node name (used for prompts and help dumps).
    fn name(self) -> &'static str;
}

// ============================================================================
// Command metadata
// ============================================================================

/// Command visibility attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandAttr {
    /// Listed and described
    Normal,

    /// Still accepted, hidden from `?` and `list`
    Deprecated,

    /// Accepted, never shown
    Hidden,
}

/// Who executes a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Implemented by the library (`exit`, `write`, `hostname`, ...)
    Builtin,

    /// Dispatched to the application's `CommandHandlers`
    Application,
}

/// Command metadata (const-initializable, no execution logic).
///
/// `pattern` uses the classic router grammar: keywords, `UPPERCASE` variables,
/// `<min-max>` ranges, `A.B.C.D`, `A.B.C.D/M`, `X:X::X:X`, `X:X::X:X/M`,
/// `[optional]`, `(alt1|alt2)` and a trailing `.VARARG`. `doc` holds one
/// description line per token, in order.
///
/// # Example
///
/// ```rust,ignore
/// const SHOW_BTS: CommandSpec = CommandSpec::new(
///     "show_bts",
///     "show bts [<0-255>]",
///     "Show running system information\nDisplay information about a BTS\nBTS number\n",
/// );
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Unique handler dispatch key
    pub id: &'static str,

    /// Pattern string
    pub pattern: &'static str,

    /// Newline separated token descriptions
    pub doc: &'static str,

    /// Visibility
    pub attr: CommandAttr,

    /// Builtin or application command
    pub kind: CommandKind,

    /// Non-zero: the command belongs to other daemons and resolves to
    /// `CmdStatus::Daemon` without running a handler
    pub daemon: u32,
}

impl CommandSpec {
    /// Application command with normal visibility.
    pub const fn new(id: &'static str, pattern: &'static str, doc: &'static str) -> Self {
        Self {
            id,
            pattern,
            doc,
            attr: CommandAttr::Normal,
            kind: CommandKind::Application,
            daemon: 0,
        }
    }

    /// Same command, hidden from help and listings.
    pub const fn hidden(mut self) -> Self {
        self.attr = CommandAttr::Hidden;
        self
    }

    /// Same command, marked deprecated.
    pub const fn deprecated(mut self) -> Self {
        self.attr = CommandAttr::Deprecated;
        self
    }

    /// Same command, owned by the daemons in `mask`.
    pub const fn for_daemons(mut self, mask: u32) -> Self {
        self.daemon = mask;
        self
    }

    pub(crate) const fn builtin(mut self) -> Self {
        self.kind = CommandKind::Builtin;
        self
    }
}

/// Installed command: metadata plus its compiled descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandElement {
    spec: &'static CommandSpec,
    descriptor: Descriptor,
}

impl CommandElement {
    pub(crate) fn new(spec: &'static CommandSpec, descriptor: Descriptor) -> Self {
        Self { spec, descriptor }
    }

    /// Static metadata.
    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    /// Handler dispatch key.
    pub fn id(&self) -> &'static str {
        self.spec.id
    }

    /// Raw pattern string.
    pub fn pattern(&self) -> &'static str {
        self.spec.pattern
    }

    /// Descriptor levels, one per input position.
    pub fn levels(&self) -> &[Vec<TokenDesc>] {
        self.descriptor.levels()
    }

    /// Level at `index`, if the pattern is that long.
    pub fn level(&self, index: usize) -> Option<&[TokenDesc]> {
        self.descriptor.levels().get(index).map(Vec::as_slice)
    }

    /// Number of leading tokens the user must type.
    pub fn mandatory(&self) -> usize {
        self.descriptor.mandatory()
    }

    /// Shown by `?` and `list`.
    pub fn is_visible(&self) -> bool {
        self.spec.attr == CommandAttr::Normal
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut Descriptor {
        &mut self.descriptor
    }
}

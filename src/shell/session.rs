//! Per-connection interpreter state.
//!
//! A session knows which node it is at, carries an opaque context for that
//! node (the object being configured), and keeps a stack of parent frames
//! recording how it got there during configuration replay.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use log::debug;

use crate::tree::NodeId;

/// Opaque per-node context (e.g. the BTS being configured).
pub type NodeContext = Rc<dyn Any>;

/// Whether the session should stay open.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Keep reading lines
    Normal,

    /// `exit` at a root node, a fatal handler error or too many bad passwords
    Close,
}

/// Saved ancestor level, restored on ascent.
#[derive(Clone)]
pub struct ParentFrame {
    /// Node to return to
    pub node: NodeId,

    /// Its context
    pub context: Option<NodeContext>,

    /// Its indentation in configuration text (`None` until known)
    pub indent: Option<String>,
}

impl fmt::Debug for ParentFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentFrame")
            .field("node", &self.node)
            .field("context", &self.context.as_ref().map(|_| "<dyn Any>"))
            .field("indent", &self.indent)
            .finish()
    }
}

/// Interpreter session.
///
/// Commands print into the session with `write!`/`writeln!`; the transport
/// drains the text with [`Session::take_output`].
pub struct Session {
    node: NodeId,
    context: Option<NodeContext>,
    parents: Vec<ParentFrame>,
    /// Bumped on every change to the parent stack
    epoch: u64,
    indent: Option<String>,
    output: String,
    lines: Option<u32>,
    status: SessionStatus,
    auth_failures: u32,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("node", &self.node)
            .field("context", &self.context.as_ref().map(|_| "<dyn Any>"))
            .field("parents", &self.parents)
            .field("indent", &self.indent)
            .field("lines", &self.lines)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session starting at `node`.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            context: None,
            parents: Vec::new(),
            epoch: 0,
            indent: None,
            output: String::new(),
            lines: None,
            status: SessionStatus::Normal,
            auth_failures: 0,
        }
    }

    // ========================================
    // Node and context
    // ========================================

    /// Current node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Move to `node`, keeping the context.
    pub fn set_node(&mut self, node: impl Into<NodeId>) {
        let node = node.into();
        if node != self.node {
            debug!("node {} -> {}", self.node, node);
        }
        self.node = node;
    }

    /// Enter a child node with the object it configures.
    pub fn enter<T: Any>(&mut self, node: impl Into<NodeId>, context: T) {
        self.set_node(node);
        self.context = Some(Rc::new(context));
    }

    /// Context of the current node, if it has one of type `T`.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }

    /// Raw context handle.
    pub fn context_handle(&self) -> Option<&NodeContext> {
        self.context.as_ref()
    }

    /// Replace the context.
    pub fn set_context(&mut self, context: Option<NodeContext>) {
        self.context = context;
    }

    /// Drop the context.
    pub fn clear_context(&mut self) {
        self.context = None;
    }

    // ========================================
    // Parent frames
    // ========================================

    /// Open parent frames, outermost first.
    pub fn parents(&self) -> &[ParentFrame] {
        &self.parents
    }

    /// Innermost parent frame.
    pub fn parent(&self) -> Option<&ParentFrame> {
        self.parents.last()
    }

    /// Parent stack identity. Two equal values mean no frame was pushed or
    /// popped in between.
    pub fn parent_epoch(&self) -> u64 {
        self.epoch
    }

    /// Save a level to return to.
    pub fn push_parent(&mut self, frame: ParentFrame) {
        debug!("push parent {} (depth {})", frame.node, self.parents.len() + 1);
        self.parents.push(frame);
        self.epoch += 1;
    }

    /// Return to the innermost saved level.
    ///
    /// Restores node, context and indentation. Returns `false` when no
    /// frame is open.
    pub fn pop_parent(&mut self) -> bool {
        let Some(frame) = self.parents.pop() else {
            return false;
        };
        debug!("pop parent {} -> {}", self.node, frame.node);
        self.node = frame.node;
        self.context = frame.context;
        self.indent = frame.indent;
        self.epoch += 1;
        true
    }

    /// Pop every frame, ending at the outermost saved level.
    pub fn clear_parents(&mut self) {
        while self.pop_parent() {}
    }

    // ========================================
    // Indentation
    // ========================================

    /// Indentation of the current node's lines, once seen.
    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    /// Record (or forget) the current node's indentation.
    pub fn set_indent(&mut self, indent: Option<String>) {
        self.indent = indent;
    }

    pub(crate) fn take_indent(&mut self) -> Option<String> {
        self.indent.take()
    }

    // ========================================
    // Output and terminal
    // ========================================

    /// Text printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Drain the printed text.
    pub fn take_output(&mut self) -> String {
        core::mem::take(&mut self.output)
    }

    /// Terminal length: `None` unset, `Some(0)` no paging.
    pub fn lines(&self) -> Option<u32> {
        self.lines
    }

    /// Set the terminal length.
    pub fn set_lines(&mut self, lines: Option<u32>) {
        self.lines = lines;
    }

    // ========================================
    // Lifecycle
    // ========================================

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Ask the transport to close the session.
    pub fn close(&mut self) {
        self.status = SessionStatus::Close;
    }

    /// Closing.
    pub fn is_closing(&self) -> bool {
        self.status == SessionStatus::Close
    }

    /// Count a wrong password; returns the new total.
    pub fn record_auth_failure(&mut self) -> u32 {
        self.auth_failures += 1;
        self.auth_failures
    }

    /// Forget wrong passwords after a successful one.
    pub fn reset_auth_failures(&mut self) {
        self.auth_failures = 0;
    }
}

impl fmt::Write for Session {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

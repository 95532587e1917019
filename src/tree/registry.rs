//! Node and command registry.
//!
//! The registry is built once at startup (nodes first, then their commands)
//! and is read-only afterwards. Resolution borrows it; nothing in the crate
//! keeps global state.

use std::collections::BTreeMap;

use log::debug;

use super::descriptor::Descriptor;
use super::{CommandElement, CommandSpec, NodeId};
use crate::error::RegistryError;

/// Application identity, shown by `show version` and in saved files.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Program name (also the prompt name when no hostname is set)
    pub name: &'static str,

    /// Program version
    pub version: &'static str,

    /// Copyright notice printed after the version line
    pub copyright: Option<&'static str>,
}

impl AppInfo {
    /// Name and version, no copyright.
    pub const fn new(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            copyright: None,
        }
    }

    /// Same info with a copyright notice.
    pub const fn with_copyright(mut self, copyright: &'static str) -> Self {
        self.copyright = Some(copyright);
        self
    }
}

/// Node definition (const-initializable).
///
/// # Example
///
/// ```rust,ignore
/// const BTS_NODE: NodeDef = NodeDef::new(BscNode::Bts.node_id(), "%s(config-net-bts)# ")
///     .child_of(NodeId::app(0))
///     .writes_config();
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodeDef {
    /// Identifier
    pub id: NodeId,

    /// Prompt template; `%s` expands to the hostname
    pub prompt: &'static str,

    /// Explicit name; derived from the prompt when `None`
    pub name: Option<&'static str>,

    /// Node `exit` returns to, when it is not simply the global config node
    pub parent: Option<NodeId>,

    /// Dumped by `write` and `show running-config`
    pub config_writer: bool,

    /// Top-level node: not part of the configuration tree, so ascending
    /// from it without a registered parent lands in VIEW
    pub top_level: bool,
}

impl NodeDef {
    /// Child node with the given prompt.
    pub const fn new(id: NodeId, prompt: &'static str) -> Self {
        Self {
            id,
            prompt,
            name: None,
            parent: None,
            config_writer: false,
            top_level: false,
        }
    }

    /// Explicit node name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Register the node `exit` ascends to.
    pub const fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Include the node in configuration dumps.
    pub const fn writes_config(mut self) -> Self {
        self.config_writer = true;
        self
    }

    /// Mark as a top-level node outside the configuration tree.
    pub const fn top_level(mut self) -> Self {
        self.top_level = true;
        self
    }
}

/// Installed node.
#[derive(Debug, Clone)]
pub struct Node {
    def: NodeDef,
    name: String,
    elements: Vec<CommandElement>,
}

impl Node {
    /// Identifier.
    pub fn id(&self) -> NodeId {
        self.def.id
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prompt template.
    pub fn prompt_template(&self) -> &'static str {
        self.def.prompt
    }

    /// Registered parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.def.parent
    }

    /// Dumped by `write`.
    pub fn writes_config(&self) -> bool {
        self.def.config_writer
    }

    /// Top-level node.
    pub fn is_top_level(&self) -> bool {
        self.def.top_level
    }

    /// Commands in installation (or sorted) order.
    pub fn elements(&self) -> &[CommandElement] {
        &self.elements
    }
}

/// All nodes and their commands.
#[derive(Debug, Clone)]
pub struct Registry {
    app: AppInfo,
    nodes: BTreeMap<NodeId, Node>,
}

impl Registry {
    /// Empty registry.
    ///
    /// Canonical nodes and standard commands are added by
    /// `shell::builtins::install_standard`.
    pub fn new(app: AppInfo) -> Self {
        Self {
            app,
            nodes: BTreeMap::new(),
        }
    }

    /// Application identity.
    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    /// Install a node.
    ///
    /// A declared parent must already be installed, so parent chains can
    /// never loop.
    pub fn install_node(&mut self, def: NodeDef) -> Result<(), RegistryError> {
        if self.nodes.contains_key(&def.id) {
            return Err(RegistryError::DuplicateNode(def.id));
        }
        if let Some(parent) = def.parent {
            if !self.nodes.contains_key(&parent) {
                return Err(RegistryError::UnknownParent {
                    node: def.id,
                    parent,
                });
            }
        }

        let name = match def.name {
            Some(name) => name.to_string(),
            None => node_name_from_prompt(def.prompt),
        };
        debug!("installing node {} '{}'", def.id, name);

        self.nodes.insert(
            def.id,
            Node {
                def,
                name,
                elements: Vec::new(),
            },
        );
        Ok(())
    }

    /// Install a command at `node`.
    ///
    /// # Errors
    ///
    /// * `UnknownNode` - the node was never installed
    /// * `DuplicateCommand` - the same pattern is already installed there
    /// * `MalformedPattern` - the pattern does not compile
    pub fn install_element(
        &mut self,
        node: impl Into<NodeId>,
        spec: &'static CommandSpec,
    ) -> Result<(), RegistryError> {
        let id = node.into();
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(RegistryError::UnknownNode(id))?;

        if node.elements.iter().any(|e| e.pattern() == spec.pattern) {
            return Err(RegistryError::DuplicateCommand {
                node: id,
                pattern: spec.pattern.to_string(),
            });
        }

        let descriptor = Descriptor::compile(spec.pattern, spec.doc)?;
        node.elements.push(CommandElement::new(spec, descriptor));
        Ok(())
    }

    /// Install a command at both VIEW and ENABLE.
    pub fn install_element_ve(&mut self, spec: &'static CommandSpec) -> Result<(), RegistryError> {
        self.install_element(NodeId::VIEW, spec)?;
        self.install_element(NodeId::ENABLE, spec)
    }

    /// Installed node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Commands of a node (empty for unknown nodes).
    pub fn elements(&self, id: NodeId) -> &[CommandElement] {
        self.nodes.get(&id).map(Node::elements).unwrap_or_default()
    }

    /// Registered parent of a node.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(Node::parent)
    }

    /// Sort every node's commands by pattern, and each command's final
    /// alternatives by text.
    pub fn sort_nodes(&mut self) {
        for node in self.nodes.values_mut() {
            node.elements.sort_by(|a, b| a.pattern().cmp(b.pattern()));
            for element in &mut node.elements {
                element.descriptor_mut().sort_last_level();
            }
        }
    }

    /// Visible patterns of a node, as printed by `list`.
    pub fn list(&self, id: NodeId) -> Vec<&'static str> {
        self.elements(id)
            .iter()
            .filter(|e| e.is_visible())
            .map(CommandElement::pattern)
            .collect()
    }

    /// Expanded prompt of a node.
    ///
    /// `%s` is replaced with `hostname`, or the application name when no
    /// hostname is set. Unknown nodes get an empty prompt.
    pub fn prompt(&self, id: NodeId, hostname: Option<&str>) -> String {
        let Some(node) = self.nodes.get(&id) else {
            return String::new();
        };
        node.def
            .prompt
            .replacen("%s", hostname.unwrap_or(self.app.name), 1)
    }
}

/// Derive a node name from its prompt.
///
/// Keeps ASCII alphanumerics, `-` and `_`; format directives such as `%s`
/// are skipped entirely.
///
/// ```
/// use nut_vty::tree::registry::node_name_from_prompt;
///
/// assert_eq!(node_name_from_prompt("%s(config-net-bts)# "), "config-net-bts");
/// ```
pub fn node_name_from_prompt(prompt: &str) -> String {
    let mut name = String::with_capacity(prompt.len());
    let mut chars = prompt.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' && chars.peek().is_some() {
            chars.next();
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
        }
    }
    name
}

/// Join `argv[shift..]` with single spaces.
pub fn argv_concat(argv: &[&str], shift: usize) -> String {
    argv.get(shift..).unwrap_or_default().join(" ")
}

//! Command interpreter.
//!
//! Ties a frozen [`Registry`] to the host settings and the application's
//! handlers. Every line, typed or replayed, goes through
//! [`Interpreter::execute`] or [`Interpreter::execute_strict`].

use core::marker::PhantomData;

use log::{debug, warn};

use super::builtins;
use super::handlers::CommandHandlers;
use super::session::Session;
use crate::config::{DefaultConfig, ShellConfig};
use crate::error::CmdError;
use crate::host::Host;
use crate::response::{CmdResult, CmdStatus};
use crate::tree::completion::{self, Completion, HelpItem};
use crate::tree::resolve::{DO_SHORTCUT, resolve, try_do_shortcut};
use crate::tree::{CommandKind, Line, NodeId, PartialLine, Registry};

/// Command interpreter.
///
/// Generic over the application handlers `H` and the limits `C`.
pub struct Interpreter<'r, H, C = DefaultConfig> {
    registry: &'r Registry,
    host: Host,
    handlers: H,
    _config: PhantomData<C>,
}

impl<H, C> core::fmt::Debug for Interpreter<'_, H, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interpreter")
            .field("app", self.registry.app())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl<'r, H, C> Interpreter<'r, H, C>
where
    H: CommandHandlers,
    C: ShellConfig,
{
    /// Interpreter with default host settings.
    pub fn new(registry: &'r Registry, handlers: H) -> Self {
        Self {
            registry,
            host: Host::new(),
            handlers,
            _config: PhantomData,
        }
    }

    /// Same interpreter with the given host settings.
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Registry the interpreter resolves against.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Host settings.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Mutable host settings.
    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Application handlers.
    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    /// Mutable application handlers.
    pub fn handlers_mut(&mut self) -> &mut H {
        &mut self.handlers
    }

    // ========================================
    // Execution
    // ========================================

    /// Run a typed line.
    ///
    /// Keywords may be abbreviated. At configuration nodes a leading `do`
    /// runs the rest of the line as if at ENABLE, then returns to the
    /// original node. Blank and comment lines succeed without doing
    /// anything.
    pub fn execute(&mut self, session: &mut Session, line: &str) -> CmdResult {
        let line = Line::parse(line);
        if line.is_empty() {
            return Ok(CmdStatus::Success);
        }

        if try_do_shortcut(session.node(), line.first()) {
            let saved = session.node();
            session.set_node(NodeId::ENABLE);
            let result = self.dispatch(session, &line.words()[1..], false);
            session.set_node(saved);
            return result;
        }

        self.dispatch(session, line.words(), false)
    }

    /// Run a line accepting complete keywords only, as configuration replay
    /// does.
    pub fn execute_strict(&mut self, session: &mut Session, line: &str) -> CmdResult {
        let line = Line::parse(line);
        if line.is_empty() {
            return Ok(CmdStatus::Success);
        }
        self.dispatch(session, line.words(), true)
    }

    pub(crate) fn dispatch(
        &mut self,
        session: &mut Session,
        words: &[&str],
        strict: bool,
    ) -> CmdResult {
        let registry = self.registry;
        let resolved = resolve(registry.elements(session.node()), words, strict, C::MAX_ARGC)?;
        let spec = resolved.element.spec();

        if spec.daemon != 0 {
            debug!("'{}' belongs to daemons {:#x}", spec.pattern, spec.daemon);
            return Ok(CmdStatus::Daemon);
        }

        let result = match spec.kind {
            CommandKind::Builtin => builtins::execute(self, session, spec.id, &resolved.argv),
            CommandKind::Application => self.handlers.execute(spec, session, &resolved.argv),
        };

        if let Err(CmdError::Fatal(reason)) = &result {
            warn!("'{}' failed: {}, closing session", spec.pattern, reason);
            session.close();
        }
        result
    }

    // ========================================
    // Help and completion
    // ========================================

    /// `?` help for a partially typed line.
    pub fn describe(&self, session: &Session, line: &str) -> Result<Vec<HelpItem<'r>>, CmdError> {
        let (node, line) = self.shortcut_view(session, PartialLine::parse(line));
        completion::describe(self.registry.elements(node), &line)
    }

    /// Tab completion for a partially typed line.
    pub fn complete(&self, session: &Session, line: &str) -> Result<Completion<'r>, CmdError> {
        let (node, line) = self.shortcut_view(session, PartialLine::parse(line));
        completion::complete(self.registry.elements(node), &line)
    }

    /// Node and line to help with, after a completed `do` word.
    ///
    /// A `do` still under the cursor is left to the current node, so it can
    /// complete to an application keyword sharing the prefix.
    fn shortcut_view<'a>(&self, session: &Session, line: PartialLine<'a>) -> (NodeId, PartialLine<'a>) {
        let first = line.words.first().copied();
        if first == Some(DO_SHORTCUT) && try_do_shortcut(session.node(), first) {
            (NodeId::ENABLE, line.shifted())
        } else {
            (session.node(), line)
        }
    }

    // ========================================
    // Node navigation
    // ========================================

    /// Ascend one level.
    ///
    /// Root nodes stay where they are, dropping any open parent frames.
    /// Library configuration nodes return to CONFIG. Application nodes ask
    /// the handlers' `go_parent` hook first, then their registered parent,
    /// and otherwise fall back to CONFIG, or to VIEW for top-level nodes.
    /// Restoring a parent frame wins over both the hook and the registered
    /// parent.
    ///
    /// # Returns
    ///
    /// The node the session ends up at.
    pub fn go_parent(&self, session: &mut Session) -> NodeId {
        match session.node() {
            NodeId::AUTH | NodeId::VIEW | NodeId::ENABLE | NodeId::CONFIG => {
                session.clear_parents();
            }
            NodeId::AUTH_ENABLE => {
                session.set_node(NodeId::VIEW);
                session.clear_parents();
            }
            NodeId::CFG_LOG | NodeId::VTY => {
                session.set_node(NodeId::CONFIG);
                session.clear_parents();
            }
            node => {
                if let Some(target) = self.handlers.go_parent(session) {
                    session.set_node(target);
                    session.pop_parent();
                } else if let Some(parent) = self.registry.parent_of(node) {
                    session.set_node(parent);
                    session.pop_parent();
                } else if self.is_config_child(node) {
                    session.set_node(NodeId::CONFIG);
                    session.clear_parents();
                } else {
                    session.set_node(NodeId::VIEW);
                    session.clear_parents();
                }
            }
        }
        session.node()
    }

    /// Leave configuration entirely: ascend to CONFIG, then drop to ENABLE.
    ///
    /// No-op at ENABLE and below.
    pub fn end(&self, session: &mut Session) {
        if session.node() <= NodeId::ENABLE {
            return;
        }

        let mut last = NodeId::CONFIG;
        while session.node() > NodeId::CONFIG {
            if session.node() == last {
                warn!("node {} does not ascend", last);
                break;
            }
            last = session.node();
            self.go_parent(session);
        }

        if session.node() > NodeId::ENABLE {
            session.set_node(NodeId::ENABLE);
        }
        session.clear_context();
    }

    /// Whether `node` lives under the global config node.
    ///
    /// The handlers' `is_config_node` hook decides for application nodes;
    /// without an answer, nodes installed as top-level are not config
    /// children and every other node is.
    pub fn is_config_child(&self, node: NodeId) -> bool {
        if node <= NodeId::CONFIG {
            false
        } else if node.is_library_config_child() {
            true
        } else {
            self.handlers.is_config_node(node).unwrap_or_else(|| {
                !self.registry.node(node).is_some_and(|n| n.is_top_level())
            })
        }
    }

    /// Prompt for the session's current node.
    pub fn prompt(&self, session: &Session) -> String {
        self.registry.prompt(session.node(), self.host.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::builtins::install_standard;
    use crate::shell::handlers::NoHandlers;
    use crate::shell::session::ParentFrame;
    use crate::tree::{AppInfo, CommandSpec, NodeDef};
    use core::fmt::Write;

    const APP: AppInfo = AppInfo::new("bsc", "1.0");

    static NETWORK: CommandSpec = CommandSpec::new("network", "network", "Network\n");
    static BTS: CommandSpec = CommandSpec::new("bts", "bts <0-255>", "BTS\nNumber\n");
    static REMOTE: CommandSpec = CommandSpec::new("remote", "remote", "Remote\n").for_daemons(1);
    static CRASH: CommandSpec = CommandSpec::new("crash", "crash", "Crash\n");

    struct Handlers;

    impl CommandHandlers for Handlers {
        fn execute(&mut self, cmd: &crate::tree::CommandSpec, session: &mut Session, argv: &[&str]) -> CmdResult {
            match cmd.id {
                "network" => session.set_node(NodeId::app(0)),
                "bts" => {
                    let nr: u8 = argv[0].parse().map_err(|_| CmdError::NoMatch)?;
                    session.enter(NodeId::app(1), nr);
                }
                "crash" => return Err(CmdError::Fatal("boom".into())),
                _ => return Err(CmdError::NoMatch),
            }
            writeln!(session, "{} ok", cmd.id)?;
            Ok(CmdStatus::Success)
        }
    }

    fn registry() -> Registry {
        let mut reg = Registry::new(APP);
        install_standard(&mut reg, true).unwrap();
        reg.install_node(NodeDef::new(NodeId::app(0), "%s(config-net)# ")).unwrap();
        reg.install_node(NodeDef::new(NodeId::app(1), "%s(config-net-bts)# ").child_of(NodeId::app(0)))
            .unwrap();
        reg.install_node(NodeDef::new(NodeId::app(2), "%s(debug)# ").top_level()).unwrap();
        reg.install_element(NodeId::CONFIG, &NETWORK).unwrap();
        reg.install_element(NodeId::CONFIG, &REMOTE).unwrap();
        reg.install_element(NodeId::CONFIG, &CRASH).unwrap();
        reg.install_element(NodeId::app(0), &BTS).unwrap();
        reg
    }

    #[test]
    fn test_execute_application_command() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::CONFIG);

        assert_eq!(vty.execute(&mut session, "net"), Ok(CmdStatus::Success));
        assert_eq!(session.node(), NodeId::app(0));
        assert_eq!(vty.execute(&mut session, "bts 3"), Ok(CmdStatus::Success));
        assert_eq!(session.context::<u8>(), Some(&3));
        assert_eq!(session.output(), "network ok\nbts ok\n");
    }

    #[test]
    fn test_blank_line_succeeds() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::VIEW);
        assert_eq!(vty.execute(&mut session, "   "), Ok(CmdStatus::Success));
        assert_eq!(vty.execute(&mut session, "! comment"), Ok(CmdStatus::Success));
    }

    #[test]
    fn test_strict_rejects_abbreviation() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::CONFIG);
        assert_eq!(vty.execute_strict(&mut session, "net"), Err(CmdError::NoMatch));
        assert_eq!(vty.execute_strict(&mut session, "network"), Ok(CmdStatus::Success));
    }

    #[test]
    fn test_daemon_command_is_not_run() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::CONFIG);
        assert_eq!(vty.execute(&mut session, "remote"), Ok(CmdStatus::Daemon));
        assert_eq!(session.output(), "");
    }

    #[test]
    fn test_fatal_closes_session() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::CONFIG);
        assert!(matches!(vty.execute(&mut session, "crash"), Err(CmdError::Fatal(_))));
        assert!(session.is_closing());
    }

    #[test]
    fn test_do_shortcut_restores_node() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let mut session = Session::new(NodeId::app(0));

        assert_eq!(vty.execute(&mut session, "do show version"), Ok(CmdStatus::Success));
        assert_eq!(session.node(), NodeId::app(0));
        assert!(session.output().starts_with("bsc 1.0 (bsc)."));

        let mut session = Session::new(NodeId::VIEW);
        assert_eq!(vty.execute(&mut session, "do show version"), Err(CmdError::NoMatch));
    }

    #[test]
    fn test_go_parent_root_nodes_are_fixed_points() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, NoHandlers);
        for node in [NodeId::AUTH, NodeId::VIEW, NodeId::ENABLE, NodeId::CONFIG] {
            let mut session = Session::new(node);
            assert_eq!(vty.go_parent(&mut session), node);
            assert_eq!(vty.go_parent(&mut session), node);
        }

        let mut session = Session::new(NodeId::AUTH_ENABLE);
        assert_eq!(vty.go_parent(&mut session), NodeId::VIEW);
        let mut session = Session::new(NodeId::VTY);
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
        let mut session = Session::new(NodeId::CFG_STATS);
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
    }

    #[test]
    fn test_go_parent_follows_registered_parent() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, NoHandlers);
        let mut session = Session::new(NodeId::app(1));
        assert_eq!(vty.go_parent(&mut session), NodeId::app(0));
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
    }

    #[test]
    fn test_go_parent_prefers_frames() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, NoHandlers);
        let mut session = Session::new(NodeId::app(1));
        session.push_parent(ParentFrame {
            node: NodeId::CONFIG,
            context: None,
            indent: Some(String::new()),
        });
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
        assert!(session.parents().is_empty());
        assert_eq!(session.indent(), Some(""));
    }

    #[test]
    fn test_non_config_application_node_falls_to_view() {
        struct ViewOnly;
        impl CommandHandlers for ViewOnly {
            fn execute(&mut self, _: &crate::tree::CommandSpec, _: &mut Session, _: &[&str]) -> CmdResult {
                Ok(CmdStatus::Success)
            }
            fn is_config_node(&self, _node: NodeId) -> Option<bool> {
                Some(false)
            }
        }

        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, ViewOnly);
        let mut session = Session::new(NodeId::app(7));
        assert!(!vty.is_config_child(NodeId::app(7)));
        assert!(vty.is_config_child(NodeId::VTY));
        assert_eq!(vty.go_parent(&mut session), NodeId::VIEW);
    }

    #[test]
    fn test_end_clamps_to_enable() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, NoHandlers);
        let mut session = Session::new(NodeId::VIEW);
        session.enter(NodeId::app(1), 5u8);

        vty.end(&mut session);
        assert_eq!(session.node(), NodeId::ENABLE);
        assert!(session.context::<u8>().is_none());

        let mut session = Session::new(NodeId::VIEW);
        vty.end(&mut session);
        assert_eq!(session.node(), NodeId::VIEW);
    }

    #[test]
    fn test_end_stops_on_stuck_hook() {
        struct Stuck;
        impl CommandHandlers for Stuck {
            fn execute(&mut self, _: &crate::tree::CommandSpec, _: &mut Session, _: &[&str]) -> CmdResult {
                Ok(CmdStatus::Success)
            }
            fn go_parent(&self, session: &Session) -> Option<NodeId> {
                Some(session.node())
            }
        }

        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, Stuck);
        let mut session = Session::new(NodeId::app(5));
        vty.end(&mut session);
        assert_eq!(session.node(), NodeId::ENABLE);
    }

    #[test]
    fn test_describe_and_complete_with_do() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        let session = Session::new(NodeId::CONFIG);

        let items = vty.describe(&session, "do show ").unwrap();
        let texts: Vec<_> = items.iter().map(HelpItem::text).collect();
        assert!(texts.contains(&"version"));
        assert!(texts.contains(&"running-config"));

        assert_eq!(
            vty.complete(&session, "do disa"),
            Ok(Completion::Full("disable"))
        );
        assert_eq!(vty.complete(&session, "netw"), Ok(Completion::Full("network")));
    }

    #[test]
    fn test_top_level_node_exits_to_view() {
        let reg = registry();
        let vty: Interpreter<_> = Interpreter::new(&reg, Handlers);
        assert!(!vty.is_config_child(NodeId::app(2)));
        assert!(vty.is_config_child(NodeId::app(0)));
        // Not installed at all
        assert!(vty.is_config_child(NodeId::app(9)));

        let mut session = Session::new(NodeId::app(2));
        assert_eq!(vty.go_parent(&mut session), NodeId::VIEW);

        let mut session = Session::new(NodeId::app(2));
        vty.end(&mut session);
        assert_eq!(session.node(), NodeId::VIEW);

        let mut session = Session::new(NodeId::app(0));
        assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
    }

    #[test]
    fn test_prompt_uses_hostname() {
        let reg = registry();
        let mut vty: Interpreter<_> = Interpreter::new(&reg, NoHandlers);
        let mut session = Session::new(NodeId::app(1));
        assert_eq!(vty.prompt(&session), "bsc(config-net-bts)# ");

        vty.host_mut().name = Some("bsc-7".into());
        session.set_node(NodeId::ENABLE);
        assert_eq!(vty.prompt(&session), "bsc-7# ");
    }
}

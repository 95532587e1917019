//! Node navigation: `exit`, `end`, parent frames and prompts.

#[allow(clippy::duplicate_mod)]
#[path = "helpers.rs"]
mod helpers;

use std::rc::Rc;

use helpers::{BscHandlers, BscNode, config_session, interpreter, registry, run_all};
use nut_vty::shell::ParentFrame;
use nut_vty::{CmdResult, CommandHandlers, CommandSpec, Host, Interpreter, NodeId, Session};

/// BSC handlers that skip the BTS level when leaving a TRX.
#[derive(Default)]
struct FlatHandlers(BscHandlers);

impl CommandHandlers for FlatHandlers {
    fn execute(&mut self, cmd: &CommandSpec, session: &mut Session, argv: &[&str]) -> CmdResult {
        self.0.execute(cmd, session, argv)
    }

    fn go_parent(&self, session: &Session) -> Option<NodeId> {
        (session.node() == NodeId::from(BscNode::Trx)).then(|| BscNode::Network.into())
    }
}

// ============================================================================
// Typed navigation
// ============================================================================

#[test]
fn test_exit_walks_down_one_level_at_a_time() {
    let (mut vty, mut session) = config_session();
    run_all(&mut vty, &mut session, &["network", "bts 0", "trx 1"]);
    assert_eq!(session.node(), NodeId::from(BscNode::Trx));
    assert_eq!(session.context::<(u8, u8)>(), Some(&(0, 1)));

    let expected = [
        NodeId::from(BscNode::Bts),
        NodeId::from(BscNode::Network),
        NodeId::CONFIG,
        NodeId::ENABLE,
    ];
    for node in expected {
        run_all(&mut vty, &mut session, &["exit"]);
        assert_eq!(session.node(), node);
        assert!(!session.is_closing());
    }

    run_all(&mut vty, &mut session, &["exit"]);
    assert!(session.is_closing());
}

#[test]
fn test_commands_work_again_after_exit() {
    let (mut vty, mut session) = config_session();
    run_all(
        &mut vty,
        &mut session,
        &["network", "bts 2", "trx 0", "arfcn 100", "exit", "oml ip 10.0.0.2"],
    );

    let bts = &vty.handlers().bts[&2];
    assert_eq!(bts.oml_ip.as_deref(), Some("10.0.0.2"));
    assert_eq!(bts.trx[&0], Some(100));
}

#[test]
fn test_end_returns_to_enable_and_drops_context() {
    let (mut vty, mut session) = config_session();
    run_all(&mut vty, &mut session, &["network", "bts 0", "trx 0", "end"]);

    assert_eq!(session.node(), NodeId::ENABLE);
    assert!(session.context::<(u8, u8)>().is_none());
    assert!(session.parents().is_empty());

    // No-op below the configuration nodes
    vty.end(&mut session);
    assert_eq!(session.node(), NodeId::ENABLE);
    let mut view = Session::new(NodeId::VIEW);
    vty.end(&mut view);
    assert_eq!(view.node(), NodeId::VIEW);
}

#[test]
fn test_custom_ascent_hook() {
    let mut vty: Interpreter<'static, FlatHandlers> =
        Interpreter::new(registry(), FlatHandlers::default());
    let mut session = Session::new(NodeId::CONFIG);
    for line in ["network", "bts 0", "trx 0"] {
        vty.execute(&mut session, line).unwrap();
    }

    assert_eq!(vty.go_parent(&mut session), NodeId::from(BscNode::Network));
    // Registered parent for everything else
    session.enter(BscNode::Bts, 0u8);
    assert_eq!(vty.go_parent(&mut session), NodeId::from(BscNode::Network));
}

// ============================================================================
// Ascent rules
// ============================================================================

#[test]
fn test_canonical_nodes_ascend_to_themselves() {
    let vty = interpreter();

    for node in [NodeId::AUTH, NodeId::VIEW, NodeId::ENABLE, NodeId::CONFIG] {
        let mut session = Session::new(node);
        session.push_parent(ParentFrame {
            node,
            context: None,
            indent: Some(String::new()),
        });
        session.set_indent(Some(" ".into()));
        assert_eq!(vty.go_parent(&mut session), node);
        assert_eq!(session.indent(), Some(""));
        assert!(session.parents().is_empty(), "frames left at {node}");
        assert_eq!(vty.go_parent(&mut session), node);
    }

    let mut session = Session::new(NodeId::AUTH_ENABLE);
    assert_eq!(vty.go_parent(&mut session), NodeId::VIEW);

    let mut session = Session::new(NodeId::VTY);
    assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
}

#[test]
fn test_every_node_reaches_a_canonical_node() {
    let vty = interpreter();

    for node in registry().nodes() {
        let mut session = Session::new(node.id());
        let mut steps = 0;
        while !session.node().is_canonical() {
            vty.go_parent(&mut session);
            steps += 1;
            assert!(steps <= 8, "{} does not converge", node.id());
        }
    }

    // Unregistered application nodes fall back to the config node
    let mut session = Session::new(NodeId::app(40));
    assert_eq!(vty.go_parent(&mut session), NodeId::CONFIG);
}

#[test]
fn test_ascent_restores_parent_frame() {
    let vty = interpreter();
    let mut session = Session::new(NodeId::from(BscNode::Bts));
    session.set_context(Some(Rc::new(7u8)));
    session.set_indent(Some(" ".into()));

    session.push_parent(ParentFrame {
        node: session.node(),
        context: session.context_handle().cloned(),
        indent: session.indent().map(str::to_string),
    });
    session.enter(BscNode::Trx, (7u8, 0u8));
    session.set_indent(Some("  ".into()));

    assert_eq!(vty.go_parent(&mut session), NodeId::from(BscNode::Bts));
    assert_eq!(session.context::<u8>(), Some(&7));
    assert_eq!(session.indent(), Some(" "));
    assert!(session.parents().is_empty());
}

#[test]
fn test_epoch_tracks_stack_changes() {
    let mut session = Session::new(NodeId::CONFIG);
    let start = session.parent_epoch();

    assert!(!session.pop_parent());
    assert_eq!(session.parent_epoch(), start);

    session.push_parent(ParentFrame {
        node: NodeId::CONFIG,
        context: None,
        indent: Some(String::new()),
    });
    let pushed = session.parent_epoch();
    assert_ne!(pushed, start);

    assert!(session.pop_parent());
    assert_ne!(session.parent_epoch(), pushed);
}

// ============================================================================
// Prompts
// ============================================================================

#[test]
fn test_prompts_follow_node_and_hostname() {
    let mut vty = interpreter();
    let mut session = Session::new(NodeId::VIEW);
    assert_eq!(vty.prompt(&session), "OsmoBSC> ");

    let host = Host {
        name: Some("bsc-1".into()),
        ..Host::new()
    };
    vty = vty.with_host(host);
    assert_eq!(vty.prompt(&session), "bsc-1> ");

    session.set_node(NodeId::ENABLE);
    assert_eq!(vty.prompt(&session), "bsc-1# ");

    session.set_node(NodeId::CONFIG);
    run_all(&mut vty, &mut session, &["network", "bts 0", "trx 0"]);
    assert_eq!(vty.prompt(&session), "bsc-1(config-net-bts-trx)# ");

    run_all(&mut vty, &mut session, &["end", "configure terminal", "hostname gsm"]);
    assert_eq!(vty.prompt(&session), "gsm(config)# ");

    session.set_node(NodeId::AUTH);
    assert_eq!(vty.prompt(&session), "Password: ");
}

//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

use std::sync::OnceLock;

pub use fixtures::{BscHandlers, MockIo, bsc_registry};
use nut_vty::{Host, Interpreter, NodeId, Registry, Session, Shell};

pub use fixtures::*;

// ============================================================================
// Interpreter Helpers
// ============================================================================

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Shared BSC registry (built once, read-only afterwards).
///
/// Also routes `log` output through the test harness (`RUST_LOG=debug`).
pub fn registry() -> &'static Registry {
    let _ = env_logger::builder().is_test(true).try_init();
    REGISTRY.get_or_init(bsc_registry)
}

/// Interpreter over the BSC registry with default host settings.
pub fn interpreter() -> Interpreter<'static, BscHandlers> {
    Interpreter::new(registry(), BscHandlers::default())
}

/// Interpreter plus a session at the global config node.
pub fn config_session() -> (Interpreter<'static, BscHandlers>, Session) {
    (interpreter(), Session::new(NodeId::CONFIG))
}

/// Run lines one after another, panicking on the first failure.
pub fn run_all(vty: &mut Interpreter<'static, BscHandlers>, session: &mut Session, lines: &[&str]) {
    for line in lines {
        if let Err(e) = vty.execute(session, line) {
            panic!("'{line}' failed: {e}");
        }
    }
}

/// Running configuration as `write terminal` prints it.
pub fn running_config(vty: &Interpreter<'static, BscHandlers>) -> String {
    let mut out = String::new();
    vty.render_running_config(&mut out).unwrap();
    out
}

// ============================================================================
// Shell Creation Helpers
// ============================================================================

/// Create an active shell, with the startup output discarded.
pub fn create_test_shell(host: Host) -> Shell<'static, MockIo, BscHandlers> {
    let vty = interpreter().with_host(host);
    let mut shell = Shell::new(vty, MockIo::new());
    shell.activate().unwrap();
    shell.__test_io_mut().clear_output();
    shell
}

/// Feed characters to the shell.
pub fn type_input(shell: &mut Shell<'static, MockIo, BscHandlers>, input: &str) {
    shell.__test_io_mut().push_input(input);
    while !shell.__test_io().input_empty() {
        shell.poll().unwrap();
    }
}

/// Execute a command line and return the output.
pub fn execute_command(shell: &mut Shell<'static, MockIo, BscHandlers>, cmd: &str) -> String {
    shell.__test_io_mut().clear_output();
    type_input(shell, cmd);
    type_input(shell, "\r");
    shell.__test_io().output()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for exp in expected {
        assert!(
            output.contains(exp),
            "Expected '{}' in output, got: {:?}",
            exp,
            output
        );
    }
}

/// Assert that output contains none of the strings.
pub fn assert_contains_none(output: &str, unexpected: &[&str]) {
    for unexp in unexpected {
        assert!(
            !output.contains(unexp),
            "Did not expect '{}' in output, got: {:?}",
            unexp,
            output
        );
    }
}

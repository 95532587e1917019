//! Integration tests for nut-vty.
//!
//! Each file also builds as its own test target; the shared BSC fixture
//! lives in `fixtures/` and is pulled in through `helpers.rs`.

mod test_node_state;

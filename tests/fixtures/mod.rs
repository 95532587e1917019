//! Test fixtures and utilities for nut-vty testing.
//!
//! Provides:
//! - `MockIo`: Test implementation of CharIo trait
//! - `BscNode`: Application nodes of a small base station controller
//! - `BscHandlers`: Handlers keeping the BSC's running configuration
//! - `bsc_registry()`: Registry with the standard and the BSC commands

#![allow(dead_code)]

use core::fmt::Write;
use std::collections::{BTreeMap, VecDeque};

use nut_vty::shell::builtins::{install_standard, vty_install_default};
use nut_vty::tree::VtyNode;
use nut_vty::{
    AppInfo, CharIo, CmdError, CmdResult, CmdStatus, CommandHandlers, CommandSpec, NodeDef,
    NodeId, Registry, Session,
};

// ============================================================================
// MockIo - Test I/O Implementation
// ============================================================================

/// Mock I/O for testing.
///
/// Provides in-memory character I/O with input queue and output capture.
#[derive(Debug)]
pub struct MockIo {
    /// Input queue (simulates user typing)
    input: VecDeque<char>,

    /// Output capture (collects all output)
    output: Vec<char>,
}

impl MockIo {
    /// Create new MockIo with empty buffers.
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    /// Create MockIo with pre-loaded input string.
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            output: Vec::new(),
        }
    }

    /// Add input to queue (simulates user typing).
    pub fn push_input(&mut self, s: &str) {
        self.input.extend(s.chars());
    }

    /// Get captured output as string.
    pub fn output(&self) -> String {
        self.output.iter().collect()
    }

    /// Clear output buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Check if input queue is empty.
    pub fn input_empty(&self) -> bool {
        self.input.is_empty()
    }
}

impl Default for MockIo {
    fn default() -> Self {
        Self::new()
    }
}

impl CharIo for MockIo {
    type Error = ();

    fn get_char(&mut self) -> Result<Option<char>, Self::Error> {
        Ok(self.input.pop_front())
    }

    fn put_char(&mut self, c: char) -> Result<(), Self::Error> {
        self.output.push(c);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.output.extend(s.chars());
        Ok(())
    }
}

// ============================================================================
// BSC nodes and commands
// ============================================================================

/// Application nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, nut_vty::VtyNode)]
pub enum BscNode {
    /// `network`
    Network = 0,
    /// `bts N` below `network`
    Bts = 1,
    /// `trx N` below `bts N`
    Trx = 2,
}

pub const APP: AppInfo = AppInfo::new("OsmoBSC", "1.2.3").with_copyright("Copyright (C) test authors");

pub static NETWORK: CommandSpec =
    CommandSpec::new("cfg_net", "network", "Configure the GSM network\n");
pub static SHORT_NAME: CommandSpec = CommandSpec::new(
    "cfg_net_short_name",
    "short name NAME",
    "Set the short GSM network name\nShort name\nName to use\n",
);
pub static NCC: CommandSpec = CommandSpec::new(
    "cfg_net_ncc",
    "network country code <1-999>",
    "Network\nCountry\nCode\nMCC\n",
);
pub static BTS: CommandSpec = CommandSpec::new("cfg_bts", "bts <0-255>", "Select a BTS\nBTS number\n");
pub static DESCRIPTION: CommandSpec = CommandSpec::new(
    "cfg_bts_description",
    "description .TEXT",
    "Save human-readable description\nText until the end of the line\n",
);
pub static OML_IP: CommandSpec = CommandSpec::new(
    "cfg_bts_oml_ip",
    "oml ip A.B.C.D",
    "Organization & Maintenance Link\nIP address\nRemote address\n",
);
pub static ROUTE: CommandSpec = CommandSpec::new(
    "cfg_bts_route",
    "ip route A.B.C.D/M",
    "IP\nStatic route\nPrefix\n",
);
pub static IPV6: CommandSpec = CommandSpec::new(
    "cfg_bts_ipv6",
    "ipv6 address X:X::X:X/M",
    "IPv6\nAddress\nPrefix\n",
);
pub static NEIGHBOR: CommandSpec = CommandSpec::new(
    "cfg_bts_neighbor",
    "neighbor (add|del) <0-255>",
    "Neighbor list\nAdd a neighbor\nRemove a neighbor\nBTS number\n",
);
pub static TRX: CommandSpec = CommandSpec::new("cfg_trx", "trx <0-7>", "Select a TRX\nTRX number\n");
pub static ARFCN: CommandSpec = CommandSpec::new(
    "cfg_trx_arfcn",
    "arfcn <0-1023>",
    "Set the ARFCN\nAbsolute Radio Frequency Channel Number\n",
);
pub static SHOW_BTS: CommandSpec = CommandSpec::new(
    "show_bts",
    "show bts [<0-255>]",
    "Show running system information\nDisplay information about a BTS\nBTS number\n",
);
pub static SHOW_NETWORK: CommandSpec = CommandSpec::new(
    "show_net",
    "show network",
    "Show running system information\nDisplay information about the network\n",
);
pub static SHUTDOWN: CommandSpec =
    CommandSpec::new("shutdown", "shutdown", "Stop the BSC\n").hidden();
pub static MSC: CommandSpec =
    CommandSpec::new("cfg_msc", "msc", "Configure the MSC link\n").for_daemons(0x2);

/// Per-BTS configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bts {
    pub description: Option<String>,
    pub oml_ip: Option<String>,
    pub neighbors: Vec<u8>,
    pub trx: BTreeMap<u8, Option<u16>>,
}

/// Running configuration of the BSC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BscHandlers {
    pub short_name: Option<String>,
    pub country_code: Option<u16>,
    pub bts: BTreeMap<u8, Bts>,
    /// `id argv...` of every executed command
    pub calls: Vec<String>,
}

fn parse<T: core::str::FromStr>(word: &str) -> Result<T, CmdError> {
    word.parse().map_err(|_| CmdError::NoMatch)
}

/// BTS selected at the session's node.
///
/// Typed `exit` from a TRX keeps the TRX context, so both shapes count.
fn bts_nr(session: &Session) -> Option<u8> {
    session
        .context::<u8>()
        .copied()
        .or_else(|| session.context::<(u8, u8)>().map(|(bts, _)| *bts))
}

impl BscHandlers {
    fn bts_mut(&mut self, session: &Session) -> Result<&mut Bts, CmdError> {
        let nr = bts_nr(session).ok_or_else(|| CmdError::Fatal("no BTS selected".into()))?;
        self.bts
            .get_mut(&nr)
            .ok_or_else(|| CmdError::Fatal("BTS vanished".into()))
    }
}

impl CommandHandlers for BscHandlers {
    fn execute(&mut self, cmd: &CommandSpec, session: &mut Session, argv: &[&str]) -> CmdResult {
        self.calls.push(format!("{} {}", cmd.id, argv.join(" ")).trim_end().to_string());

        match cmd.id {
            "cfg_net" => session.set_node(BscNode::Network),
            "cfg_net_short_name" => self.short_name = Some(argv[0].to_string()),
            "cfg_net_ncc" => self.country_code = Some(parse(argv[0])?),
            "cfg_bts" => {
                let nr: u8 = parse(argv[0])?;
                self.bts.entry(nr).or_default();
                session.enter(BscNode::Bts, nr);
            }
            "cfg_bts_description" => self.bts_mut(session)?.description = Some(argv.join(" ")),
            "cfg_bts_oml_ip" => self.bts_mut(session)?.oml_ip = Some(argv[0].to_string()),
            "cfg_bts_route" | "cfg_bts_ipv6" => {}
            "cfg_bts_neighbor" => {
                let nr: u8 = parse(argv[1])?;
                let bts = self.bts_mut(session)?;
                if "add".starts_with(argv[0]) {
                    bts.neighbors.push(nr);
                } else {
                    bts.neighbors.retain(|n| *n != nr);
                }
            }
            "cfg_trx" => {
                let bts = bts_nr(session).ok_or(CmdError::NoMatch)?;
                let nr: u8 = parse(argv[0])?;
                self.bts_mut(session)?.trx.entry(nr).or_default();
                session.enter(BscNode::Trx, (bts, nr));
            }
            "cfg_trx_arfcn" => {
                let (bts_nr, trx_nr) = *session
                    .context::<(u8, u8)>()
                    .ok_or_else(|| CmdError::Fatal("no TRX selected".into()))?;
                let arfcn: u16 = parse(argv[0])?;
                if let Some(trx) = self.bts.get_mut(&bts_nr).and_then(|b| b.trx.get_mut(&trx_nr)) {
                    *trx = Some(arfcn);
                }
            }
            "show_bts" => {
                for (nr, bts) in &self.bts {
                    if argv.first().is_some_and(|a| *a != nr.to_string()) {
                        continue;
                    }
                    writeln!(session, "BTS {nr}: {} TRX", bts.trx.len())?;
                }
            }
            "show_net" => {
                writeln!(session, "Network: {}", self.short_name.as_deref().unwrap_or("-"))?;
            }
            "shutdown" => return Err(CmdError::Fatal("shutdown requested".into())),
            _ => return Err(CmdError::NoMatch),
        }
        Ok(CmdStatus::Success)
    }

    fn write_config(&self, node: NodeId, out: &mut dyn Write) -> bool {
        if node != NodeId::from(BscNode::Network) {
            return false;
        }
        let _ = self.dump_network(out);
        true
    }

    fn config_is_consistent(&self, _session: &Session) -> bool {
        self.bts.values().all(|b| b.trx.values().all(Option::is_some))
    }
}

impl BscHandlers {
    fn dump_network(&self, out: &mut dyn Write) -> core::fmt::Result {
        writeln!(out, "network")?;
        if let Some(name) = &self.short_name {
            writeln!(out, " short name {name}")?;
        }
        if let Some(code) = self.country_code {
            writeln!(out, " network country code {code}")?;
        }
        for (nr, bts) in &self.bts {
            writeln!(out, " bts {nr}")?;
            if let Some(description) = &bts.description {
                writeln!(out, "  description {description}")?;
            }
            if let Some(ip) = &bts.oml_ip {
                writeln!(out, "  oml ip {ip}")?;
            }
            for neighbor in &bts.neighbors {
                writeln!(out, "  neighbor add {neighbor}")?;
            }
            for (trx_nr, arfcn) in &bts.trx {
                writeln!(out, "  trx {trx_nr}")?;
                if let Some(arfcn) = arfcn {
                    writeln!(out, "   arfcn {arfcn}")?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Registry with the standard command set plus the BSC nodes.
pub fn bsc_registry() -> Registry {
    let mut reg = Registry::new(APP);
    install_standard(&mut reg, true).unwrap();

    reg.install_node(
        NodeDef::new(BscNode::Network.node_id(), "%s(config-net)# ")
            .named("net")
            .writes_config(),
    )
    .unwrap();
    reg.install_node(
        NodeDef::new(BscNode::Bts.node_id(), "%s(config-net-bts)# ")
            .child_of(BscNode::Network.node_id()),
    )
    .unwrap();
    reg.install_node(
        NodeDef::new(BscNode::Trx.node_id(), "%s(config-net-bts-trx)# ")
            .child_of(BscNode::Bts.node_id()),
    )
    .unwrap();

    reg.install_element(NodeId::CONFIG, &NETWORK).unwrap();
    reg.install_element(NodeId::CONFIG, &MSC).unwrap();
    reg.install_element(NodeId::ENABLE, &SHUTDOWN).unwrap();
    reg.install_element_ve(&SHOW_BTS).unwrap();
    reg.install_element_ve(&SHOW_NETWORK).unwrap();

    vty_install_default(&mut reg, BscNode::Network).unwrap();
    reg.install_element(BscNode::Network, &SHORT_NAME).unwrap();
    reg.install_element(BscNode::Network, &NCC).unwrap();
    reg.install_element(BscNode::Network, &BTS).unwrap();

    vty_install_default(&mut reg, BscNode::Bts).unwrap();
    for spec in [&DESCRIPTION, &OML_IP, &ROUTE, &IPV6, &NEIGHBOR, &TRX] {
        reg.install_element(BscNode::Bts, spec).unwrap();
    }

    vty_install_default(&mut reg, BscNode::Trx).unwrap();
    reg.install_element(BscNode::Trx, &ARFCN).unwrap();

    reg
}

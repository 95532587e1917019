//! Built-in commands.
//!
//! Canonical nodes and the standard command set every VTY carries: mode
//! changes, `write`/`show running-config`, host settings and terminal
//! parameters. Builtins are plain [`CommandSpec`]s marked as library owned;
//! the interpreter routes them here instead of to the application handlers.

use core::fmt::Write;
use std::path::PathBuf;

use log::{debug, warn};

use super::handlers::CommandHandlers;
use super::interpreter::Interpreter;
use super::session::Session;
use crate::config::ShellConfig;
use crate::error::{CmdError, PersistError, RegistryError};
use crate::host::{Motd, Secret};
use crate::logging::{self, LogFile, LoggingSettings, Severity};
use crate::response::{CmdResult, CmdStatus};
use crate::tree::{CommandSpec, NodeDef, NodeId, Registry, argv_concat};

/// Text printed by `help`.
pub const HELP_TEXT: &str = "\
This VTY provides advanced help features.  When you need help,
anytime at the command line please press '?'.

If nothing matches, the help list will be empty and you must backup
 until entering a '?' shows the available options.
Two styles of help are provided:
1. Full help is available when you are ready to enter a
command argument (e.g. 'show ?') and describes each possible
argument.
2. Partial help is provided when an abbreviated argument is entered
   and you want to know what arguments match the input
   (e.g. 'show me?'.)

";

// ============================================================================
// Command metadata
// ============================================================================

macro_rules! builtin {
    ($name:ident, $id:literal, $pattern:literal, $($doc:literal),+ $(,)?) => {
        static $name: CommandSpec = CommandSpec::new($id, $pattern, concat!($($doc),+)).builtin();
    };
}

builtin!(
    SHOW_VERSION,
    "show_version",
    "show version",
    "Show running system information\n",
    "Displays program version\n",
);
builtin!(LIST, "config_list", "list", "Print command list\n");
builtin!(HELP, "config_help", "help", "Description of the interactive help system\n");
builtin!(EXIT, "config_exit", "exit", "Exit current mode and down to previous mode\n");
builtin!(END, "config_end", "end", "End current mode and change to enable mode.");
builtin!(ENABLE, "config_enable", "enable", "Turn on privileged mode command\n");
builtin!(DISABLE, "config_disable", "disable", "Turn off privileged mode command\n");
builtin!(
    CONFIGURE_TERMINAL,
    "config_terminal",
    "configure terminal",
    "Configuration from vty interface\n",
    "Configuration terminal\n",
);
builtin!(
    TERMINAL_LENGTH,
    "config_terminal_length",
    "terminal length <0-512>",
    "Set terminal line parameters\n",
    "Set number of lines on a screen\n",
    "Number of lines on screen (0 for no pausing)\n",
);
builtin!(
    TERMINAL_NO_LENGTH,
    "config_terminal_no_length",
    "terminal no length",
    "Set terminal line parameters\n",
    "Negate a command or set its defaults\n",
    "Set number of lines on a screen\n",
);
static ECHO: CommandSpec = CommandSpec::new(
    "echo",
    "echo .MESSAGE",
    "Echo a message back to the vty\nThe message to echo\n",
)
.builtin()
.hidden();

builtin!(
    WRITE_TERMINAL,
    "config_write_terminal",
    "write terminal",
    "Write running configuration to memory, network, or terminal\n",
    "Write to terminal\n",
);
builtin!(
    SHOW_RUNNING_CONFIG,
    "config_write_terminal",
    "show running-config",
    "Show running system information\n",
    "running configuration\n",
);
builtin!(
    WRITE_FILE,
    "config_write_file",
    "write file",
    "Write running configuration to memory, network, or terminal\n",
    "Write to configuration file\n",
);
builtin!(
    WRITE_MEMORY,
    "config_write_file",
    "write memory",
    "Write running configuration to memory, network, or terminal\n",
    "Write configuration to the file (same as write file)\n",
);
builtin!(
    WRITE,
    "config_write_file",
    "write",
    "Write running configuration to memory, network, or terminal\n",
);
builtin!(
    COPY_RUNNING_CONFIG,
    "config_write_file",
    "copy running-config startup-config",
    "Copy configuration\n",
    "Copy running config to... \n",
    "Copy running config to startup config (same as write file)\n",
);
builtin!(
    SHOW_STARTUP_CONFIG,
    "show_startup_config",
    "show startup-config",
    "Show running system information\n",
    "Contents of startup configuration\n",
);

builtin!(
    HOSTNAME,
    "hostname",
    "hostname WORD",
    "Set system's network name\n",
    "This system's network name\n",
);
builtin!(
    NO_HOSTNAME,
    "no_hostname",
    "no hostname [HOSTNAME]",
    "Negate a command or set its defaults\n",
    "Reset system's network name\n",
    "Host name of this router\n",
);
builtin!(
    PASSWORD,
    "password",
    "password (8|) WORD",
    "Assign the terminal connection password\n",
    "Specifies a HIDDEN password will follow\n",
    "dummy string \n",
    "The HIDDEN line password string\n",
);
builtin!(
    PASSWORD_TEXT,
    "password",
    "password LINE",
    "Assign the terminal connection password\n",
    "The UNENCRYPTED (cleartext) line password\n",
);
builtin!(
    ENABLE_PASSWORD,
    "enable_password",
    "enable password (8|) WORD",
    "Modify enable password parameters\n",
    "Assign the privileged level password\n",
    "Specifies a HIDDEN password will follow\n",
    "dummy string \n",
    "The HIDDEN 'enable' password string\n",
);
builtin!(
    ENABLE_PASSWORD_TEXT,
    "enable_password",
    "enable password LINE",
    "Modify enable password parameters\n",
    "Assign the privileged level password\n",
    "The UNENCRYPTED (cleartext) 'enable' password\n",
);
builtin!(
    NO_ENABLE_PASSWORD,
    "no_enable_password",
    "no enable password",
    "Negate a command or set its defaults\n",
    "Modify enable password parameters\n",
    "Assign the privileged level password\n",
);
#[cfg(feature = "authentication")]
builtin!(
    SERVICE_PASSWORD_ENCRYPTION,
    "service_password_encryption",
    "service password-encryption",
    "Set up miscellaneous service\n",
    "Enable encrypted passwords\n",
);
#[cfg(feature = "authentication")]
builtin!(
    NO_SERVICE_PASSWORD_ENCRYPTION,
    "no_service_password_encryption",
    "no service password-encryption",
    "Negate a command or set its defaults\n",
    "Set up miscellaneous service\n",
    "Enable encrypted passwords\n",
);
builtin!(
    BANNER_MOTD_DEFAULT,
    "banner_motd_default",
    "banner motd default",
    "Set banner string\n",
    "Strings for motd\n",
    "Default string\n",
);
builtin!(
    BANNER_MOTD_FILE,
    "banner_motd_file",
    "banner motd file [FILE]",
    "Set banner\n",
    "Banner for motd\n",
    "Banner from a file\n",
    "Filename\n",
);
builtin!(
    NO_BANNER_MOTD,
    "no_banner_motd",
    "no banner motd",
    "Negate a command or set its defaults\n",
    "Set banner string\n",
    "Strings for motd\n",
);
builtin!(
    SERVICE_TERMINAL_LENGTH,
    "service_terminal_length",
    "service terminal-length <0-512>",
    "Set up miscellaneous service\n",
    "System wide terminal length configuration\n",
    "Number of lines of VTY (0 means no line control)\n",
);
builtin!(
    NO_SERVICE_TERMINAL_LENGTH,
    "no_service_terminal_length",
    "no service terminal-length [<0-512>]",
    "Negate a command or set its defaults\n",
    "Set up miscellaneous service\n",
    "System wide terminal length configuration\n",
    "Number of lines of VTY (0 means no line control)\n",
);

macro_rules! log_levels {
    () => {
        "(emergencies|alerts|critical|errors|warnings|notifications|informational|debugging)"
    };
}

macro_rules! level_desc {
    () => {
        concat!(
            "System is unusable\n",
            "Immediate action needed\n",
            "Critical conditions\n",
            "Error conditions\n",
            "Warning conditions\n",
            "Normal but significant conditions\n",
            "Informational messages\n",
            "Debugging messages\n",
        )
    };
}

builtin!(
    SHOW_LOGGING,
    "show_logging",
    "show logging",
    "Show running system information\n",
    "Show current logging configuration\n",
);
static LOGMSG: CommandSpec = CommandSpec::new(
    "logmsg",
    concat!("logmsg ", log_levels!(), " .MESSAGE"),
    concat!(
        "Send a message to enabled logging destinations\n",
        level_desc!(),
        "The message to send\n",
    ),
)
.builtin();
builtin!(
    LOG_STDOUT,
    "log_stdout",
    "log stdout",
    "Logging control\n",
    "Set stdout logging level\n",
);
static LOG_STDOUT_LEVEL: CommandSpec = CommandSpec::new(
    "log_stdout",
    concat!("log stdout ", log_levels!()),
    concat!("Logging control\n", "Set stdout logging level\n", level_desc!()),
)
.builtin();
builtin!(
    NO_LOG_STDOUT,
    "no_log_stdout",
    "no log stdout [LEVEL]",
    "Negate a command or set its defaults\n",
    "Logging control\n",
    "Cancel logging to stdout\n",
    "Logging level\n",
);
builtin!(
    LOG_FILE,
    "log_file",
    "log file FILENAME",
    "Logging control\n",
    "Logging to file\n",
    "Logging filename\n",
);
static LOG_FILE_LEVEL: CommandSpec = CommandSpec::new(
    "log_file",
    concat!("log file FILENAME ", log_levels!()),
    concat!(
        "Logging control\n",
        "Logging to file\n",
        "Logging filename\n",
        level_desc!(),
    ),
)
.builtin();
builtin!(
    NO_LOG_FILE,
    "no_log_file",
    "no log file [FILENAME]",
    "Negate a command or set its defaults\n",
    "Logging control\n",
    "Cancel logging to file\n",
    "Logging file name\n",
);
builtin!(
    NO_LOG_FILE_LEVEL,
    "no_log_file",
    "no log file FILENAME LEVEL",
    "Negate a command or set its defaults\n",
    "Logging control\n",
    "Cancel logging to file\n",
    "Logging file name\n",
    "Logging level\n",
);
static LOG_TRAP: CommandSpec = CommandSpec::new(
    "log_trap",
    concat!("log trap ", log_levels!()),
    concat!(
        "Logging control\n",
        "(Deprecated) Set logging level and default for all destinations\n",
        level_desc!(),
    ),
)
.builtin()
.deprecated();
static NO_LOG_TRAP: CommandSpec = CommandSpec::new(
    "no_log_trap",
    "no log trap [LEVEL]",
    "Negate a command or set its defaults\nLogging control\nPermit all logging information\nLogging level\n",
)
.builtin()
.deprecated();
builtin!(
    LOG_RECORD_PRIORITY,
    "log_record_priority",
    "log record-priority",
    "Logging control\n",
    "Log the priority of the message within the message\n",
);
builtin!(
    NO_LOG_RECORD_PRIORITY,
    "no_log_record_priority",
    "no log record-priority",
    "Negate a command or set its defaults\n",
    "Logging control\n",
    "Do not log the priority of the message within the message\n",
);

// ============================================================================
// Installation
// ============================================================================

/// Install the canonical nodes and the standard command set.
///
/// # Arguments
///
/// * `registry` - Registry without canonical nodes yet
/// * `terminal` - Whether sessions are interactive terminals. Without it only
///   `show version`, `show startup-config` and `hostname` are installed.
pub fn install_standard(registry: &mut Registry, terminal: bool) -> Result<(), RegistryError> {
    registry.install_node(NodeDef::new(NodeId::AUTH, "Password: ").named("auth"))?;
    registry.install_node(NodeDef::new(NodeId::VIEW, "%s> ").named("view"))?;
    registry.install_node(NodeDef::new(NodeId::AUTH_ENABLE, "Password: ").named("auth-enable"))?;
    registry.install_node(NodeDef::new(NodeId::ENABLE, "%s# ").named("enable"))?;
    registry.install_node(
        NodeDef::new(NodeId::CONFIG, "%s(config)# ")
            .named("config")
            .writes_config()
            .top_level(),
    )?;

    registry.install_element(NodeId::VIEW, &SHOW_VERSION)?;
    if terminal {
        for spec in [
            &LIST,
            &EXIT,
            &HELP,
            &ENABLE,
            &TERMINAL_LENGTH,
            &TERMINAL_NO_LENGTH,
            &ECHO,
        ] {
            registry.install_element(NodeId::VIEW, spec)?;
        }
        registry.install_element(NodeId::VIEW, &SHOW_LOGGING)?;

        vty_install_default(registry, NodeId::ENABLE)?;
        registry.install_element(NodeId::ENABLE, &DISABLE)?;
        registry.install_element(NodeId::ENABLE, &CONFIGURE_TERMINAL)?;
        registry.install_element(NodeId::ENABLE, &COPY_RUNNING_CONFIG)?;
    }
    registry.install_element(NodeId::ENABLE, &SHOW_STARTUP_CONFIG)?;
    registry.install_element(NodeId::ENABLE, &SHOW_VERSION)?;

    if terminal {
        registry.install_element(NodeId::ENABLE, &TERMINAL_LENGTH)?;
        registry.install_element(NodeId::ENABLE, &TERMINAL_NO_LENGTH)?;
        registry.install_element(NodeId::ENABLE, &ECHO)?;
        registry.install_element(NodeId::ENABLE, &SHOW_LOGGING)?;
        registry.install_element(NodeId::ENABLE, &LOGMSG)?;

        vty_install_default(registry, NodeId::CONFIG)?;
    }

    registry.install_element(NodeId::CONFIG, &HOSTNAME)?;
    registry.install_element(NodeId::CONFIG, &NO_HOSTNAME)?;

    if terminal {
        for spec in [
            &PASSWORD,
            &PASSWORD_TEXT,
            &ENABLE_PASSWORD,
            &ENABLE_PASSWORD_TEXT,
            &NO_ENABLE_PASSWORD,
        ] {
            registry.install_element(NodeId::CONFIG, spec)?;
        }

        #[cfg(feature = "authentication")]
        {
            registry.install_element(NodeId::CONFIG, &SERVICE_PASSWORD_ENCRYPTION)?;
            registry.install_element(NodeId::CONFIG, &NO_SERVICE_PASSWORD_ENCRYPTION)?;
        }

        for spec in [
            &BANNER_MOTD_DEFAULT,
            &BANNER_MOTD_FILE,
            &NO_BANNER_MOTD,
            &SERVICE_TERMINAL_LENGTH,
            &NO_SERVICE_TERMINAL_LENGTH,
            &LOGMSG,
            &LOG_STDOUT,
            &LOG_STDOUT_LEVEL,
            &NO_LOG_STDOUT,
            &LOG_FILE,
            &LOG_FILE_LEVEL,
            &NO_LOG_FILE,
            &NO_LOG_FILE_LEVEL,
            &LOG_TRAP,
            &NO_LOG_TRAP,
            &LOG_RECORD_PRIORITY,
            &NO_LOG_RECORD_PRIORITY,
        ] {
            registry.install_element(NodeId::CONFIG, spec)?;
        }
    }

    debug!("standard command set installed (terminal: {})", terminal);
    Ok(())
}

/// Install the commands available at every configuration level: `help`,
/// `list`, the `write` family and `show running-config`.
pub fn install_default(registry: &mut Registry, node: impl Into<NodeId>) -> Result<(), RegistryError> {
    let node = node.into();
    for spec in [
        &HELP,
        &LIST,
        &WRITE_TERMINAL,
        &WRITE_FILE,
        &WRITE_MEMORY,
        &WRITE,
        &SHOW_RUNNING_CONFIG,
    ] {
        registry.install_element(node, spec)?;
    }
    Ok(())
}

/// [`install_default`] plus `exit`, and `end` at configuration nodes.
pub fn vty_install_default(
    registry: &mut Registry,
    node: impl Into<NodeId>,
) -> Result<(), RegistryError> {
    let node = node.into();
    install_default(registry, node)?;
    registry.install_element(node, &EXIT)?;
    if node >= NodeId::CONFIG {
        registry.install_element(node, &END)?;
    }
    Ok(())
}

// ============================================================================
// Execution
// ============================================================================

/// Run a builtin by ID.
pub(crate) fn execute<H, C>(
    vty: &mut Interpreter<'_, H, C>,
    session: &mut Session,
    id: &str,
    argv: &[&str],
) -> CmdResult
where
    H: CommandHandlers,
    C: ShellConfig,
{
    match id {
        "show_version" => {
            let app = vty.registry().app();
            writeln!(session, "{} {} ({}).", app.name, app.version, app.name)?;
            if let Some(copyright) = app.copyright {
                writeln!(session, "{copyright}")?;
            }
        }
        "config_list" => {
            for pattern in vty.registry().list(session.node()) {
                writeln!(session, "  {pattern}")?;
            }
        }
        "config_help" => session.write_str(HELP_TEXT)?,
        "echo" => writeln!(session, "{}", argv_concat(argv, 0))?,

        // Mode changes
        "config_exit" => exit(vty, session),
        "config_end" => vty.end(session),
        "config_enable" => {
            if vty.host().requires_enable_password() {
                session.set_node(NodeId::AUTH_ENABLE);
            } else {
                session.set_node(NodeId::ENABLE);
            }
        }
        "config_disable" => {
            if session.node() == NodeId::ENABLE {
                session.set_node(NodeId::VIEW);
            }
        }
        "config_terminal" => session.set_node(NodeId::CONFIG),

        // Terminal
        "config_terminal_length" => session.set_lines(Some(parse_lines(argv)?)),
        "config_terminal_no_length" => session.set_lines(None),
        "service_terminal_length" => vty.host_mut().lines = Some(parse_lines(argv)?),
        "no_service_terminal_length" => vty.host_mut().lines = None,

        // Configuration output
        "config_write_terminal" => vty.render_running_config(session)?,
        "config_write_file" => return write_file(vty, session),
        "show_startup_config" => return show_startup_config(vty, session),

        // Host settings
        "hostname" => {
            let name = argv.first().copied().unwrap_or_default();
            if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
                writeln!(session, "Please specify string starting with alphabet")?;
                return Ok(CmdStatus::Warning);
            }
            vty.host_mut().name = Some(name.to_string());
        }
        "no_hostname" => vty.host_mut().name = None,
        "password" => {
            return match read_secret(vty, session, argv)? {
                Some(secret) => {
                    vty.host_mut().password = Some(secret);
                    Ok(CmdStatus::Success)
                }
                None => Ok(CmdStatus::Warning),
            };
        }
        "enable_password" => {
            return match read_secret(vty, session, argv)? {
                Some(secret) => {
                    vty.host_mut().enable = Some(secret);
                    Ok(CmdStatus::Success)
                }
                None => Ok(CmdStatus::Warning),
            };
        }
        "no_enable_password" => vty.host_mut().enable = None,
        "service_password_encryption" => {
            if let Err(e) = vty.host_mut().enable_encryption() {
                writeln!(session, "% {e}")?;
                return Ok(CmdStatus::Warning);
            }
        }
        "no_service_password_encryption" => vty.host_mut().disable_encryption(),
        "banner_motd_default" => vty.host_mut().motd = Motd::Default,
        "banner_motd_file" => {
            vty.host_mut().motd = match argv.first() {
                Some(file) => Motd::File(file.into()),
                None => Motd::Default,
            };
        }
        "no_banner_motd" => vty.host_mut().motd = Motd::None,

        // Logging
        "show_logging" => {
            let protocol = vty.registry().app().name;
            vty.host().logging.write_status(session, protocol)?;
        }
        "logmsg" => {
            let severity = parse_severity(argv.first())?;
            log::log!(severity.level(), "{}", argv_concat(argv, 1));
        }
        "log_stdout" => {
            let level = match argv.first() {
                Some(word) => parse_severity(Some(word))?,
                None => vty.host().logging.default_level,
            };
            return set_logging(vty, session, |l| l.stdout = Some(level));
        }
        "no_log_stdout" => return set_logging(vty, session, |l| l.stdout = None),
        "log_file" => {
            let level = match argv.get(1) {
                Some(word) => parse_severity(Some(word))?,
                None => vty.host().logging.default_level,
            };
            let path = PathBuf::from(argv.first().copied().unwrap_or_default());
            return set_logging(vty, session, |l| l.file = Some(LogFile { path, level }));
        }
        "no_log_file" => return set_logging(vty, session, |l| l.file = None),
        "log_trap" => {
            let level = parse_severity(argv.first())?;
            return set_logging(vty, session, |l| l.set_default_level(level));
        }
        "no_log_trap" => {
            return set_logging(vty, session, |l| l.default_level = Severity::Debugging);
        }
        "log_record_priority" => return set_logging(vty, session, |l| l.record_priority = true),
        "no_log_record_priority" => {
            return set_logging(vty, session, |l| l.record_priority = false);
        }

        _ => {
            warn!("unknown builtin '{}'", id);
            return Err(CmdError::NoMatch);
        }
    }
    Ok(CmdStatus::Success)
}

/// `exit`: close the session at the root nodes, otherwise step down a level.
pub(crate) fn exit<H, C>(vty: &Interpreter<'_, H, C>, session: &mut Session)
where
    H: CommandHandlers,
    C: ShellConfig,
{
    match session.node() {
        NodeId::AUTH | NodeId::VIEW | NodeId::ENABLE => session.close(),
        NodeId::CONFIG => session.set_node(NodeId::ENABLE),
        node if node > NodeId::CONFIG => {
            vty.go_parent(session);
        }
        _ => {}
    }
}

fn parse_lines(argv: &[&str]) -> Result<u32, CmdError> {
    argv.first()
        .and_then(|s| s.parse().ok())
        .ok_or(CmdError::NoMatch)
}

fn parse_severity(word: Option<&&str>) -> Result<Severity, CmdError> {
    word.ok_or(CmdError::NoMatch)?.parse()
}

/// Edit the host's log settings and hand them to the process logger.
///
/// A log file that cannot be opened leaves everything as it was.
fn set_logging<H, C>(
    vty: &mut Interpreter<'_, H, C>,
    session: &mut Session,
    edit: impl FnOnce(&mut LoggingSettings),
) -> CmdResult
where
    H: CommandHandlers,
    C: ShellConfig,
{
    let mut settings = vty.host().logging.clone();
    edit(&mut settings);

    if let Err(e) = logging::logger().apply(&settings) {
        let path = settings.file.as_ref().map(|f| f.path.display().to_string());
        debug!("log file {:?}: {}", path, e);
        writeln!(session, "can't open logfile {}", path.unwrap_or_default())?;
        return Ok(CmdStatus::Warning);
    }
    vty.host_mut().logging = settings;
    Ok(CmdStatus::Success)
}

/// Password from `password ...` / `enable password ...` arguments.
///
/// `None` after printing why the password was refused.
fn read_secret<H, C>(
    vty: &Interpreter<'_, H, C>,
    session: &mut Session,
    argv: &[&str],
) -> Result<Option<Secret>, CmdError>
where
    H: CommandHandlers,
    C: ShellConfig,
{
    if let [kind, stored] = argv {
        if *kind == "8" {
            return Ok(Some(Secret::Encrypted(stored.to_string())));
        }
        writeln!(session, "Unknown encryption type.")?;
        return Ok(None);
    }

    let plain = argv.first().copied().unwrap_or_default();
    if !plain.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        writeln!(session, "Please specify string starting with alphanumeric")?;
        return Ok(None);
    }

    match vty.host().secret_from_plain(plain) {
        Ok(secret) => Ok(Some(secret)),
        Err(e) => {
            writeln!(session, "% {e}")?;
            Ok(None)
        }
    }
}

fn write_file<H, C>(vty: &Interpreter<'_, H, C>, session: &mut Session) -> CmdResult
where
    H: CommandHandlers,
    C: ShellConfig,
{
    match vty.save_config(session) {
        Ok(path) => {
            writeln!(session, "Configuration saved to {}", path.display())?;
            Ok(CmdStatus::Success)
        }
        Err(PersistError::Inconsistent) => {
            writeln!(session, "Configuration is not consistent")?;
            Ok(CmdStatus::Warning)
        }
        Err(PersistError::NoConfigFile) => {
            writeln!(session, "Can't save to configuration file, no file configured.")?;
            Ok(CmdStatus::Warning)
        }
        Err(e) => {
            writeln!(session, "% {e}")?;
            Ok(CmdStatus::Warning)
        }
    }
}

fn show_startup_config<H, C>(vty: &Interpreter<'_, H, C>, session: &mut Session) -> CmdResult
where
    H: CommandHandlers,
    C: ShellConfig,
{
    let path = vty.host().config_file.clone().unwrap_or_default();
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            for line in text.lines() {
                writeln!(session, "{line}")?;
            }
            Ok(CmdStatus::Success)
        }
        Err(e) => {
            debug!("reading {}: {}", path.display(), e);
            writeln!(session, "Can't open configuration file [{}]", path.display())?;
            Ok(CmdStatus::Warning)
        }
    }
}

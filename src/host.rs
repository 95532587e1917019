//! Host-wide runtime settings.
//!
//! One `Host` exists per interpreter. Configuration commands at the global
//! config node change it, and the global config node's dump writes it back.

use core::fmt::{self, Write};
use std::path::{Path, PathBuf};

use crate::auth::{self, AuthError};
use crate::logging::LoggingSettings;

/// Message of the day shown when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motd {
    /// Built-in banner
    Default,

    /// Contents of a file, read at session start
    File(PathBuf),

    /// No banner
    None,
}

/// A password in the form it is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    /// Cleartext, as typed
    Plain(String),

    /// `SALTHEX$HASHHEX`, as produced by `auth::encrypt_password`
    Encrypted(String),
}

impl Secret {
    /// Whether `input` is this password.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Secret::Plain(plain) => plain == input,
            Secret::Encrypted(stored) => auth::verify_encrypted(input, stored),
        }
    }

    /// Encrypted form of this password.
    pub fn encrypted(&self) -> Result<Secret, AuthError> {
        match self {
            Secret::Plain(plain) => Ok(Secret::Encrypted(auth::encrypt_password(plain)?)),
            Secret::Encrypted(_) => Ok(self.clone()),
        }
    }
}

/// Interpreter-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Hostname shown in prompts
    pub name: Option<String>,

    /// Login password
    pub password: Option<Secret>,

    /// Enable password
    pub enable: Option<Secret>,

    /// `service password-encryption` is on
    pub encrypt: bool,

    /// System-wide terminal length; `None` leaves sessions alone
    pub lines: Option<u32>,

    /// Banner
    pub motd: Motd,

    /// File written by `write file`
    pub config_file: Option<PathBuf>,

    /// Log destinations set with `log ...`
    pub logging: LoggingSettings,
}

/// Built-in banner text.
pub const DEFAULT_MOTD: &str = "";

impl Default for Host {
    fn default() -> Self {
        Self {
            name: None,
            password: None,
            enable: None,
            encrypt: false,
            lines: None,
            motd: Motd::Default,
            config_file: None,
            logging: LoggingSettings::new(),
        }
    }
}

impl Host {
    /// Settings of a freshly started daemon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same settings with a configuration file for `write file`.
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sessions must authenticate before reaching VIEW.
    pub fn requires_login(&self) -> bool {
        self.password.is_some()
    }

    /// `enable` asks for a password.
    pub fn requires_enable_password(&self) -> bool {
        self.enable.is_some()
    }

    /// Check a login password.
    pub fn check_password(&self, input: &str) -> bool {
        self.password.as_ref().is_some_and(|s| s.matches(input))
    }

    /// Check an enable password.
    pub fn check_enable(&self, input: &str) -> bool {
        self.enable.as_ref().is_some_and(|s| s.matches(input))
    }

    /// Store a password typed in cleartext, encrypting it when
    /// `service password-encryption` is on.
    pub fn secret_from_plain(&self, plain: &str) -> Result<Secret, AuthError> {
        let secret = Secret::Plain(plain.to_string());
        if self.encrypt {
            secret.encrypted()
        } else {
            Ok(secret)
        }
    }

    /// Turn password encryption on and encrypt the stored passwords.
    pub fn enable_encryption(&mut self) -> Result<(), AuthError> {
        if self.encrypt {
            return Ok(());
        }
        let password = self.password.as_ref().map(Secret::encrypted).transpose()?;
        let enable = self.enable.as_ref().map(Secret::encrypted).transpose()?;
        self.password = password;
        self.enable = enable;
        self.encrypt = true;
        Ok(())
    }

    /// Turn password encryption off.
    ///
    /// Encrypted passwords cannot be recovered and are dropped.
    pub fn disable_encryption(&mut self) {
        if !self.encrypt {
            return;
        }
        self.encrypt = false;
        if matches!(self.password, Some(Secret::Encrypted(_))) {
            self.password = None;
        }
        if matches!(self.enable, Some(Secret::Encrypted(_))) {
            self.enable = None;
        }
    }

    /// Banner text for a new session, if any.
    pub fn motd_text(&self) -> Option<String> {
        match &self.motd {
            Motd::Default if !DEFAULT_MOTD.is_empty() => Some(DEFAULT_MOTD.to_string()),
            Motd::Default | Motd::None => None,
            Motd::File(path) => std::fs::read_to_string(path).ok(),
        }
    }

    /// Write these settings as configuration commands.
    ///
    /// Always reports `true`: the global config node has something to say
    /// even when every setting is at its default.
    pub fn write_config(&self, out: &mut dyn Write) -> Result<bool, fmt::Error> {
        if let Some(name) = &self.name {
            writeln!(out, "hostname {name}")?;
        }

        write_secret(out, "password", self.password.as_ref())?;
        write_secret(out, "enable password", self.enable.as_ref())?;
        self.logging.write_config(out)?;

        if self.encrypt {
            writeln!(out, "service password-encryption")?;
        }
        if let Some(lines) = self.lines {
            writeln!(out, "service terminal-length {lines}")?;
        }
        match &self.motd {
            Motd::File(path) => writeln!(out, "banner motd file {}", path.display())?,
            Motd::None => writeln!(out, "no banner motd")?,
            Motd::Default => {}
        }
        Ok(true)
    }
}

fn write_secret(out: &mut dyn Write, keyword: &str, secret: Option<&Secret>) -> fmt::Result {
    match secret {
        Some(Secret::Plain(plain)) => writeln!(out, "{keyword} {plain}"),
        Some(Secret::Encrypted(stored)) => writeln!(out, "{keyword} 8 {stored}"),
        None => Ok(()),
    }
}

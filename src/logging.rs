//! Log destinations configured from the VTY.
//!
//! The `log ...` commands at the global config node edit a
//! [`LoggingSettings`] kept in the [`Host`](crate::host::Host). Applying the
//! settings to the process-wide [`VtyLogger`] opens or closes the log file
//! and, once the logger is installed with [`init`], moves the `log` crate's
//! max level to the most verbose enabled destination.
//!
//! Severities use the router-style names (`emergencies` .. `debugging`).
//! The `log` crate has fewer levels, so the four most severe all map to
//! `Level::Error` and `notifications` shares `Level::Info` with
//! `informational`.

use core::fmt::{self, Write as _};
use core::str::FromStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::error::CmdError;

/// Router-style message severity, most severe first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// System is unusable
    Emergencies,
    /// Immediate action needed
    Alerts,
    /// Critical conditions
    Critical,
    /// Error conditions
    Errors,
    /// Warning conditions
    Warnings,
    /// Normal but significant conditions
    Notifications,
    /// Informational messages
    Informational,
    /// Debugging messages
    Debugging,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Emergencies,
        Severity::Alerts,
        Severity::Critical,
        Severity::Errors,
        Severity::Warnings,
        Severity::Notifications,
        Severity::Informational,
        Severity::Debugging,
    ];

    /// Keyword used on the command line and in saved files.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Emergencies => "emergencies",
            Severity::Alerts => "alerts",
            Severity::Critical => "critical",
            Severity::Errors => "errors",
            Severity::Warnings => "warnings",
            Severity::Notifications => "notifications",
            Severity::Informational => "informational",
            Severity::Debugging => "debugging",
        }
    }

    /// `log` level messages of this severity are emitted at.
    pub const fn level(self) -> Level {
        match self {
            Severity::Emergencies | Severity::Alerts | Severity::Critical | Severity::Errors => {
                Level::Error
            }
            Severity::Warnings => Level::Warn,
            Severity::Notifications | Severity::Informational => Level::Info,
            Severity::Debugging => Level::Debug,
        }
    }

    /// Most verbose `log` level a destination at this severity lets through.
    pub fn level_filter(self) -> LevelFilter {
        self.level().to_level_filter()
    }

    /// Severity a `log` record is filed under.
    pub const fn of(level: Level) -> Self {
        match level {
            Level::Error => Severity::Errors,
            Level::Warn => Severity::Warnings,
            Level::Info => Severity::Informational,
            Level::Debug | Level::Trace => Severity::Debugging,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = CmdError;

    /// Full name or an unambiguous abbreviation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CmdError::NoMatch);
        }
        let mut found = None;
        for severity in Severity::ALL {
            if severity.name() == s {
                return Ok(severity);
            }
            if severity.name().starts_with(s) {
                if found.is_some() {
                    return Err(CmdError::Ambiguous);
                }
                found = Some(severity);
            }
        }
        found.ok_or(CmdError::NoMatch)
    }
}

/// File destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Path as typed; relative paths resolve against the working directory
    pub path: PathBuf,

    /// Least severe messages written
    pub level: Severity,
}

/// Log destinations and their levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level a destination gets when enabled without one (`log trap`)
    pub default_level: Severity,

    /// Standard output, if enabled
    pub stdout: Option<Severity>,

    /// Log file, if enabled
    pub file: Option<LogFile>,

    /// Prefix every message with its severity
    pub record_priority: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingSettings {
    /// Every destination off, default level `debugging`.
    pub const fn new() -> Self {
        Self {
            default_level: Severity::Debugging,
            stdout: None,
            file: None,
            record_priority: false,
        }
    }

    /// Most verbose level any enabled destination accepts.
    pub fn max_level(&self) -> LevelFilter {
        let file = self.file.as_ref().map(|f| f.level);
        [self.stdout, file]
            .into_iter()
            .flatten()
            .map(Severity::level_filter)
            .max()
            .unwrap_or(LevelFilter::Off)
    }

    /// `log trap`: new default level, also applied to enabled destinations.
    pub fn set_default_level(&mut self, level: Severity) {
        self.default_level = level;
        if let Some(stdout) = self.stdout.as_mut() {
            *stdout = level;
        }
        if let Some(file) = self.file.as_mut() {
            file.level = level;
        }
    }

    /// Write these settings as configuration commands.
    ///
    /// Levels equal to the default level are left out, so `log trap` comes
    /// first for the replay to pick them up again.
    pub fn write_config(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        if self.default_level != Severity::Debugging {
            writeln!(out, "! N.B. The 'log trap' command is deprecated.")?;
            writeln!(out, "log trap {}", self.default_level)?;
        }
        if let Some(file) = &self.file {
            write!(out, "log file {}", file.path.display())?;
            self.write_level(out, file.level)?;
        }
        if let Some(level) = self.stdout {
            write!(out, "log stdout")?;
            self.write_level(out, level)?;
        }
        if self.record_priority {
            writeln!(out, "log record-priority")?;
        }
        Ok(())
    }

    fn write_level(&self, out: &mut dyn fmt::Write, level: Severity) -> fmt::Result {
        if level != self.default_level {
            write!(out, " {level}")?;
        }
        writeln!(out)
    }

    /// `show logging` report.
    pub fn write_status(&self, out: &mut dyn fmt::Write, protocol: &str) -> fmt::Result {
        match self.stdout {
            Some(level) => writeln!(out, "Stdout logging: level {level}")?,
            None => writeln!(out, "Stdout logging: disabled")?,
        }
        match &self.file {
            Some(file) => writeln!(
                out,
                "File logging: level {}, filename {}",
                file.level,
                file.path.display()
            )?,
            None => writeln!(out, "File logging: disabled")?,
        }
        writeln!(out, "Protocol name: {protocol}")?;
        let priority = if self.record_priority { "enabled" } else { "disabled" };
        writeln!(out, "Record priority: {priority}")
    }
}

// ============================================================================
// Logger
// ============================================================================

#[derive(Debug)]
struct OpenFile {
    path: PathBuf,
    handle: File,
}

impl OpenFile {
    fn open(path: &Path) -> io::Result<Self> {
        let handle = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            handle,
        })
    }
}

#[derive(Debug)]
struct Sinks {
    settings: LoggingSettings,
    file: Option<OpenFile>,
}

/// `log` backend writing to the destinations of a [`LoggingSettings`].
#[derive(Debug)]
pub struct VtyLogger {
    sinks: Mutex<Sinks>,
    installed: AtomicBool,
}

impl Default for VtyLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl VtyLogger {
    /// Logger with every destination off.
    pub const fn new() -> Self {
        Self {
            sinks: Mutex::new(Sinks {
                settings: LoggingSettings::new(),
                file: None,
            }),
            installed: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sinks> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether this logger is the `log` crate's backend.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Settings currently in effect.
    pub fn settings(&self) -> LoggingSettings {
        self.lock().settings.clone()
    }

    /// Switch to `settings`.
    ///
    /// The log file is reopened only when its path changed. If it cannot be
    /// opened, nothing changes.
    ///
    /// # Errors
    ///
    /// Opening the new log file failed.
    pub fn apply(&self, settings: &LoggingSettings) -> io::Result<()> {
        let mut sinks = self.lock();

        let current = sinks.file.as_ref().map(|f| f.path.as_path());
        let wanted = settings.file.as_ref().map(|f| f.path.as_path());
        if current != wanted {
            sinks.file = match wanted {
                Some(path) => Some(OpenFile::open(path)?),
                None => None,
            };
        }
        sinks.settings = settings.clone();

        if self.is_installed() {
            log::set_max_level(settings.max_level());
        }
        Ok(())
    }
}

impl Log for VtyLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.lock().settings.max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let severity = Severity::of(record.level());
        let mut guard = self.lock();
        let sinks = &mut *guard;

        let mut line = String::new();
        if sinks.settings.record_priority {
            let _ = write!(line, "{severity}: ");
        }
        let _ = writeln!(line, "{}", record.args());

        if sinks.settings.stdout.is_some_and(|max| severity <= max) {
            let _ = io::stdout().lock().write_all(line.as_bytes());
        }
        if let (Some(target), Some(file)) = (&sinks.settings.file, sinks.file.as_mut()) {
            if severity <= target.level {
                let _ = file.handle.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        let mut sinks = self.lock();
        let _ = io::stdout().lock().flush();
        if let Some(file) = sinks.file.as_mut() {
            let _ = file.handle.flush();
        }
    }
}

static LOGGER: VtyLogger = VtyLogger::new();

/// The process-wide logger the `log ...` commands configure.
pub fn logger() -> &'static VtyLogger {
    &LOGGER
}

/// Install [`logger`] as the `log` crate's backend.
///
/// Until this is called the `log ...` commands only keep their settings,
/// leaving whatever backend the application installed alone.
///
/// # Errors
///
/// Another logger is already installed.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    LOGGER.installed.store(true, Ordering::Release);
    log::set_max_level(LOGGER.lock().settings.max_level());
    Ok(())
}

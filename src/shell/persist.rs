//! Running configuration output and `write file`.
//!
//! The file is replaced through a uniquely named temporary file in the same
//! directory, keeping the previous version as `PATH.sav`.

use core::fmt::{self, Write};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::handlers::CommandHandlers;
use super::interpreter::Interpreter;
use super::session::Session;
use crate::config::ShellConfig;
use crate::error::PersistError;
use crate::tree::NodeId;

/// Suffix of the previous configuration kept by `write file`.
pub const BACKUP_EXT: &str = ".sav";

impl<H, C> Interpreter<'_, H, C>
where
    H: CommandHandlers,
    C: ShellConfig,
{
    /// Dump every config-writing node in node order.
    ///
    /// The global config node dumps the host settings before whatever the
    /// application adds. Each non-empty dump is followed by `!`.
    pub fn write_config(&self, out: &mut dyn Write) -> fmt::Result {
        for node in self.registry().nodes().filter(|n| n.writes_config()) {
            let mut wrote = false;
            if node.id() == NodeId::CONFIG {
                wrote |= self.host().write_config(out)?;
            }
            wrote |= self.handlers().write_config(node.id(), out);
            if wrote {
                out.write_str("!\n")?;
            }
        }
        Ok(())
    }

    /// Running configuration as printed by `write terminal`.
    pub fn render_running_config(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_str("\nCurrent configuration:\n!\n")?;
        self.write_config(out)?;
        out.write_str("end\n")
    }

    /// Write the running configuration to `path`.
    ///
    /// # Errors
    ///
    /// The [`PersistError`] variant names the step that failed. The
    /// temporary file never survives a failure.
    pub fn write_config_file(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        match self.replace_config_file(path) {
            Ok(()) => {
                info!("configuration saved to {}", path.display());
                Ok(())
            }
            Err(e) => {
                warn!("saving configuration failed: {}", e);
                Err(e)
            }
        }
    }

    /// `write file`: check consistency, then save to the host's file.
    ///
    /// # Returns
    ///
    /// The path written.
    pub fn save_config(&self, session: &Session) -> Result<PathBuf, PersistError> {
        if !self.handlers().config_is_consistent(session) {
            return Err(PersistError::Inconsistent);
        }
        let path = self
            .host()
            .config_file
            .clone()
            .ok_or(PersistError::NoConfigFile)?;
        self.write_config_file(&path)?;
        Ok(path)
    }

    fn replace_config_file(&self, path: &Path) -> Result<(), PersistError> {
        let app = self.registry().app();
        let mut text = format!(
            "!\n! {} ({}) configuration saved from vty\n!!\n",
            app.name, app.version
        );
        self.write_config(&mut text).map_err(|_| PersistError::Write {
            path: path.to_path_buf(),
            source: io::Error::other("configuration dump failed"),
        })?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = match path.file_name() {
            Some(name) => format!("{}.", name.to_string_lossy()),
            None => String::from("config."),
        };

        // Dropping `tmp` removes the temporary file on every early return.
        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(6)
            .tempfile_in(dir)
            .map_err(|source| PersistError::TempOpen {
                path: dir.join(format!("{prefix}XXXXXX")),
                source,
            })?;

        {
            use std::io::Write as _;
            tmp.write_all(text.as_bytes())
                .and_then(|()| tmp.as_file().sync_all())
                .map_err(|source| PersistError::Write {
                    path: tmp.path().to_path_buf(),
                    source,
                })?;
        }

        let backup = backup_path(path);
        match fs::remove_file(&backup) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(PersistError::BackupUnlink { path: backup, source }),
        }

        if path.exists() {
            fs::hard_link(path, &backup)
                .map_err(|source| PersistError::BackupLink { path: backup, source })?;
            fs::remove_file(path).map_err(|source| PersistError::Unlink {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::hard_link(tmp.path(), path).map_err(|source| PersistError::Rename {
            path: path.to_path_buf(),
            source,
        })?;
        drop(tmp);

        set_mode(path).map_err(|source| PersistError::Permissions {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `PATH.sav`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(BACKUP_EXT);
    PathBuf::from(backup)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}

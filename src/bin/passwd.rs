//! Configuration generator for VTY host settings.
//!
//! Reads host settings from a TOML file and prints the matching
//! configuration fragment, with passwords encrypted (`password 8 ...`).
//! The fragment can be pasted into a daemon's configuration file so that
//! cleartext passwords never land there.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nut-vty-passwd --features passwd -- settings.toml
//! ```
//!
//! # Settings format
//!
//! ```toml
//! [host]
//! hostname = "bsc-1"
//! password = "login-secret"
//! enable_password = "enable-secret"
//! terminal_length = 24
//! ```

use std::process::ExitCode;
use std::{env, fs};

use nut_vty::host::{Host, Secret};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Settings {
    host: HostSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostSettings {
    hostname: Option<String>,
    password: Option<String>,
    enable_password: Option<String>,
    terminal_length: Option<u32>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <settings.toml>", args[0]);
        return ExitCode::from(2);
    }

    match generate(&args[1]) {
        Ok(config) => {
            print!("{config}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", args[1]);
            ExitCode::FAILURE
        }
    }
}

/// Configuration fragment for the settings file at `path`.
fn generate(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&text)?;
    let host = host_from_settings(settings.host)?;

    let mut config = String::new();
    host.write_config(&mut config)?;
    Ok(config)
}

/// Host carrying the settings, each password encrypted with its own salt.
fn host_from_settings(settings: HostSettings) -> Result<Host, Box<dyn std::error::Error>> {
    if let Some(name) = &settings.hostname
        && !name.starts_with(|c: char| c.is_ascii_alphabetic())
    {
        return Err("hostname must start with a letter".into());
    }

    let encrypt = |plain: Option<String>| -> Result<Option<Secret>, Box<dyn std::error::Error>> {
        match plain {
            Some(p) if !p.starts_with(|c: char| c.is_ascii_alphanumeric()) => {
                Err("passwords must start with a letter or digit".into())
            }
            Some(p) => Ok(Some(Secret::Plain(p).encrypted()?)),
            None => Ok(None),
        }
    };

    Ok(Host {
        name: settings.hostname,
        password: encrypt(settings.password)?,
        enable: encrypt(settings.enable_password)?,
        lines: settings.terminal_length,
        ..Host::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passwords_are_encrypted() {
        let settings: Settings = toml::from_str(
            r#"
            [host]
            hostname = "bsc-1"
            password = "foo"
            enable_password = "bar"
            terminal_length = 24
            "#,
        )
        .unwrap();

        let host = host_from_settings(settings.host).unwrap();
        assert!(matches!(host.password, Some(Secret::Encrypted(_))));
        assert!(host.check_password("foo"));
        assert!(host.check_enable("bar"));

        let mut config = String::new();
        host.write_config(&mut config).unwrap();
        let lines: Vec<&str> = config.lines().collect();
        assert_eq!(lines[0], "hostname bsc-1");
        assert!(lines[1].starts_with("password 8 "));
        assert!(lines[2].starts_with("enable password 8 "));
        assert_eq!(lines[3], "service terminal-length 24");
        assert!(!config.contains("foo"));
    }

    #[test]
    fn test_fresh_salt_per_password() {
        let settings = HostSettings {
            password: Some("same".into()),
            enable_password: Some("same".into()),
            ..HostSettings::default()
        };
        let host = host_from_settings(settings).unwrap();
        assert_ne!(host.password, host.enable);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let settings = HostSettings {
            hostname: Some("1bsc".into()),
            ..HostSettings::default()
        };
        assert!(host_from_settings(settings).is_err());

        let settings = HostSettings {
            password: Some("-x".into()),
            ..HostSettings::default()
        };
        assert!(host_from_settings(settings).is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Settings, _> = toml::from_str("[host]\nusername = \"admin\"\n");
        assert!(result.is_err());
    }
}

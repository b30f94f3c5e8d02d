//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `aci_core::ControllerConfig`.
//!
//! Core never sees these types -- it receives a pre-built `ControllerConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use aci_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration. Core never touches this type.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// CLI-owned profile definition.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// APIC base URL (e.g., "https://apic.example.net").
    pub controller: String,

    /// Username for APIC authentication.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn empty() -> Self {
        Self {
            controller: String::new(),
            username: None,
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "acictl", "acictl")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("acictl");
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ACICTL_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Persist the config as TOML, creating parent directories as needed.
pub fn save_config(config: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("could not serialize config: {e}"),
    })?;
    std::fs::write(&path, contents)?;
    Ok(())
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a CLI `Profile` + global flags into a `ControllerConfig`.
///
/// This is the single boundary where CLI config types cross into core types.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Controller URL (flag > env > profile)
    let url_str = global.controller.as_deref().unwrap_or(&profile.controller);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let (username, password) = resolve_credentials(profile, profile_name, global)?;

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (explicit flag > profile > built-in 30s)
    let timeout_secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or_else(default_timeout);

    Ok(ControllerConfig {
        url,
        username,
        password,
        tls,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// Build a `ControllerConfig` from CLI flags / env vars alone, without a
/// profile. Used when no config file exists.
pub fn resolve_flags_only(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let url_str = global.controller.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let profile = Profile::empty();
    let (username, password) = resolve_credentials(&profile, "default", global)?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ControllerConfig {
        url,
        username,
        password,
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or_else(default_timeout)),
    })
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve username + password from the credential chain.
///
/// Username: flag > ACI_USERNAME env (via clap) > profile.
/// Password: ACI_PASSWORD env > profile password_env > keyring > plaintext.
fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(String, SecretString), CliError> {
    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("ACI_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Profile's password_env -> env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("acictl", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

//! Shared configuration for Centra tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `centra_api::SessionConfig`. The CLI layers its
//! flag overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use centra_api::{
    MANAGEMENT_REST_API_PORT, REST_API_BASE_PATH_V3, SessionConfig, TlsMode, TransportConfig,
};

/// Keyring service all secrets are stored under.
pub const KEYRING_SERVICE: &str = "centra";

/// Fallback password variable when a profile names none.
pub const PASSWORD_ENV: &str = "CENTRA_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named management-server profiles.
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

impl Config {
    /// The profile called `name`, or the default profile when `name` is
    /// `None`. Returns the resolved name alongside the profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named management-server profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Management server host name or IP (no scheme).
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_base_path")]
    pub base_path: String,

    pub username: String,

    /// Plaintext password (prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    #[serde(default)]
    pub allow_two_factor_auth: bool,

    #[serde(default = "default_true")]
    pub auto_reconnect: bool,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,
}

impl Profile {
    pub fn new(address: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: default_port(),
            base_path: default_base_path(),
            username: username.into(),
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            allow_two_factor_auth: false,
            auto_reconnect: true,
            follow_redirects: true,
        }
    }
}

fn default_port() -> u16 {
    MANAGEMENT_REST_API_PORT
}
fn default_base_path() -> String {
    REST_API_BASE_PATH_V3.into()
}
fn default_true() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "guardicore", "centra").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("centra");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file. A missing file yields the defaults.
///
/// `CENTRA_`-prefixed variables override file values; nested keys use a
/// double underscore (`CENTRA_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CENTRA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .ok()?
        .get_password()
        .ok()
}

/// Resolve a profile's password from the credential chain:
/// `password_env` → `CENTRA_PASSWORD` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. Shared env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(profile_name) {
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Profile → SessionConfig ─────────────────────────────────────────

/// Build a `SessionConfig` from a profile, with credentials resolved.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<SessionConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    session_config(profile, password)
}

/// Build a `SessionConfig` from a profile and an already-resolved password.
pub fn session_config(
    profile: &Profile,
    password: SecretString,
) -> Result<SessionConfig, ConfigError> {
    let address = profile.address.trim();
    if address.is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: "must not be empty".into(),
        });
    }
    if address.contains("://") || address.contains('/') {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: format!("expected a host name or IP without scheme or path, got '{address}'"),
        });
    }
    if profile.username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        ..TransportConfig::default()
    };

    Ok(SessionConfig {
        management_address: address.to_owned(),
        username: profile.username.clone(),
        password: Some(password),
        port: profile.port,
        base_path: profile.base_path.clone(),
        transport,
        allow_two_factor_auth: profile.allow_two_factor_auth,
        auto_reconnect: profile.auto_reconnect,
        follow_redirects: profile.follow_redirects,
        ..SessionConfig::default()
    })
}

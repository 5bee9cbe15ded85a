//! CLI configuration: thin wrapper around `centra_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--address, --username, --insecure, etc.).

use secrecy::SecretString;

use centra_api::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use centra_config::{Config, Profile, config_path, load_config_or_default};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `SessionConfig` from the config file, the active profile and
/// CLI overrides. Flags take priority over profile values.
pub fn resolve_session_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let mut profile = base_profile(global, cfg, &profile_name)?;

    // 1. Location and identity
    if let Some(ref address) = global.address {
        profile.address.clone_from(address);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }

    // 2. Transport
    if global.insecure || (profile.insecure.is_none() && cfg.defaults.insecure) {
        profile.insecure = Some(true);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(cfg.defaults.timeout));

    // 3. Session behavior
    if global.no_reconnect {
        profile.auto_reconnect = false;
    }
    if global.two_factor {
        profile.allow_two_factor_auth = true;
    }

    // 4. Password (flag > credential chain)
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => centra_config::resolve_password(&profile, &profile_name)?,
    };

    let mut session = centra_config::session_config(&profile, password)?;
    session.log_responses = global.verbose >= 2;
    Ok(session)
}

/// The configured profile, or one assembled from flags when the config
/// has none by that name.
fn base_profile(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    if let Some(profile) = cfg.profiles.get(profile_name) {
        return Ok(profile.clone());
    }

    let Some(address) = global.address.clone() else {
        return Err(if global.profile.is_some() {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            CliError::ProfileNotFound {
                name: profile_name.into(),
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            }
        } else {
            CliError::NoConfig {
                path: config_path().display().to_string(),
            }
        });
    };

    let username = global
        .username
        .clone()
        .ok_or_else(|| CliError::Validation {
            field: "username".into(),
            reason: "required when no profile is configured (--username)".into(),
        })?;

    Ok(Profile::new(address, username))
}

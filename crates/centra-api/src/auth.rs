use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of the most recent authentication attempt.
///
/// Gates auto-reconnect: a session only re-authenticates on an auth
/// failure if the previous attempt [`Succeeded`](Self::Succeeded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AuthState {
    /// No attempt has completed yet (or a re-authentication is in flight).
    #[default]
    Unknown = 0,
    /// The last attempt produced an access token.
    Succeeded = 1,
    /// The last attempt failed.
    Failed = 2,
}

/// Lock-free holder for an [`AuthState`].
#[derive(Debug, Default)]
pub(crate) struct AuthTracker(AtomicU8);

impl AuthTracker {
    pub(crate) fn get(&self) -> AuthState {
        match self.0.load(Ordering::Acquire) {
            1 => AuthState::Succeeded,
            2 => AuthState::Failed,
            _ => AuthState::Unknown,
        }
    }

    pub(crate) fn set(&self, state: AuthState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Source of one-time codes for the two-factor continuation.
///
/// Called with the session's username. Any `Fn(&str) -> String` closure
/// works; [`TerminalPrompt`] asks on the controlling terminal.
pub trait TwoFactorPrompt: Send + Sync {
    fn code(&self, username: &str) -> Result<String, Error>;
}

impl<F> TwoFactorPrompt for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn code(&self, username: &str) -> Result<String, Error> {
        Ok(self(username))
    }
}

/// Reads the code from the terminal without echoing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TwoFactorPrompt for TerminalPrompt {
    fn code(&self, username: &str) -> Result<String, Error> {
        rpassword::prompt_password(format!("Two-factor authentication code for {username}: "))
            .map(|code| code.trim().to_owned())
            .map_err(|e| Error::Authentication {
                message: format!("failed to read two-factor code: {e}"),
            })
    }
}

// ── Wire shapes of the `authenticate` endpoint ──────────────────────

#[derive(Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct TwoFactorContinuation<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub two_factor_auth_phase: u8,
    pub temp_token: &'a str,
}

#[derive(Deserialize, Default)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(rename = "2fa_required", default)]
    pub two_factor_required: bool,
    #[serde(rename = "2fa_temp_token", default)]
    pub temp_token: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("two_factor_required", &self.two_factor_required)
            .finish_non_exhaustive()
    }
}

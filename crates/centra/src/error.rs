//! CLI error types with miette diagnostics.
//!
//! Maps `centra_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use centra_api::Error as ApiError;
use centra_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(centra::connection_failed),
        help(
            "Check that the management server is reachable on the configured port.\n\
             Try: centra status -v"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS certificate verification failed: {message}")]
    #[diagnostic(
        code(centra::tls_error),
        help(
            "Configure ca_cert in your profile, or use --insecure (-k) to accept a\n\
             self-signed certificate. Insecure mode weakens transport security."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(centra::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Run: centra config set-password --profile {profile}\n\
             If the account uses two-factor authentication, add --2fa."
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(centra::no_credentials),
        help(
            "Store a password with: centra config set-password --profile {profile}\n\
             Or set the CENTRA_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(centra::permission_denied),
        help("The account is authenticated but lacks the role for this operation.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(centra::not_found),
        help("Run: centra {list_command} to see what exists")
    )]
    NotFound {
        message: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(centra::ambiguous),
        help("Narrow the query so it matches exactly one object.")
    )]
    Ambiguous { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(centra::api_error))]
    Api { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(centra::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(centra::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add a [profiles.{name}] table to the config file (see: centra config path)."
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No management server configured")]
    #[diagnostic(
        code(centra::no_config),
        help(
            "Pass --address and --username, or create a profile in\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(centra::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(centra::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(centra::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(centra::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(centra::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate an API error, naming `profile` in authentication help.
    pub fn from_api(err: ApiError, profile: &str) -> Self {
        Self::from(err).with_profile(profile)
    }

    /// Fill in the profile name on errors whose help text refers to it.
    #[must_use]
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { profile, message } if profile.is_empty() => Self::AuthFailed {
                profile: name.into(),
                message,
            },
            other => other,
        }
    }
}

// ── centra_api::Error → CliError ─────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { message } if message.contains("certificate") => {
                Self::TlsError { message }
            }
            ApiError::Authentication { message } => Self::AuthFailed {
                profile: String::new(),
                message,
            },
            ApiError::Permission { message } => Self::PermissionDenied { message },
            ApiError::RequestTimeout { message } => Self::Timeout { message },
            ApiError::BadRequest { message } => Self::Api {
                code: "bad_request".into(),
                message,
            },
            ApiError::RedirectionRequired { message } => Self::Api {
                code: "redirect".into(),
                message,
            },
            ApiError::Api { message, status } => Self::Api {
                code: status.map_or_else(|| "invalid_response".into(), |s| s.to_string()),
                message,
            },
            ApiError::ObjectNotFound { message } => Self::NotFound {
                message,
                list_command: "labels list".into(),
            },
            ApiError::AmbiguousMatch { message } => Self::Ambiguous { message },
            ApiError::Transport(e) if e.is_timeout() => Self::Timeout {
                message: e.to_string(),
            },
            ApiError::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "the management server".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiError::Http { status, url } => Self::Api {
                code: status.as_u16().to_string(),
                message: format!("unexpected response from {url}"),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "address".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(message) => Self::TlsError { message },
            ApiError::Deserialization { message, .. } => Self::Api {
                code: "decode".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

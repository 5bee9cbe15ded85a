use thiserror::Error;

/// Top-level error type for the `centra-api` crate.
///
/// The first group of variants is the management API taxonomy: every
/// failure the server reports, already translated from HTTP status and
/// body shape. [`Error::is_api_error`] selects that group so callers can
/// catch broadly; match on the variant to catch specifically.
#[derive(Debug, Error)]
pub enum Error {
    // ── Management API ──────────────────────────────────────────────
    /// Bad credentials, expired or invalid token, two-factor required but
    /// not allowed, or a certificate verification failure.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Authenticated, but not authorized for the resource (HTTP 403).
    #[error("No permission to access resource: {message}")]
    Permission { message: String },

    /// Upstream gateway timeout (HTTP 504).
    #[error("Request timed out: {message}")]
    RequestTimeout { message: String },

    /// Unknown resource (HTTP 404) or an unsupported HTTP method.
    #[error("Bad API request: {message}")]
    BadRequest { message: String },

    /// HTTP 406 that could not be followed.
    #[error("Redirection required: {message}")]
    RedirectionRequired { message: String },

    /// Any other error response with a JSON body, or an unreadable body
    /// where JSON was expected.
    #[error("Centra API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Resources ───────────────────────────────────────────────────
    /// A lookup by name matched nothing.
    #[error("Object not found: {message}")]
    ObjectNotFound { message: String },

    /// A lookup that must be unique matched more than one object.
    #[error("Ambiguous match: {message}")]
    AmbiguousMatch { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status the classifier has no domain mapping for.
    #[error("HTTP {status} from {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration error while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A JSON value did not match the expected model, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for the management API taxonomy (the errors a scoped
    /// teardown swallows).
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::Permission { .. }
                | Self::RequestTimeout { .. }
                | Self::BadRequest { .. }
                | Self::RedirectionRequired { .. }
                | Self::Api { .. }
        )
    }

    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RequestTimeout { .. } => true,
            _ => false,
        }
    }

    /// The HTTP status behind this error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Http { status, .. } => Some(status.as_u16()),
            Self::Authentication { .. } => Some(401),
            Self::Permission { .. } => Some(403),
            Self::RequestTimeout { .. } => Some(504),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// Centra API session
//
// Owns the HTTP client, the bearer token and the authentication state.
// Request execution, login and pagination are implemented as inherent
// methods in sibling files to keep this module focused on configuration
// and the public query surface.

mod classify;
mod execute;
mod location;
mod login;
mod paginate;
mod reconnect;
mod request;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{AuthState, AuthTracker, TwoFactorPrompt};
use crate::error::Error;
use crate::transport::TransportConfig;

pub use location::{ApiLocation, path_segment};
pub use paginate::{Page, PageRequest};
pub use reconnect::retry_once;
pub use request::{Attachment, Request};

/// Default HTTPS port of the management server.
pub const MANAGEMENT_REST_API_PORT: u16 = 443;

/// Default base path of the v3.0 REST API.
pub const REST_API_BASE_PATH_V3: &str = "/api/v3.0/";

/// Lightweight endpoint used to probe connectivity.
const STATUS_ENDPOINT: &str = "system-notifications";

/// How to reach and authenticate with a management server.
#[derive(Clone)]
pub struct SessionConfig {
    pub management_address: String,
    pub username: String,
    pub password: Option<SecretString>,
    pub port: u16,
    pub base_path: String,
    pub transport: TransportConfig,
    /// Answer a two-factor challenge instead of failing.
    pub allow_two_factor_auth: bool,
    /// Where the one-time code comes from; the terminal when `None`.
    pub two_factor_prompt: Option<Arc<dyn TwoFactorPrompt>>,
    /// Authenticate while constructing the session.
    pub login: bool,
    /// Re-authenticate once when an authenticated call is rejected.
    pub auto_reconnect: bool,
    /// Follow HTTP 406 + `Location` redirects.
    pub follow_redirects: bool,
    /// Log every response body at debug level.
    pub log_responses: bool,
    /// Upper bound on consecutive redirects; unbounded when `None`.
    pub max_redirects: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            management_address: String::new(),
            username: String::new(),
            password: None,
            port: MANAGEMENT_REST_API_PORT,
            base_path: REST_API_BASE_PATH_V3.into(),
            transport: TransportConfig::default(),
            allow_two_factor_auth: false,
            two_factor_prompt: None,
            login: true,
            auto_reconnect: true,
            follow_redirects: true,
            log_responses: false,
            max_redirects: None,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("management_address", &self.management_address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("transport", &self.transport)
            .field("allow_two_factor_auth", &self.allow_two_factor_auth)
            .field("two_factor_prompt", &self.two_factor_prompt.is_some())
            .field("login", &self.login)
            .field("auto_reconnect", &self.auto_reconnect)
            .field("follow_redirects", &self.follow_redirects)
            .field("log_responses", &self.log_responses)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

/// An authenticated connection to a management server.
///
/// All request methods take `&self`: the token lives behind an atomic
/// pointer swap and the auth state in an atomic, so a re-authentication is
/// visible to the very next request. A session is meant for one logical
/// caller at a time; concurrent calls may observe each other's
/// re-authentication.
pub struct Session {
    http: reqwest::Client,
    location: ApiLocation,
    config: SessionConfig,
    token: ArcSwapOption<SecretString>,
    auth_state: AuthTracker,
    two_factor_required: AtomicBool,
}

impl Session {
    /// Build the HTTP client from `config.transport`, then log in unless
    /// `config.login` is false.
    pub async fn new(config: SessionConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let location = ApiLocation::from_address(
            &config.management_address,
            config.port,
            &config.base_path,
        )?;
        Self::from_parts(http, location, config).await
    }

    /// Create a session on a pre-built `reqwest::Client` and root URL
    /// (scheme, host and port). The base path still comes from `config`.
    pub async fn with_client(
        http: reqwest::Client,
        root: Url,
        config: SessionConfig,
    ) -> Result<Self, Error> {
        let location = ApiLocation::new(root, &config.base_path)?;
        Self::from_parts(http, location, config).await
    }

    async fn from_parts(
        http: reqwest::Client,
        location: ApiLocation,
        config: SessionConfig,
    ) -> Result<Self, Error> {
        let session = Self {
            http,
            location,
            config,
            token: ArcSwapOption::empty(),
            auth_state: AuthTracker::default(),
            two_factor_required: AtomicBool::new(false),
        };

        if session.config.login {
            session.login().await?;
            debug!("connected to Centra on {}", session.config.management_address);
        }

        Ok(session)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn location(&self) -> &ApiLocation {
        &self.location
    }

    /// The base URL every endpoint is joined onto.
    pub fn base_url(&self) -> &Url {
        self.location.base_url()
    }

    /// Absolute URL for an endpoint.
    pub fn api_url(&self, endpoint: &str) -> Result<Url, Error> {
        self.location.join(endpoint)
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), Error> {
        self.location.set_port(port)?;
        self.config.port = port;
        Ok(())
    }

    pub fn set_base_path(&mut self, base_path: &str) -> Result<(), Error> {
        self.location.set_base_path(base_path)?;
        self.config.base_path = base_path.to_owned();
        Ok(())
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state.get()
    }

    /// Whether the server asked for a second factor during the last login.
    pub fn two_factor_required(&self) -> bool {
        self.two_factor_required.load(Ordering::Acquire)
    }

    /// The current bearer token, if any.
    pub fn access_token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }

    /// Replace the bearer token. The next request carries the new token;
    /// the auth state is left alone.
    pub fn set_token(&self, token: impl Into<SecretString>) {
        debug!("setting REST token");
        self.token.store(Some(Arc::new(token.into())));
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Send a request and parse the response body as JSON. An empty body
    /// parses as `null`.
    pub async fn query(&self, request: Request) -> Result<Value, Error> {
        let response = self.send(&request).await?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| Error::Api {
            message: format!(
                "error reading server response: {e} :: [{}]",
                response.preview()
            ),
            status: Some(response.status.as_u16()),
        })
    }

    /// Send a request and decode the JSON response into `T`.
    pub async fn query_as<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        let value = self.query(request).await?;
        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }

    /// Send a request and return the raw response body.
    pub async fn query_bytes(&self, request: Request) -> Result<Bytes, Error> {
        Ok(self.send(&request).await?.body)
    }

    /// Run a request through the auto-reconnect wrapper.
    async fn send(&self, request: &Request) -> Result<classify::ApiResponse, Error> {
        let eligible =
            self.config.auto_reconnect && self.auth_state.get() == AuthState::Succeeded;

        retry_once(
            eligible,
            || self.execute(request),
            || async {
                self.auth_state.set(AuthState::Unknown);
                self.login().await
            },
        )
        .await
    }

    /// True iff a lightweight status call succeeds.
    pub async fn is_connected(&self) -> bool {
        match self.query(Request::get(STATUS_ENDPOINT)).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "error while checking connectivity");
                false
            }
        }
    }

    /// Best-effort teardown: log out, swallowing (and logging) errors of
    /// the API taxonomy.
    ///
    /// Transport, TLS, URL and decoding errors are returned rather than
    /// swallowed, so a caller can still tell that the server was
    /// unreachable during teardown.
    pub async fn close(self) -> Result<(), Error> {
        match self.logout().await {
            Err(e) if e.is_api_error() => {
                warn!(error = %e, "logout failed while closing session");
                Ok(())
            }
            other => other,
        }
    }
}

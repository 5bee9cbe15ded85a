// Authentication state machine: login, two-factor continuation, logout.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, info};

use super::Session;
use super::request::Request;
use crate::auth::{
    AuthResponse, AuthState, Credentials, TerminalPrompt, TwoFactorContinuation, TwoFactorPrompt,
};
use crate::error::Error;

const AUTH_ENDPOINT: &str = "authenticate";
const LOGOUT_ENDPOINT: &str = "logout";

impl Session {
    /// Authenticate with the configured credentials.
    ///
    /// On success the access token is stored and the state becomes
    /// [`AuthState::Succeeded`]. Any failure leaves it
    /// [`AuthState::Failed`], which disables auto-reconnect until a later
    /// login succeeds.
    pub async fn login(&self) -> Result<(), Error> {
        match self.authenticate().await {
            Ok(token) => {
                self.set_token(token);
                self.auth_state.set(AuthState::Succeeded);
                info!(
                    username = %self.config.username,
                    "authenticated to {}", self.config.management_address
                );
                Ok(())
            }
            Err(e) => {
                self.auth_state.set(AuthState::Failed);
                Err(e)
            }
        }
    }

    async fn authenticate(&self) -> Result<String, Error> {
        let password = self
            .config
            .password
            .as_ref()
            .ok_or_else(|| Error::Authentication {
                message: format!("no password configured for {}", self.config.username),
            })?;

        debug!("authenticating as {}", self.config.username);
        let credentials = Credentials {
            username: &self.config.username,
            password: password.expose_secret(),
        };
        let response = self.post_authenticate(&credentials).await?;

        if let Some(token) = response.access_token {
            self.two_factor_required.store(false, Ordering::Release);
            return Ok(token);
        }

        if !response.two_factor_required {
            return Err(Error::Authentication {
                message: "authentication response carried neither a token nor a \
                          two-factor challenge"
                    .into(),
            });
        }

        self.two_factor_required.store(true, Ordering::Release);
        if !self.config.allow_two_factor_auth {
            return Err(Error::Authentication {
                message: "two-factor authentication is required but not allowed \
                          for this session"
                    .into(),
            });
        }

        let temp_token = response.temp_token.ok_or_else(|| Error::Authentication {
            message: "two-factor challenge is missing its temporary token".into(),
        })?;
        let code = self.two_factor_code().await?;

        let continuation = TwoFactorContinuation {
            username: &self.config.username,
            password: &code,
            two_factor_auth_phase: 1,
            temp_token: &temp_token,
        };
        self.post_authenticate(&continuation)
            .await?
            .access_token
            .ok_or_else(|| Error::Authentication {
                message: "two-factor authentication did not return an access token".into(),
            })
    }

    async fn post_authenticate(&self, body: &impl serde::Serialize) -> Result<AuthResponse, Error> {
        let request = Request::post(AUTH_ENDPOINT).json(body)?;
        let response = self.execute(&request).await?;
        let value: Value =
            serde_json::from_slice(&response.body).map_err(|_| Error::Authentication {
                message: format!(
                    "unexpected authentication response: {}",
                    response.preview()
                ),
            })?;
        serde_json::from_value(value).map_err(|e| Error::Authentication {
            message: format!("malformed authentication response: {e}"),
        })
    }

    /// Ask the configured prompt (or the terminal) for the one-time code.
    /// Prompts may block, so they run off the async executor.
    async fn two_factor_code(&self) -> Result<String, Error> {
        let prompt: Arc<dyn TwoFactorPrompt> = self
            .config
            .two_factor_prompt
            .clone()
            .unwrap_or_else(|| Arc::new(TerminalPrompt));
        let username = self.config.username.clone();

        tokio::task::spawn_blocking(move || prompt.code(&username))
            .await
            .map_err(|e| Error::Authentication {
                message: format!("two-factor prompt failed: {e}"),
            })?
    }

    /// End the server-side session. The response body is ignored.
    pub async fn logout(&self) -> Result<(), Error> {
        self.execute(&Request::post(LOGOUT_ENDPOINT)).await?;
        info!("logged out of {}", self.config.management_address);
        Ok(())
    }
}

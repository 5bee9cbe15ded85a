// Request execution: transport, classification and 406 redirects.

use reqwest::StatusCode;
use reqwest::header::{self, HeaderValue};
use secrecy::ExposeSecret;
use tracing::debug;

use super::Session;
use super::classify::{ApiResponse, classify};
use super::request::Request;
use crate::error::Error;
use crate::transport::is_certificate_error;

impl Session {
    /// Issue `request` once, following redirects but never re-authenticating.
    pub(crate) async fn execute(&self, request: &Request) -> Result<ApiResponse, Error> {
        let method = request.checked_method()?;
        let mut current = request.clone();
        let mut hops = 0_usize;

        loop {
            let response = self.send_once(&method, &current).await?;
            classify(&response)?;

            if response.status != StatusCode::NOT_ACCEPTABLE {
                return Ok(response);
            }

            current.endpoint = self.redirect_target(&response, hops)?;
            hops += 1;
            debug!(
                hops,
                endpoint = %current.endpoint,
                "following redirect from {}",
                response.url
            );
        }
    }

    /// Where a 406 response points, as an endpoint under the base path.
    fn redirect_target(&self, response: &ApiResponse, hops: usize) -> Result<String, Error> {
        if !self.config.follow_redirects {
            return Err(Error::RedirectionRequired {
                message: format!("redirect required by {} but following is disabled", response.url),
            });
        }

        let location = response
            .headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::RedirectionRequired {
                message: format!("{} answered 406 without a Location header", response.url),
            })?;

        if let Some(max) = self.config.max_redirects {
            if hops >= max {
                return Err(Error::RedirectionRequired {
                    message: format!("gave up after {max} redirects, last Location: {location}"),
                });
            }
        }

        Ok(self.location.endpoint_from_location(location))
    }

    /// One HTTP round trip with the body fully read.
    async fn send_once(
        &self,
        method: &reqwest::Method,
        request: &Request,
    ) -> Result<ApiResponse, Error> {
        let url = self.location.join(&request.endpoint)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method.clone(), url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = self.token.load_full() {
            let mut value = HeaderValue::from_str(&format!("bearer {}", token.expose_secret()))
                .map_err(|_| Error::Authentication {
                    message: "access token contains characters not allowed in a header".into(),
                })?;
            value.set_sensitive(true);
            builder = builder.header(header::AUTHORIZATION, value);
        }

        builder = if request.files.is_empty() {
            let builder = builder.header(header::CONTENT_TYPE, "application/json");
            match &request.data {
                Some(data) => builder.json(data),
                None => builder,
            }
        } else {
            builder.multipart(request.multipart_form()?)
        };

        let resp = builder.send().await.map_err(transport_error)?;
        let status = resp.status();
        let url = resp.url().clone();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(transport_error)?;

        let response = ApiResponse {
            status,
            url,
            headers,
            body,
        };

        if self.config.log_responses {
            debug!(
                status = %response.status,
                url = %response.url,
                body = %response.preview(),
                "response"
            );
        }

        Ok(response)
    }
}

/// Certificate failures become authentication errors with guidance;
/// everything else stays a transport error.
fn transport_error(err: reqwest::Error) -> Error {
    if is_certificate_error(&err) {
        Error::Authentication {
            message: format!(
                "TLS certificate verification failed ({err}). Use a trusted CA \
                 certificate, or disable verification (insecure mode) if you \
                 accept the weakened security."
            ),
        }
    } else {
        Error::Transport(err)
    }
}

// HTTP status + body shape → error taxonomy.
//
// Runs on every response before parsing. A 406 without a JSON body passes
// through untouched so the redirect follower can see it.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::error::Error;

/// A fully-read response.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    /// The body as JSON, if it parses as JSON at all.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Up to 200 bytes of the body, for logs and error messages.
    pub fn preview(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        text.chars().take(200).collect()
    }
}

/// Map a non-success response to its domain error. Success and plain
/// (non-JSON) 406 responses return `Ok`.
pub(crate) fn classify(response: &ApiResponse) -> Result<(), Error> {
    let status = response.status;
    if status.is_success() {
        return Ok(());
    }

    let json = response.json();
    let message = || error_message(json.as_ref(), response);

    match status.as_u16() {
        401 => Err(Error::Authentication { message: message() }),
        403 => Err(Error::Permission { message: message() }),
        code @ 400..=599 if json.is_some() => Err(Error::Api {
            message: message(),
            status: Some(code),
        }),
        504 => Err(Error::RequestTimeout {
            message: format!("gateway timeout while requesting {}", response.url),
        }),
        404 => Err(Error::BadRequest {
            message: format!("URL not found: {}", response.url),
        }),
        406 => Ok(()),
        _ => Err(Error::Http {
            status,
            url: response.url.to_string(),
        }),
    }
}

/// `"{error}: {description}"` from a JSON error body, degrading to
/// whichever field exists, then to the raw body, then to the status line.
fn error_message(json: Option<&Value>, response: &ApiResponse) -> String {
    let field = |name: &str| {
        json.and_then(|v| v.get(name)).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };

    match (field("error"), field("description")) {
        (Some(error), Some(description)) => format!("{error}: {description}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => {
            let preview = response.preview();
            if preview.trim().is_empty() {
                response.status.to_string()
            } else {
                preview
            }
        }
    }
}

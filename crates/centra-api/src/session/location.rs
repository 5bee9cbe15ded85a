// Base URL derivation: `{scheme}://{address}:{port}/{base_path}/`.
//
// Port and base path live here together so the derived URL is recomputed
// whenever either changes.

use std::borrow::Cow;

use url::Url;

use crate::error::Error;

/// Where the management API lives.
#[derive(Debug, Clone)]
pub struct ApiLocation {
    root: Url,
    base_path: String,
    base_url: Url,
}

impl ApiLocation {
    /// `https://{address}:{port}/` joined with `base_path`.
    pub fn from_address(address: &str, port: u16, base_path: &str) -> Result<Self, Error> {
        let root = Url::parse(&format!("https://{address}:{port}/"))?;
        Self::new(root, base_path)
    }

    /// Any root URL (scheme, host, port) joined with `base_path`.
    pub fn new(root: Url, base_path: &str) -> Result<Self, Error> {
        let base_path = normalize_base_path(base_path);
        let base_url = root.join(&base_path)?;
        Ok(Self {
            root,
            base_path,
            base_url,
        })
    }

    /// The fixed base URL every endpoint is joined onto. Always ends in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The normalized base path (`api/v3.0/`, no leading slash).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn port(&self) -> Option<u16> {
        self.root.port_or_known_default()
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), Error> {
        self.root
            .set_port(Some(port))
            .map_err(|()| Error::InvalidUrl(url::ParseError::InvalidPort))?;
        self.base_url = self.root.join(&self.base_path)?;
        Ok(())
    }

    pub fn set_base_path(&mut self, base_path: &str) -> Result<(), Error> {
        let base_path = normalize_base_path(base_path);
        self.base_url = self.root.join(&base_path)?;
        self.base_path = base_path;
        Ok(())
    }

    /// Join an endpoint onto the base URL. A leading `/` does not escape
    /// the base path.
    pub fn join(&self, endpoint: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Turn a `Location` header value into an endpoint relative to the base
    /// path. Absolute URLs are reduced to their path and query; a leading
    /// base-path prefix is stripped.
    pub fn endpoint_from_location(&self, location: &str) -> String {
        let relative = match Url::parse(location) {
            Ok(url) => match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_owned(),
            },
            Err(_) => location.to_owned(),
        };

        let trimmed = relative.trim_start_matches('/');
        trimmed
            .strip_prefix(self.base_path.as_str())
            .unwrap_or(trimmed)
            .to_owned()
    }
}

/// Percent-encode one user-supplied path segment (a label key, value, or
/// id). Empty and dot segments would address a different endpoint once
/// joined, so they are refused.
pub fn path_segment(raw: &str) -> Result<Cow<'_, str>, Error> {
    if matches!(raw, "" | "." | "..") {
        return Err(Error::BadRequest {
            message: format!("{raw:?} cannot be used as a URL path segment"),
        });
    }
    Ok(urlencoding::encode(raw))
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

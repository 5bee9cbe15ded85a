// Transport configuration for building the session's reqwest::Client.
//
// Certificate verification is the only knob callers usually touch; the
// custom CA mode exists for management servers signed by a private CA.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate. Weakens transport security; only for
    /// management servers with self-signed certificates.
    DangerAcceptInvalid,
}

/// Transport configuration for the session's HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("centra-api/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Whether the server certificate is verified at all.
    pub fn verifies_certificate(&self) -> bool {
        self.tls != TlsMode::DangerAcceptInvalid
    }

    /// Switch certificate verification on (system roots) or off.
    pub fn with_certificate_verification(mut self, verify: bool) -> Self {
        self.tls = if verify {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        };
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Returns `true` if a transport failure was caused by certificate
/// verification, judged from the whole source chain.
pub(crate) fn is_certificate_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.to_string().to_ascii_lowercase().contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}

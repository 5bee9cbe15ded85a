// centra-api: Async Rust client for the Guardicore Centra management REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use auth::{AuthState, TerminalPrompt, TwoFactorPrompt};
pub use client::CentraClient;
pub use error::Error;
pub use models::{
    Asset, AssetQuery, AssetStatus, DEFAULT_OBJECTS_PER_PAGE, Label, LabelQuery, LabelSummary,
};
pub use session::{
    ApiLocation, Attachment, MANAGEMENT_REST_API_PORT, Page, PageRequest, REST_API_BASE_PATH_V3,
    Request, Session, SessionConfig, retry_once,
};
pub use transport::{TlsMode, TransportConfig};

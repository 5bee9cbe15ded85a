// Resource models and list filters
//
// Only the commonly needed fields are typed. The API returns many more
// (and varies them between versions); everything else lands in `extra`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page size used by the resource listings unless overridden.
pub const DEFAULT_OBJECTS_PER_PAGE: u64 = 1000;

// ── Assets ───────────────────────────────────────────────────────────

/// An asset (VM, bare-metal server, container host) from `GET assets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `on`, `off` or `deleted`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
    #[serde(default)]
    pub labels: Vec<LabelSummary>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    On,
    Off,
    Deleted,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Deleted => "deleted",
        })
    }
}

/// Filters for [`CentraClient::assets`](crate::CentraClient::assets).
#[derive(Debug, Clone)]
pub struct AssetQuery {
    /// Attribute to sort by; the server defaults to `-last_seen`.
    pub sort: Option<String>,
    pub status: Vec<AssetStatus>,
    /// Substring of the asset name or one of its IPs.
    pub search: Option<String>,
    pub id: Option<String>,
    /// Label ids the asset must carry.
    pub labels: Vec<String>,
    pub label_groups: Vec<String>,
    /// Stop after this many assets.
    pub limit: Option<usize>,
    pub objects_per_page: u64,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            sort: None,
            status: Vec::new(),
            search: None,
            id: None,
            labels: Vec::new(),
            label_groups: Vec::new(),
            limit: None,
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
        }
    }
}

impl AssetQuery {
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "sort", self.sort.as_ref());
        params.extend(self.status.iter().map(|s| ("status".to_owned(), s.to_string())));
        push_opt(&mut params, "search", self.search.as_ref());
        push_opt(&mut params, "id", self.id.as_ref());
        params.extend(self.labels.iter().map(|l| ("labels".to_owned(), l.clone())));
        params.extend(
            self.label_groups
                .iter()
                .map(|g| ("label_groups".to_owned(), g.clone())),
        );
        params
    }
}

// ── Labels ───────────────────────────────────────────────────────────

/// A `key: value` label from `GET visibility/labels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Label {
    /// `Key: Value`, the form labels are displayed and deleted by.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}: {}", self.key, self.value))
    }
}

/// The short label form embedded in assets and returned by label mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSummary {
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Filters for [`CentraClient::labels`](crate::CentraClient::labels).
#[derive(Debug, Clone)]
pub struct LabelQuery {
    /// The server defaults to `key,value`.
    pub sort: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    /// Exact label id; sent as `name`.
    pub id: Option<String>,
    /// Substring of `Key: Value`; sent as `text_search`.
    pub search: Option<String>,
    /// Dynamic criteria returned per label; the server defaults to 500.
    pub dynamic_criteria_limit: Option<u32>,
    pub limit: Option<usize>,
    pub objects_per_page: u64,
}

impl Default for LabelQuery {
    fn default() -> Self {
        Self {
            sort: None,
            key: None,
            value: None,
            id: None,
            search: None,
            dynamic_criteria_limit: None,
            limit: None,
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
        }
    }
}

impl LabelQuery {
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "sort", self.sort.as_ref());
        push_opt(&mut params, "key", self.key.as_ref());
        push_opt(&mut params, "value", self.value.as_ref());
        push_opt(&mut params, "name", self.id.as_ref());
        push_opt(&mut params, "text_search", self.search.as_ref());
        push_opt(
            &mut params,
            "dynamic_criteria_limit",
            self.dynamic_criteria_limit.as_ref(),
        );
        params
    }
}

fn push_opt(params: &mut Vec<(String, String)>, key: &str, value: Option<&impl ToString>) {
    if let Some(value) = value {
        params.push((key.to_owned(), value.to_string()));
    }
}

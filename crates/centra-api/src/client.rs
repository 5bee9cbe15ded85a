// Resource-level client for assets and labels.
//
// Thin wrappers over `Session`: they pick endpoints, translate filters
// into query parameters and decode objects into the typed models.

use futures_util::{Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::models::{Asset, AssetQuery, Label, LabelQuery, LabelSummary};
use crate::session::{PageRequest, Request, Session, path_segment};

const ASSETS_ENDPOINT: &str = "assets";
const LABELS_ENDPOINT: &str = "visibility/labels";
const NOTIFICATIONS_ENDPOINT: &str = "system-notifications";

/// Typed access to the management server's assets and labels.
pub struct CentraClient {
    session: Session,
}

impl CentraClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// True if the server answers API calls.
    pub async fn is_connected(&self) -> bool {
        self.session.is_connected().await
    }

    pub async fn logout(&self) -> Result<(), Error> {
        self.session.logout().await
    }

    pub async fn system_notifications(&self) -> Result<Value, Error> {
        self.session.query(Request::get(NOTIFICATIONS_ENDPOINT)).await
    }

    // ── Assets ───────────────────────────────────────────────────────

    /// Stream assets one by one, fetching pages as the stream is polled.
    pub fn assets(&self, query: AssetQuery) -> impl Stream<Item = Result<Asset, Error>> + '_ {
        let mut request = PageRequest::new(ASSETS_ENDPOINT).objects_per_page(query.objects_per_page);
        request.params = query.params();
        request.stop_after = query.limit;
        self.objects(request)
    }

    // ── Labels ───────────────────────────────────────────────────────

    pub fn labels(&self, query: LabelQuery) -> impl Stream<Item = Result<Label, Error>> + '_ {
        let mut request = PageRequest::new(LABELS_ENDPOINT).objects_per_page(query.objects_per_page);
        request.params = query.params();
        request.stop_after = query.limit;
        self.objects(request)
    }

    /// Put the `key: value` label on the given assets and return the
    /// label's id.
    ///
    /// Assets already carrying a label with the same key are moved to the
    /// new label by the server.
    pub async fn add_label_to_assets<S: AsRef<str>>(
        &self,
        asset_ids: &[S],
        key: &str,
        value: &str,
    ) -> Result<String, Error> {
        let vms: Vec<&str> = asset_ids.iter().map(AsRef::as_ref).collect();
        let endpoint = format!(
            "assets/labels/{}/{}",
            path_segment(key)?,
            path_segment(value)?
        );
        let request = Request::post(endpoint).json_value(json!({ "vms": vms }));
        let summary: LabelSummary = self.session.query_as(request).await?;
        Ok(summary.id)
    }

    /// Delete a label given as `"Key: Value"`; returns the deleted id.
    pub async fn delete_label_by_name(&self, name: &str) -> Result<String, Error> {
        let (key, value) = name.split_once(':').ok_or_else(|| Error::BadRequest {
            message: format!("label name {name:?} is not of the form \"Key: Value\""),
        })?;
        self.delete_label_by_key_value(key.trim(), value.trim()).await
    }

    /// Delete the single label with this key and value; returns its id.
    ///
    /// Fails with [`Error::ObjectNotFound`] when no label matches and
    /// [`Error::AmbiguousMatch`] when several do.
    pub async fn delete_label_by_key_value(&self, key: &str, value: &str) -> Result<String, Error> {
        let labels: Vec<Label> = self
            .labels(LabelQuery::key_value(key, value))
            .try_collect()
            .await?;

        let id = match labels.as_slice() {
            [] => {
                return Err(Error::ObjectNotFound {
                    message: format!("the label '{key}: {value}' was not found"),
                });
            }
            [label] => label.id.clone(),
            many => {
                return Err(Error::AmbiguousMatch {
                    message: format!(
                        "{} labels match key={key} and value={value}",
                        many.len()
                    ),
                });
            }
        };

        debug!("deleting label {id} ({key}: {value})");
        let endpoint = format!("{LABELS_ENDPOINT}/{}", path_segment(&id)?);
        self.session.query(Request::delete(endpoint)).await?;
        Ok(id)
    }

    fn objects<T: DeserializeOwned>(
        &self,
        request: PageRequest,
    ) -> impl Stream<Item = Result<T, Error>> + '_ {
        self.session
            .paginate_objects(request)
            .map(|object| object.and_then(decode))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// One API call, kept as a value so redirects and re-authentication can
/// re-issue it unchanged.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) data: Option<Value>,
    pub(crate) files: Vec<Attachment>,
}

/// A file sent as one part of a multipart upload.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub content: Bytes,
    pub mime: Option<String>,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Vec::new(),
            data: None,
            files: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Append a query parameter. Repeating a key sends it repeatedly.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Set the JSON body.
    pub fn json(mut self, data: &impl Serialize) -> Result<Self, Error> {
        let value = serde_json::to_value(data).map_err(|e| Error::Deserialization {
            message: format!("request body is not JSON-serializable: {e}"),
            body: String::new(),
        })?;
        self.data = Some(value);
        Ok(self)
    }

    /// Set an already-built JSON body.
    pub fn json_value(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a file; the request is then sent as multipart form data.
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.files.push(attachment);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replace (not append) a query parameter.
    pub(crate) fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_owned(), value.to_string()));
        self
    }

    /// The management API accepts only these five methods.
    pub(crate) fn checked_method(&self) -> Result<Method, Error> {
        const SUPPORTED: [Method; 5] = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ];

        if SUPPORTED.contains(&self.method) {
            Ok(self.method.clone())
        } else {
            Err(Error::BadRequest {
                message: format!("unsupported HTTP method {}", self.method),
            })
        }
    }

    /// Build the multipart form for an upload. Top-level fields of an
    /// object body travel as text parts next to the files.
    pub(crate) fn multipart_form(&self) -> Result<reqwest::multipart::Form, Error> {
        let mut form = reqwest::multipart::Form::new();

        if let Some(Value::Object(fields)) = &self.data {
            for (key, value) in fields {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(key.clone(), text);
            }
        }

        for file in &self.files {
            let mut part = reqwest::multipart::Part::bytes(file.content.to_vec())
                .file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime).map_err(|e| Error::BadRequest {
                    message: format!("invalid MIME type {mime:?}: {e}"),
                })?;
            }
            form = form.part(file.field.clone(), part);
        }

        Ok(form)
    }
}

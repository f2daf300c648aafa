//! HTTP client for the phonebook REST API
//!
//! A thin wrapper over `reqwest` bound to one base URL. It builds requests,
//! attaches the authorization header when asked to, and turns non-success
//! statuses into transport errors. It never retries.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::PhotoUpload;

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable to override the backend base URL.
/// Set this to point the client at a staging server or a mock.
pub const BASE_URL_ENV: &str = "PHONEBOOK_API_URL";

/// Request timeout for every call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL, e.g. `http://localhost:8080/api`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/users/42`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unauthenticated request
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        self.client.request(method, self.url(path))
    }

    /// Request carrying an `Authorization` header with the given value
    pub fn authorized(&self, method: Method, path: &str, auth_header: &str) -> RequestBuilder {
        self.request(method, path).header(AUTHORIZATION, auth_header)
    }
}

/// Send a request; non-success statuses become `Error::Transport`
pub async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "api request failed");
    }
    Ok(response.error_for_status()?)
}

/// Send a request and decode its JSON body
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = send(request).await?;
    Ok(response.json().await?)
}

/// Send a request and decode a JSON array body; `null` decodes as empty
pub async fn send_json_list<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>> {
    let items: Option<Vec<T>> = send_json(request).await?;
    Ok(items.unwrap_or_default())
}

/// Build a multipart body from text fields plus a `photo` file part
pub fn photo_form(fields: Vec<(&'static str, String)>, photo: PhotoUpload) -> Result<Form> {
    let part = Part::bytes(photo.bytes)
        .file_name(photo.file_name)
        .mime_str(&photo.content_type)?;
    let form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    Ok(form.part("photo", part))
}

fn validate_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|e| Error::config(format!("invalid API URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(Error::config(format!(
            "API URL must use http or https, got '{}'",
            other
        ))),
    }
}

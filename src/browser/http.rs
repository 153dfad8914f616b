//! HTTP listing endpoint client.
//!
//! `GET <endpoint>?path=<folder>` answers `{"items":[...],"path":"..."}` on
//! success and `{"error":"..."}` otherwise.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::entry::{EntryKind, TreeEntry, normalize_listing};
use super::error::FetchError;
use super::path::TreePath;
use super::source::TreeSource;

#[derive(Debug, Deserialize)]
struct ListingBody {
    #[serde(default)]
    items: Vec<WireItem>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(rename = "isFile", default)]
    is_file: Option<bool>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    url: Option<String>,
}

impl WireItem {
    fn kind(&self) -> EntryKind {
        match self.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("folder" | "directory" | "dir") => EntryKind::Folder,
            Some("file") => EntryKind::File,
            _ => match (self.is_file, self.size) {
                (Some(true), _) | (None, Some(_)) => EntryKind::File,
                _ => EntryKind::Folder,
            },
        }
    }

    /// Paths are re-derived from the requested folder; whatever the server
    /// sent in `path` is ignored.
    fn into_entry(self, parent: &TreePath) -> TreeEntry {
        match self.kind() {
            EntryKind::Folder => TreeEntry::folder(parent, &self.name),
            EntryKind::File => {
                TreeEntry::file(parent, &self.name, self.size.unwrap_or(0), self.url)
            }
        }
    }
}

/// Decodes a successful listing body for `parent`.
pub fn decode_listing(parent: &TreePath, body: &str) -> Result<Vec<TreeEntry>, FetchError> {
    let parsed: ListingBody =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    if let Some(message) = parsed.error {
        return Err(FetchError::Backend(message));
    }
    let entries = parsed
        .items
        .into_iter()
        .map(|item| item.into_entry(parent))
        .collect();
    Ok(normalize_listing(entries))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ListingBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpListingSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("studio-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }
}

impl TreeSource for HttpListingSource {
    fn list(&self, path: &TreePath) -> Result<Vec<TreeEntry>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, path = %path, "requesting listing");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("path", path.as_str())])
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    FetchError::Timeout(self.timeout)
                } else {
                    FetchError::Network(err.to_string())
                }
            })?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                message: error_message(&body),
            });
        }
        decode_listing(path, &body)
    }
}

use bytes::Bytes;
use log::info;
use reqwest::{Client, Url};
use std::fmt;
use std::time::Duration;

// A downloaded input to forward to a remote space.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResource {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The host answered with a non-success status.
    Status { kind: String, code: u16, reason: String },
    /// The body is not of the expected media type.
    MediaType { kind: String },
    /// The host could not be reached or the body could not be read.
    Transport { kind: String, message: String },
}

impl FetchError {
    /// Whether the caller supplied a bad resource, as opposed to the gateway failing to get it.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FetchError::Transport { .. })
    }

    fn kind(&self) -> &str {
        match self {
            FetchError::Status { kind, .. } | FetchError::MediaType { kind } | FetchError::Transport { kind, .. } => kind,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error fetching {} from URL: ", self.kind())?;
        match self {
            FetchError::Status { kind, code, reason } => write!(f, "Failed to fetch {}: {} {}", kind, code, reason),
            FetchError::MediaType { kind } => write!(f, "URL does not point to a valid {} file", kind),
            FetchError::Transport { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FetchError {}

/// "image/" -> "image"
pub fn media_kind(expected_prefix: &str) -> String {
    let kind = expected_prefix.trim_end_matches('/');
    if kind.is_empty() {
        "resource".to_string()
    } else {
        kind.to_string()
    }
}

pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .unwrap_or_else(|| "upload".to_string())
}

/// Downloads source media (images, audio) referenced by URL in a request.
#[derive(Clone)]
pub struct ResourceFetcher {
    client: Client,
}

impl ResourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("Failed to build HTTP client: {}", err))?;
        Ok(ResourceFetcher { client })
    }

    pub async fn fetch_typed_resource(&self, url: &Url, expected_prefix: &str) -> Result<FetchedResource, FetchError> {
        let kind = media_kind(expected_prefix);
        info!("Fetching {} from {}", kind, url);

        let response = self.client.get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Transport { kind: kind.clone(), message: err.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = response.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if content_type.is_empty() || !content_type.starts_with(expected_prefix) {
            return Err(FetchError::MediaType { kind });
        }

        let bytes = response.bytes()
            .await
            .map_err(|err| FetchError::Transport { kind: kind.clone(), message: err.to_string() })?;

        Ok(FetchedResource {
            bytes,
            content_type,
            file_name: file_name_from_url(url),
        })
    }
}

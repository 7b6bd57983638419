//! HTTP request/response model shared by the worker and the cache stores
//!
//! These types are wire-neutral: the worker reasons about requests and
//! responses without committing to a client library, and the disk store
//! persists `StoredResponse` without caring who produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EdgeError;

/// HTTP methods the worker can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = EdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            other => Err(EdgeError::User(format!("Unsupported HTTP method: {other}"))),
        }
    }
}

/// Whether a request is a page load or a subresource fetch
///
/// Navigation requests are the only ones eligible for the offline shell
/// fallback when the network is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
    Navigate,
    #[default]
    Resource,
}

/// A request as seen by the interception policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
}

impl FetchRequest {
    pub fn new(method: Method, url: impl Into<String>, mode: RequestMode) -> Self {
        Self {
            method,
            url: url.into(),
            mode,
        }
    }

    /// Plain GET for a subresource
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, RequestMode::Resource)
    }

    /// GET for a page load
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, RequestMode::Navigate)
    }

    /// Cache identity: method plus full URL
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// A response flowing back through the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Success range per the interception policy (only these get cached)
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Case-insensitive header lookup, first match wins
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The synthetic response served when the network is down and no
    /// cached fallback exists: 408 Request Timeout with a plain-text body.
    pub fn network_error() -> Self {
        Self {
            status: 408,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: b"Network error".to_vec(),
        }
    }
}

/// A response at rest in a cache partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

impl StoredResponse {
    pub fn from_response(resp: &Response) -> Self {
        Self {
            status: resp.status,
            headers: resp.headers.clone(),
            body: resp.body.clone(),
            stored_at: Utc::now(),
        }
    }

    pub fn to_response(&self) -> Response {
        Response {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.body.len()
    }
}

/// Who produced the bytes the caller received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// Served from the current partition (revalidation runs behind it)
    Cache,
    /// Fetched from the network in the foreground
    Network,
    /// Not intercepted; forwarded untouched
    Bypass,
    /// Offline fallback: the cached root document
    Shell,
    /// Offline fallback: the synthetic 408
    Synthetic,
}

impl ResponseSource {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Network => "network",
            Self::Bypass => "bypass",
            Self::Shell => "shell",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// What `Worker::handle_fetch` hands back to the host
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: Response,
    pub source: ResponseSource,
}

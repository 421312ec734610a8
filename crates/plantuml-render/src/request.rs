//! Render request construction
//!
//! The public PlantUML server only renders diagrams passed in the URL, so a
//! request without an explicit server is an encoded GET. An explicit server is
//! assumed to be self-hosted and configured to accept the source as a POST
//! body; that assumption is not probed.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};

use crate::encoding;
use crate::error::Result;

/// Default PlantUML server URL
pub const DEFAULT_SERVER: &str = "https://www.plantuml.com/plantuml";

/// A single SVG render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderRequest {
    /// `GET {server}/svg/{token}`
    Get { url: String },
    /// `POST {server}/svg` with the raw source as body
    Post { url: String, body: String },
}

impl RenderRequest {
    /// Choose the request for `source`
    ///
    /// `server` is the explicit server base, if the caller gave one.
    /// `default_server` is used for the encoded GET otherwise.
    pub fn new(source: &str, server: Option<&str>, default_server: &str) -> Result<Self> {
        match server {
            None => Ok(Self::Get {
                url: format!(
                    "{}/svg/{}",
                    trim_base(default_server),
                    encoding::encode(source)?
                ),
            }),
            Some(base) => Ok(Self::Post {
                url: format!("{}/svg", trim_base(base)),
                body: source.to_string(),
            }),
        }
    }

    /// HTTP method of this request
    pub fn method(&self) -> Method {
        match self {
            Self::Get { .. } => Method::GET,
            Self::Post { .. } => Method::POST,
        }
    }

    /// Target URL
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::Post { url, .. } => url,
        }
    }

    /// Request body, for POST requests
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Get { .. } => None,
            Self::Post { body, .. } => Some(body),
        }
    }

    /// Build a fresh reqwest request; called once per attempt
    pub(crate) fn build(&self, client: &Client) -> RequestBuilder {
        match self {
            Self::Get { url } => client.get(url),
            Self::Post { url, body } => client
                .post(url)
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(body.clone()),
        }
    }
}

pub(crate) fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

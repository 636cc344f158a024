//! # pms-client
//!
//! HTTP client for the remote PMS change-request API.
//!
//! Every endpoint under `/api/change-requests` has a method on
//! [`ChangeRequestClient`]. Responses are decoded into the `pms-core` entity
//! types so local and remote requests share one shape.

mod change_requests;
mod error;
mod http;

pub use change_requests::ListQuery;
pub use error::ClientError;

use std::time::Duration;

/// Path prefix of the change-request resource.
pub const CHANGE_REQUESTS_PATH: &str = "/api/change-requests";

/// HTTP client for the change-request API of one PMS server.
#[derive(Debug, Clone)]
pub struct ChangeRequestClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ChangeRequestClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// `http(s)` URL, or [`ClientError::Http`] if the underlying
    /// `reqwest::Client` fails to build.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("pms/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{CHANGE_REQUESTS_PATH}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "change-request API call");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

use std::time::Duration;

use log::{debug, error};
use reqwest::header::USER_AGENT;
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;

use crate::board::Board;
use crate::error::Error;
use crate::models::catalog::Catalog;
use crate::models::thread::Thread;
use crate::result::Result;

/// Base URL of the production read-only API.
const API_BASE: &str = "https://a.4cdn.org";

/// `User-Agent` sent with every request.
const AGENT: &str = concat!("chanfetch/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the read-only API.
///
/// Wraps a single connection-pooling [`reqwest::Client`] reused for every
/// request of a session. Calls are stateless request/response exchanges, so
/// one `Client` is safely shared across concurrent fetches without locking.
#[derive(Debug)]
pub struct Client {
    http: ReqwestClient,
    api_base: String,
}

impl Client {
    /// Creates a client against the production API.
    pub fn new() -> Self {
        Self::with_api_base(API_BASE)
    }

    /// Creates a client against a custom API base URL, e.g. a local
    /// stand-in server in tests.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            api_base: api_base.into(),
        }
    }

    /// Fetches the full catalog of `board`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`], [`Error::UnexpectedStatus`], or
    /// [`Error::Decode`] when the request fails, the API answers with a
    /// non-success status, or the body is not a catalog.
    pub async fn catalog(&self, board: &Board) -> Result<Catalog> {
        let url = format!("{}/{board}/catalog.json", self.api_base);
        self.fetch_json(&url).await
    }

    /// Fetches thread `thread_no` of `board`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::catalog`], scoped to this thread.
    pub async fn thread(&self, board: &Board, thread_no: u64) -> Result<Thread> {
        let url = format!("{}/{board}/thread/{thread_no}.json", self.api_base);
        self.fetch_json(&url).await
    }

    async fn fetch_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("request for {url} dispatched");
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!("error fetching {url}: {e}");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("unexpected status {status} from {url}");
            return Err(Error::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!("error reading response from {url}: {e}");
            e
        })?;
        serde_json::from_slice(&body).map_err(|source| {
            error!("error decoding response from {url}: {source}");
            Error::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

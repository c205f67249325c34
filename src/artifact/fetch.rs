//! Artifact retrieval
//!
//! The build only needs "give me a byte stream for this URI". `Fetcher` is
//! that seam: `HttpFetcher` talks to the network, `MemoryFetcher` serves
//! canned responses.

use crate::config::schema::HttpConfig;
use crate::error::{BuildpackError, BuildpackResult};
use crate::ui::{DownloadProgress, UiContext};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, info};
use ureq::http::StatusCode;
use ureq::Agent;

/// Retrieve the bytes behind a URI
pub trait Fetcher {
    /// Open a stream over the artifact at `uri`.
    ///
    /// Fails with `FetchStatus` for any response other than 200 OK and with
    /// `Fetch` for transport failures. The returned reader owns the
    /// underlying connection.
    fn fetch(&self, uri: &str) -> BuildpackResult<Box<dyn Read + Send>>;
}

/// Blocking HTTP fetcher backed by a `ureq` agent
pub struct HttpFetcher {
    agent: Agent,
    ui: UiContext,
}

impl HttpFetcher {
    /// Create a fetcher from the `[http]` configuration section
    pub fn new(config: &HttpConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(config.timeout_secs.map(Duration::from_secs))
            .http_status_as_error(false)
            .user_agent(config.user_agent.as_str())
            .build()
            .new_agent();
        Self {
            agent,
            ui: UiContext::non_interactive(),
        }
    }

    /// Show a download spinner when the context is interactive
    pub fn with_ui(mut self, ui: UiContext) -> Self {
        self.ui = ui;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str) -> BuildpackResult<Box<dyn Read + Send>> {
        info!(uri, "fetching artifact");
        let response = self.agent.get(uri).call().map_err(|e| BuildpackError::Fetch {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BuildpackError::FetchStatus {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let length = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        debug!(uri, ?length, "artifact response accepted");

        let body = response.into_body().into_reader();
        Ok(DownloadProgress::wrap(&self.ui, length, body))
    }
}

/// Canned response for `MemoryFetcher`
#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// In-memory fetcher: serves registered bodies, 404 for anything else
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Canned>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `uri`
    pub fn with_body(mut self, uri: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(uri.into(), Canned::Body(body.into()));
        self
    }

    /// Answer `uri` with a non-success status
    pub fn with_status(mut self, uri: impl Into<String>, status: u16) -> Self {
        self.responses.insert(uri.into(), Canned::Status(status));
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, uri: &str) -> BuildpackResult<Box<dyn Read + Send>> {
        match self.responses.get(uri) {
            Some(Canned::Body(body)) => Ok(Box::new(Cursor::new(body.clone()))),
            Some(Canned::Status(status)) => Err(BuildpackError::FetchStatus {
                uri: uri.to_string(),
                status: *status,
            }),
            None => Err(BuildpackError::FetchStatus {
                uri: uri.to_string(),
                status: 404,
            }),
        }
    }
}

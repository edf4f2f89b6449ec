use std::thread;
use std::time::Duration;

use crate::error::BggError;

const BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Time to wait before re-issuing a request the API reported as busy.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// BoardGameGeek XML API 2 endpoints used by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Collection,
    Plays,
    Thing,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Plays => "plays",
            Self::Thing => "thing",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Raw status and body of one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    pub status: u16,
    pub body: String,
}

impl SourceResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 202 (request queued, come back later) or 429 (throttled).
    pub fn is_busy(&self) -> bool {
        self.status == 202 || self.status == 429
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues a single GET against the source API.
pub trait SourceTransport {
    fn get(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Result<SourceResponse, BggError>;
}

/// Blocking HTTP transport for the public BoardGameGeek API.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Result<Self, BggError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, BggError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl SourceTransport for HttpTransport {
    fn get(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Result<SourceResponse, BggError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint.path()))
            .query(params)
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(SourceResponse { status, body })
    }
}

/// Wraps a transport with retry-on-busy.
///
/// Busy responses are retried after a fixed sleep. By default there is no
/// attempt limit: a request the API keeps queueing blocks the calling thread
/// until it completes. Any other status, and any transport error, is handed
/// back to the caller unchanged.
pub struct RateLimitedFetcher<T> {
    transport: T,
    retry_interval: Duration,
    max_attempts: Option<u32>,
}

impl<T: SourceTransport> RateLimitedFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            retry_interval: RETRY_INTERVAL,
            max_attempts: None,
        }
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Cap the number of attempts per request. `None` (the default) retries
    /// forever. When the cap is hit the last busy response is returned.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts.filter(|&n| n > 0);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<SourceResponse, BggError> {
        let mut attempts: u32 = 1;
        let mut response = self.transport.get(endpoint, params)?;

        while response.is_busy() {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                log::warn!(
                    "{} still busy (HTTP {}) after {} attempts, giving up",
                    endpoint,
                    response.status,
                    attempts
                );
                break;
            }
            log::debug!(
                "{} busy (HTTP {}), retrying in {:?}",
                endpoint,
                response.status,
                self.retry_interval
            );
            thread::sleep(self.retry_interval);
            response = self.transport.get(endpoint, params)?;
            attempts += 1;
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;

//! HTTP page fetching behind a small trait seam.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: Core trait defining a single bounded GET
//! - [`HttpFetcher`]: `reqwest`-backed implementation used in production
//! - [`FetchOutcome`]: Typed result; transport problems are values, not errors
//!
//! Nothing here retries. A failed fetch yields nothing for that page on this
//! cycle and gets another chance on the next one.

use async_trait::async_trait;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Desktop browser user agent. Several portals reject or degrade requests
/// carrying a default or empty agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Result of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered. Any status, including 4xx/5xx.
    Ok { status: u16, body: String },
    TimedOut,
    NetworkError { cause: String },
}

impl FetchOutcome {
    /// The body, but only for a `200 OK` answer.
    pub fn ok_body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Ok { status: 200, body } => Some(body.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Ok { status, body } => {
                write!(f, "HTTP {} ({} bytes)", status, body.len())
            }
            FetchOutcome::TimedOut => write!(f, "timed out"),
            FetchOutcome::NetworkError { cause } => write!(f, "network error: {}", cause),
        }
    }
}

/// Trait for issuing one GET with a caller-chosen timeout.
///
/// Implementations must follow redirects and must not retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome;
}

/// Production fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the browser user agent and default redirect policy.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> FetchOutcome {
    if err.is_timeout() {
        FetchOutcome::TimedOut
    } else {
        FetchOutcome::NetworkError {
            cause: err.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        let t0 = Instant::now();
        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => return classify(e),
        };

        let status = response.status().as_u16();
        let outcome = match response.text().await {
            Ok(body) => FetchOutcome::Ok { status, body },
            Err(e) => classify(e),
        };

        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            outcome = %outcome,
            "Fetch finished"
        );
        outcome
    }
}

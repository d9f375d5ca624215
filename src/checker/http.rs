// src/checker/http.rs
// =============================================================================
// This module checks if external URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Follows redirects, bounded so a redirect loop ends in an error
// - Turns transport failures (timeout, DNS, TLS, ...) into readable reasons
//
// The probe sits behind the LinkProbe trait so the validator can run against
// a real network (HttpProbe) or against a scripted stand-in in tests.
//
// Rust concepts:
// - async/await: For network I/O
// - Traits: LinkProbe is the seam between the validator and the network
// - Enums: To represent the different probe outcomes
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How many redirects we follow before calling it a loop.
pub const MAX_REDIRECTS: usize = 10;

/// Why a probe produced no HTTP status at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Could not resolve hostname: {0}")]
    DnsError(String),
    #[error("SSL certificate error: {0}")]
    SslError(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("{0}")]
    Other(String),
}

/// What came back from probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered; this is the final status after redirects.
    Status(u16),
    /// No answer.
    Failed(ProbeFailure),
}

/// Checks whether an external URL exists.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// LinkProbe backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    // Creates an HTTP client with the given per-request timeout
    //
    // We reuse this client for every link in a run (connection pooling)
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("markdown-link-guardian/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        // Parse first: a malformed URL is reported as such instead of as
        // whatever reqwest's builder would say about it
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => return ProbeOutcome::Failed(ProbeFailure::InvalidUrl(e.to_string())),
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return ProbeOutcome::Failed(ProbeFailure::UnsupportedScheme(
                parsed.scheme().to_string(),
            ));
        }

        match self.client.head(parsed).send().await {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(e) => ProbeOutcome::Failed(categorize_error(&e)),
        }
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
fn categorize_error(error: &reqwest::Error) -> ProbeFailure {
    // The useful detail is usually in the source chain, not the top error
    let detail = error_chain(error);
    let lowered = detail.to_lowercase();

    if error.is_timeout() {
        ProbeFailure::Timeout(detail)
    } else if error.is_redirect() {
        ProbeFailure::TooManyRedirects
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if lowered.contains("dns") {
            ProbeFailure::DnsError(detail)
        } else {
            ProbeFailure::Connection(detail)
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") || lowered.contains("tls") {
        ProbeFailure::SslError(detail)
    } else {
        ProbeFailure::Other(detail)
    }
}

// Joins an error and all of its sources into one line
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Trait methods that are async need a little help to be usable
//      behind a pointer like &dyn LinkProbe
//    - The macro rewrites `async fn` into a method returning a boxed future
//
// 2. Why HEAD and not GET?
//    - HEAD asks for the headers only, so nothing is downloaded
//    - We only care about the status code
//
// 3. Why Send + Sync on the trait?
//    - The probe is shared by reference across .await points
//    - tokio may move the task between threads, so everything it holds must
//      be safe to send and share
// -----------------------------------------------------------------------------

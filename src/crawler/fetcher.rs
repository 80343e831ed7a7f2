//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Validating website cells before anything is sent
//! - Classifying failures (malformed URL, timeout, network, non-2xx)
//!
//! Every failure is final for the row; nothing is retried within a session.

use crate::config::Config;
use reqwest::Client;
use std::fmt;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The row is recorded as a failure
    Failed(FetchFailure),
}

/// Why a website could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The website cell is not an absolute http(s) URL
    MalformedUrl(String),

    /// No complete response within the configured timeout
    Timeout,

    /// Connection refused, DNS failure, TLS error, broken body...
    Network(String),

    /// The server answered with a non-2xx status
    HttpStatus(u16),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedUrl(reason) => write!(f, "malformed URL: {}", reason),
            Self::Timeout => write!(f, "request timeout"),
            Self::Network(error) => write!(f, "network error: {}", error),
            Self::HttpStatus(code) => write!(f, "HTTP status {}", code),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The timeout bounds the whole request, body included.
pub fn build_http_client(settings: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.header_value())
        .timeout(settings.crawler.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Checks that a website cell is an absolute http(s) URL
pub fn parse_website(website: &str) -> Result<Url, FetchFailure> {
    let url = Url::parse(website.trim()).map_err(|e| FetchFailure::MalformedUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchFailure::MalformedUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Fetches a website's landing page
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `website` - The raw website cell from the input row
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, website: &str) -> FetchResult {
    let url = match parse_website(website) {
        Ok(url) => url,
        Err(failure) => return FetchResult::Failed(failure),
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchResult::Failed(classify_error(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::Failed(FetchFailure::HttpStatus(status.as_u16()));
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::Failed(classify_error(&e)),
    }
}

fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_builder() {
        FetchFailure::MalformedUrl(error.to_string())
    } else {
        FetchFailure::Network(error.to_string())
    }
}

//! Crawler module for fetching and processing input rows
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - Pacing between rows
//! - The checkpointed crawl loop

mod coordinator;
mod fetcher;
mod pacer;

pub use coordinator::{run_session, Coordinator};
pub use fetcher::{build_http_client, fetch_url, parse_website, FetchFailure, FetchResult};
pub use pacer::Pacer;

//! Fixed pause between processed rows
//!
//! The pause follows every row, success or failure alike. It only throttles
//! the request rate and has no bearing on what gets recorded.

use crate::config::CrawlerConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    delay: Option<Duration>,
}

impl Pacer {
    pub fn new(delay: Option<Duration>) -> Self {
        Self {
            delay: delay.filter(|d| !d.is_zero()),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.rate_limit())
    }

    /// Sleeps for the configured delay, if any
    pub async fn pause(&self) {
        if let Some(delay) = self.delay {
            tracing::trace!("Pausing {:?} before the next row", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Site-Prospector
///
/// The whole structure is also embedded in the checkpoint, so a resumed
/// session keeps running with the settings it was started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
}

/// Source dataset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the input CSV file
    pub path: String,

    /// Column holding the site URL
    #[serde(rename = "website-column", default = "default_website_column")]
    pub website_column: String,

    /// Column holding already known emails (ledger seeding)
    #[serde(rename = "email-column", default = "default_email_column")]
    pub email_column: String,

    /// Column holding already known phone numbers (ledger seeding)
    #[serde(rename = "phone-column", default = "default_phone_column")]
    pub phone_column: String,
}

/// Output locations, all relative to `directory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Extracted rows (CSV, appended to)
    #[serde(rename = "data-file", default = "default_data_file")]
    pub data_file: String,

    /// Per-row outcome log
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: String,

    /// Serialized crawl state
    #[serde(rename = "checkpoint-file", default = "default_checkpoint_file")]
    pub checkpoint_file: String,
}

impl OutputConfig {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.data_file)
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.log_file)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.checkpoint_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            data_file: default_data_file(),
            log_file: default_log_file(),
            checkpoint_file: default_checkpoint_file(),
        }
    }
}

/// Crawl loop behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of rows processed per session
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Upper bound on a single page fetch (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after every processed row (milliseconds)
    #[serde(rename = "rate-limit-ms", default)]
    pub rate_limit_ms: Option<u64>,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit(&self) -> Option<Duration> {
        self.rate_limit_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Contact deduplication configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Report only emails/phones not seen before; when false every match is reported
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seed the known sets from the input's email/phone columns (columns become required)
    #[serde(rename = "seed-from-input", default = "default_true")]
    pub seed_from_input: bool,
}

impl DedupConfig {
    pub fn seeds_from_input(&self) -> bool {
        self.enabled && self.seed_from_input
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed_from_input: true,
        }
    }
}

fn default_website_column() -> String {
    "website".to_string()
}

fn default_email_column() -> String {
    "email".to_string()
}

fn default_phone_column() -> String {
    "phone".to_string()
}

fn default_output_directory() -> String {
    "./run/".to_string()
}

fn default_data_file() -> String {
    "extracted_data.csv".to_string()
}

fn default_log_file() -> String {
    "logs.log".to_string()
}

fn default_checkpoint_file() -> String {
    "progression.json".to_string()
}

fn default_limit() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_crawler_name() -> String {
    "SiteProspector".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_true() -> bool {
    true
}

//! Configuration module for Site-Prospector
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_prospector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("prospector.toml")).unwrap();
//! println!("Rows per session: {}", config.crawler.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DedupConfig, InputConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

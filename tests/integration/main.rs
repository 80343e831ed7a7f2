//! Integration tests for site-prospector
//!
//! These tests use wiremock to serve landing pages and tempfile directories
//! for the input, output and checkpoint files.

mod common;
mod crawl_tests;
mod resume_tests;

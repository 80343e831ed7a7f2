//! Append-only log of per-row outcomes
//!
//! One line per processed row: `website , outcome , YYYY-MM-DD HH:MM:SS`.
//! The file is only ever written, never read back by the crawler.

use crate::output::traits::OutputResult;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct CrawlLog {
    path: PathBuf,
    file: File,
}

impl CrawlLog {
    pub fn open(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one outcome line stamped with the local time
    pub fn record(&mut self, website: &str, outcome: &str) -> OutputResult<()> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.file, "{} , {} , {}", website, outcome, now)?;
        self.file.flush()?;
        Ok(())
    }
}

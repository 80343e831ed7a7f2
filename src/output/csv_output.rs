//! Append-only CSV output of extracted rows

use crate::output::traits::{OutputError, OutputResult};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Writer appending one row per processed input row
///
/// The file is opened in append mode so rows written by earlier sessions are
/// never touched. Every row is flushed before the call returns; the checkpoint
/// is only advanced afterwards.
pub struct CsvOutput {
    path: PathBuf,
    writer: csv::Writer<File>,
    width: Option<usize>,
}

impl CsvOutput {
    /// Opens (or creates) the output file for appending
    pub fn open(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            width: None,
        })
    }

    /// Empties the output file (fresh runs only)
    pub fn truncate(path: &Path) -> OutputResult<()> {
        if path.exists() {
            File::create(path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when nothing has been written to the file yet
    pub fn is_empty(&self) -> OutputResult<bool> {
        Ok(fs::metadata(&self.path)?.len() == 0)
    }

    /// Writes the header row; only valid on an empty file
    pub fn write_header(&mut self, header: &[String]) -> OutputResult<()> {
        if !self.is_empty()? {
            return Err(OutputError::Write(format!(
                "refusing to write a header into non-empty {}",
                self.path.display()
            )));
        }
        self.width = Some(header.len());
        self.append(header)
    }

    /// Appends one data row and flushes it to disk
    pub fn write_row(&mut self, cells: &[String]) -> OutputResult<()> {
        if let Some(width) = self.width {
            if cells.len() != width {
                return Err(OutputError::Write(format!(
                    "row has {} cells, header has {}",
                    cells.len(),
                    width
                )));
            }
        }
        self.append(cells)
    }

    /// Sets the expected row width when the header was written by an earlier session
    pub fn expect_width(&mut self, width: usize) {
        self.width = Some(width);
    }

    fn append(&mut self, cells: &[String]) -> OutputResult<()> {
        self.writer.write_record(cells)?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}

/// Contents of an existing output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputRows {
    /// Values of `column` for the data rows starting at `first_row`
    pub fn column_from(&self, column: &str, first_row: usize) -> Vec<&str> {
        let Some(position) = self.header.iter().position(|h| h == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .skip(first_row)
            .filter_map(|row| row.get(position).map(String::as_str))
            .collect()
    }
}

/// Reads an output file back: header plus data rows
///
/// A missing or empty file yields no header and no rows.
pub fn read_data_rows(path: &Path) -> OutputResult<OutputRows> {
    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Ok(OutputRows::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let header = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(OutputRows { header, rows })
}

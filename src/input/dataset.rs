use crate::config::InputConfig;
use crate::extract::normalize_phone;
use crate::{ConfigError, ProspectorError};
use std::path::{Path, PathBuf};

/// One input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// 0-based position in the file, header excluded
    pub index: usize,

    /// Cells, padded or cut to the header width
    pub cells: Vec<String>,
}

/// Column positions resolved from the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    website: usize,
    email: Option<usize>,
    phone: Option<usize>,
}

/// The source dataset, loaded in file order
#[derive(Debug, Clone)]
pub struct InputDataset {
    path: PathBuf,
    header: Vec<String>,
    records: Vec<InputRecord>,
    columns: Columns,
    /// Rows that had more cells than the header, with their extra cells
    overflow: Vec<(usize, Vec<String>)>,
}

impl InputDataset {
    /// Opens and validates the input file
    ///
    /// # Arguments
    ///
    /// * `config` - Input path and column names
    /// * `require_seed_columns` - Also require the email and phone columns
    ///
    /// # Returns
    ///
    /// * `Ok(InputDataset)` - The file was read and has the required columns
    /// * `Err(ProspectorError::Config)` - A required column is missing
    /// * `Err(ProspectorError::Csv)` - The file could not be read
    pub fn open(config: &InputConfig, require_seed_columns: bool) -> Result<Self, ProspectorError> {
        let path = Path::new(&config.path);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let position = |column: &str| header.iter().position(|h| h == column);
        let missing = |column: &str| ConfigError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        };

        let website = position(&config.website_column).ok_or_else(|| missing(&config.website_column))?;
        let email = position(&config.email_column);
        let phone = position(&config.phone_column);

        if require_seed_columns {
            if email.is_none() {
                return Err(missing(&config.email_column).into());
            }
            if phone.is_none() {
                return Err(missing(&config.phone_column).into());
            }
        }

        // Output rows are input cells followed by the pipeline fields, so
        // every row is fitted to the header width
        let width = header.len();
        let mut records = Vec::new();
        let mut overflow = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let mut cells: Vec<String> = row?.iter().map(str::to_string).collect();
            if cells.len() > width {
                let extra = cells.split_off(width);
                tracing::warn!(
                    "Row {} of {} has {} cell(s) past the header, left out of the output: {:?}",
                    index,
                    path.display(),
                    extra.len(),
                    extra
                );
                overflow.push((index, extra));
            }
            cells.resize(width, String::new());
            records.push(InputRecord { index, cells });
        }

        tracing::info!("Loaded {} rows from {}", records.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            header,
            records,
            columns: Columns {
                website,
                email,
                phone,
            },
            overflow,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[InputRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows wider than the header, with the cells left out of the output
    pub fn overflow(&self) -> &[(usize, Vec<String>)] {
        &self.overflow
    }

    /// The website cell of a row, trimmed
    pub fn website<'a>(&self, record: &'a InputRecord) -> &'a str {
        record.cells[self.columns.website].trim()
    }

    /// Collects the known emails and phone numbers of every row
    ///
    /// Cells may hold several values separated by `,` or `;`. Phone numbers
    /// are normalized so they compare equal to extracted ones; those the
    /// normalizer rejects are skipped.
    pub fn seed_values(&self) -> (Vec<String>, Vec<String>) {
        let mut emails = Vec::new();
        let mut phones = Vec::new();

        for record in &self.records {
            if let Some(column) = self.columns.email {
                emails.extend(split_cell(&record.cells[column]).map(str::to_string));
            }
            if let Some(column) = self.columns.phone {
                phones.extend(split_cell(&record.cells[column]).filter_map(normalize_phone));
            }
        }

        (emails, phones)
    }
}

/// Splits a multi-valued cell on `,` and `;`, dropping blanks
pub fn split_cell(cell: &str) -> impl Iterator<Item = &str> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

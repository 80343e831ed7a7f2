use crate::state::{CrawlState, STATE_VERSION};
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Checkpoint stored as a pretty-printed JSON file
///
/// Writes go to `<file>.tmp` first and are renamed over the real file.
/// A file that cannot be parsed is moved aside to `<file>.corrupt` and the
/// session starts from a fresh state.
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the checkpoint without side effects
    ///
    /// Unlike [`CheckpointStore::load`], an unusable file is reported as an
    /// error and left where it is.
    pub fn peek(&self) -> StorageResult<Option<CrawlState>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn parse(content: &str) -> StorageResult<CrawlState> {
        let state: CrawlState = serde_json::from_str(content)?;
        if state.version != STATE_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: state.version,
                expected: STATE_VERSION,
            });
        }
        Ok(state)
    }

    fn quarantine(&self) -> StorageResult<PathBuf> {
        let target = self.sibling(".corrupt");
        fs::rename(&self.path, &target)?;
        Ok(target)
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn load(&self) -> StorageResult<Option<CrawlState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No checkpoint at {}, starting fresh", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match Self::parse(&content) {
            Ok(state) => {
                tracing::info!(
                    "Resuming from checkpoint {} ({} rows recorded)",
                    self.path.display(),
                    state.rows_recorded()
                );
                Ok(Some(state))
            }
            Err(e) => {
                let moved_to = self.quarantine()?;
                tracing::warn!(
                    "Checkpoint {} is unusable ({}); moved to {} and starting fresh",
                    self.path.display(),
                    e,
                    moved_to.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &CrawlState) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename
        let temp_path = self.sibling(".tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            "Checkpoint saved to {} (last index {})",
            self.path.display(),
            state.last_completed_index
        );
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

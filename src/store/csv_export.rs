//! CSV publisher: appends `(timestamp, text)` rows for downstream tools.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct CsvPublisher {
    path: PathBuf,
}

impl CsvPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row stamped with the current UTC time.
    pub fn publish(&self, text: &str) -> Result<(), StoreError> {
        self.publish_at(Utc::now(), text)
    }

    /// Append one row with an explicit timestamp.
    pub fn publish_at(&self, at: DateTime<Utc>, text: &str) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let timestamp = at.to_rfc3339_opts(SecondsFormat::Micros, true);
        writer.write_record([timestamp.as_str(), text])?;
        writer.flush().map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        info!(path = %self.path.display(), chars = text.len(), "Published row to CSV");
        Ok(())
    }
}

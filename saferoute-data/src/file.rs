//! Surveillance dataset read from a local JSON export.

use std::io;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use saferoute_core::{FacilityPoint, ProviderError, SurveillanceSource};
use serde::Deserialize;

use crate::records::{SurveillancePage, SurveillanceRecord, collect_surveillance};

/// Accepted layouts of a dataset export.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    /// Bare array of records.
    Records(Vec<SurveillanceRecord>),
    /// A saved API page with a `data` array.
    Page(SurveillancePage),
}

/// Surveillance source backed by a JSON file.
///
/// The file holds either a bare array of dataset records or a saved API
/// page. It is re-read on every fetch so edits are picked up without a
/// restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSurveillanceSource {
    path: Utf8PathBuf,
}

impl FileSurveillanceSource {
    /// Read the dataset from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the dataset file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, error: &impl ToString) -> ProviderError {
        ProviderError::Io {
            path: self.path.to_string(),
            message: error.to_string(),
        }
    }
}

fn read_dataset(path: &Utf8Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("dataset path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(name)
}

fn parse_dataset(contents: &str) -> Result<Vec<SurveillanceRecord>, ProviderError> {
    let parsed: DatasetFile =
        serde_json::from_str(contents).map_err(|err| ProviderError::Parse {
            message: err.to_string(),
        })?;
    match parsed {
        DatasetFile::Records(records) => Ok(records),
        DatasetFile::Page(page) => page.into_records(),
    }
}

#[async_trait]
impl SurveillanceSource for FileSurveillanceSource {
    async fn fetch_surveillance(&self) -> Result<Vec<FacilityPoint>, ProviderError> {
        let path = self.path.clone();
        let contents = tokio::task::spawn_blocking(move || read_dataset(&path))
            .await
            .map_err(|err| self.io_error(&err))?
            .map_err(|err| self.io_error(&err))?;
        let records = parse_dataset(&contents)?;
        log::debug!("read {} surveillance records from {}", records.len(), self.path);
        Ok(collect_surveillance(records))
    }
}

//! Filesystem-backed archive store

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::api::wire::{ArchiveDocument, ChargeDto};
use crate::remittance::{archive_file_name, ARCHIVE_PREFIX, ARCHIVE_SUFFIX};
use crate::traits::ArchiveStore;
use crate::types::{BillingError, BillingResult, Charge};

/// Archive store writing one JSON document per shipment period.
///
/// Files are named `remessa_<period>.json` and hold the client-facing charge
/// snapshots under a `cobrancas` key.
#[derive(Debug, Clone)]
pub struct FsArchiveStore {
    root: PathBuf,
}

impl FsArchiveStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ArchiveStore for FsArchiveStore {
    async fn append(&self, period: &str, charges: &[Charge]) -> BillingResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;

        let path = self.path_for(&archive_file_name(period));
        let mut document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<ArchiveDocument>(&bytes).map_err(|error| {
                BillingError::Storage(format!("Corrupt archive {}: {error}", path.display()))
            })?,
            Err(error) if error.kind() == ErrorKind::NotFound => ArchiveDocument::default(),
            Err(error) => return Err(io_error(error)),
        };

        document
            .cobrancas
            .extend(charges.iter().cloned().map(ChargeDto::from));

        // Rewritten whole so the file is always one well-formed JSON value
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|error| BillingError::Storage(error.to_string()))?;
        tokio::fs::write(&path, bytes).await.map_err(io_error)
    }

    async fn list(&self) -> BillingResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(io_error(error)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_SUFFIX) {
                names.push(name);
            }
        }

        // Period labels sort lexicographically, so descending name order is
        // newest first
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    async fn read(&self, name: &str) -> BillingResult<Vec<u8>> {
        // The name comes from a client path segment; keep it inside the root
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(BillingError::ArchiveNotFound(name.to_string()));
        }

        match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(BillingError::ArchiveNotFound(name.to_string()))
            }
            Err(error) => Err(io_error(error)),
        }
    }
}

fn io_error(error: std::io::Error) -> BillingError {
    BillingError::Storage(error.to_string())
}

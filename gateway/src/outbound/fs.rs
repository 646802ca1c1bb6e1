//! Filesystem blob sink.
//!
//! Native rendition of the staged-object save cycle: a downloaded payload
//! is written to a spool file, the save action copies it under its final
//! filename, and release removes the spool entry. Repeated downloads leave
//! nothing behind.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::error::GatewayError;
use crate::domain::ports::{BlobHandle, BlobSink};

/// Directory name staged payloads spool under, inside the save directory.
const SPOOL_DIR: &str = ".spool";

/// Blob sink writing saved downloads into one directory.
#[derive(Debug, Clone)]
pub struct SpoolBlobSink {
    save_dir: PathBuf,
    spool_dir: PathBuf,
}

impl SpoolBlobSink {
    /// Build a sink saving into `save_dir`.
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        let save_dir = save_dir.into();
        let spool_dir = save_dir.join(SPOOL_DIR);
        Self {
            save_dir,
            spool_dir,
        }
    }

    fn spool_path(&self, handle: &BlobHandle) -> PathBuf {
        self.spool_dir.join(handle.as_str())
    }
}

impl BlobSink for SpoolBlobSink {
    fn materialize(&self, bytes: &[u8], _content_type: &str) -> Result<BlobHandle, GatewayError> {
        ensure_dir(&self.spool_dir)?;
        let handle = BlobHandle::new(Uuid::new_v4().to_string());
        let path = self.spool_path(&handle);
        fs::write(&path, bytes)
            .map_err(|error| GatewayError::sink(format!("failed to stage payload: {error}")))?;
        Ok(handle)
    }

    fn trigger_save(&self, handle: &BlobHandle, filename: &str) -> Result<(), GatewayError> {
        ensure_dir(&self.save_dir)?;
        let target = self.save_dir.join(filename);
        fs::copy(self.spool_path(handle), &target).map_err(|error| {
            GatewayError::sink(format!(
                "failed to save as {}: {error}",
                target.display()
            ))
        })?;
        Ok(())
    }

    fn release(&self, handle: BlobHandle) {
        let path = self.spool_path(&handle);
        if let Err(error) = fs::remove_file(&path) {
            tracing::debug!(%error, path = %path.display(), "spool cleanup failed");
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), GatewayError> {
    fs::create_dir_all(dir)
        .map_err(|error| GatewayError::sink(format!("failed to create {}: {error}", dir.display())))
}

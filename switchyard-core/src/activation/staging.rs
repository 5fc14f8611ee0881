//! Staged writes of the live artifact.
//!
//! The staged file lives next to the target so the final rename never
//! crosses filesystems. Dropping an uncommitted stage removes the temp file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

pub struct StagedArtifact {
    file: NamedTempFile,
}

impl StagedArtifact {
    /// Write `bytes` to a fresh temp file beside `target` and fsync it.
    pub fn stage(target: &Path, bytes: &[u8]) -> io::Result<Self> {
        let dir = parent_dir(target);
        fs::create_dir_all(&dir)?;

        let mut file = Builder::new()
            .prefix(".switchyard-")
            .suffix(".conf")
            .tempfile_in(&dir)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;

        Ok(Self { file })
    }

    /// Stage into the system temp dir, for checks that never commit.
    pub fn scratch(bytes: &[u8]) -> io::Result<Self> {
        let mut file = Builder::new()
            .prefix("switchyard-check-")
            .suffix(".conf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically replace `target` with the staged file.
    pub fn commit(self, target: &Path) -> io::Result<()> {
        self.file.persist(target).map_err(|e| e.error)?;

        // Make the rename itself durable. Not every filesystem supports it.
        if let Err(e) = File::open(parent_dir(target)).and_then(|d| d.sync_all()) {
            tracing::debug!(error = %e, target = %target.display(), "directory fsync skipped");
        }
        Ok(())
    }
}

fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

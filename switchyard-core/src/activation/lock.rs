use nix::fcntl::{Flock, FlockArg};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Exclusive advisory lock guarding one artifact across processes.
///
/// Released when dropped.
pub struct ArtifactLock {
    _lock: Flock<File>,
}

impl ArtifactLock {
    /// Block until the lock for `artifact` is held.
    pub fn acquire(artifact: &Path) -> io::Result<Self> {
        let path = lock_path(artifact);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        let lock = Flock::lock(file, FlockArg::LockExclusive)
            .map_err(|(_, errno)| io::Error::from(errno))?;

        Ok(Self { _lock: lock })
    }
}

/// `<artifact>.lock`
pub fn lock_path(artifact: &Path) -> PathBuf {
    let mut name = OsString::from(artifact.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

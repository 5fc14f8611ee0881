use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write the supervisor's own pid to a file.
pub fn write_pid<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create pid directory {}", dir.display()))?;
    }

    fs::write(path, format!("{}\n", std::process::id()))
        .with_context(|| format!("failed to write pid file {}", path.display()))?;
    Ok(())
}

/// Remove a pid file (best-effort).
pub fn remove_pid<P: AsRef<Path>>(path: P) {
    let _ = fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::pid::read_pid;
    use tempfile::tempdir;

    #[test]
    fn written_pid_is_readable_and_removable() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("run/switchyard.pid");

        // Act
        write_pid(&path).unwrap();
        let pid = read_pid(&path).unwrap();
        remove_pid(&path);

        // Assert
        assert_eq!(pid.as_raw() as u32, std::process::id());
        assert!(!path.exists());
    }
}

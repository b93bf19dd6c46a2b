use crate::error::ResourceError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const WORKSPACE_NAME: &str = "fusion-bench";

/// Per-target scratch directories used while a pipeline runs.
#[derive(Debug, Clone)]
pub struct TempWorkspace {
    root: PathBuf,
    keep_temp: bool,
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join(WORKSPACE_NAME))
    }
}

impl TempWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            keep_temp: false,
        }
    }

    pub fn keep_temp(mut self, keep_temp: bool) -> Self {
        self.keep_temp = keep_temp;
        self
    }

    pub fn directory_for(&self, target_path: &Path) -> PathBuf {
        let stem = target_path
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| "target".into());
        self.root.join(stem)
    }

    pub async fn create(&self, target_path: &Path) -> Result<PathBuf, std::io::Error> {
        let directory = self.directory_for(target_path);
        tokio::fs::create_dir_all(&directory).await?;
        Ok(directory)
    }

    /// Removes the target's directory. A directory that is already gone is
    /// not an error.
    pub async fn clear(&self, target_path: &Path) -> Result<(), ResourceError> {
        let directory = self.directory_for(target_path);
        if self.keep_temp {
            debug!("Keeping temp directory {}", directory.display());
            return Ok(());
        }
        match tokio::fs::remove_dir_all(&directory).await {
            Ok(()) => {
                debug!("Removed temp directory {}", directory.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ResourceError::TempCleanup(e, directory)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_named_after_target_stem() {
        let workspace = TempWorkspace::new("/tmp/fusion-bench");
        assert_eq!(
            workspace.directory_for(Path::new(".assets/examples/target-240p.mp4")),
            PathBuf::from("/tmp/fusion-bench/target-240p")
        );
    }

    #[tokio::test]
    async fn clear_removes_created_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::new(root.path());
        let target = Path::new("target-360p.mp4");

        let directory = workspace.create(target).await.unwrap();
        tokio::fs::write(directory.join("0001.bmp"), b"frame").await.unwrap();

        workspace.clear(target).await.unwrap();
        assert!(!directory.exists());
        workspace.clear(target).await.unwrap();
    }

    #[tokio::test]
    async fn keep_temp_leaves_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::new(root.path()).keep_temp(true);
        let target = Path::new("target-540p.mp4");

        let directory = workspace.create(target).await.unwrap();
        workspace.clear(target).await.unwrap();
        assert!(directory.exists());
    }
}

//! Where output bytes go
//!
//! [`LocalDisk`] writes next to the chosen folder and can tell whether a
//! target already exists, which is what enables conflict detection.
//! [`DownloadFolder`] mimics a browser download: files land in one fixed
//! directory under their bare name and nothing is checked beforehand.

use crate::types::Result;
use std::future::Future;
use std::path::{Path, PathBuf};

pub trait OutputPlatform: Send + Sync {
    /// Whether [`OutputPlatform::exists`] is meaningful. Without it every
    /// save writes straight away.
    fn checks_existence(&self) -> bool;

    /// Path a file named `file_name` is written to when saving into `folder`
    fn destination(&self, folder: &Path, file_name: &str) -> PathBuf;

    /// Batched existence check, parallel to `paths`
    fn exists(&self, paths: &[PathBuf]) -> impl Future<Output = Result<Vec<bool>>> + Send;

    /// Persist `bytes`; returns the path actually written
    fn write(&self, path: &Path, bytes: Vec<u8>) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Regular filesystem access
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDisk;

impl OutputPlatform for LocalDisk {
    fn checks_existence(&self) -> bool {
        true
    }

    fn destination(&self, folder: &Path, file_name: &str) -> PathBuf {
        folder.join(file_name)
    }

    async fn exists(&self, paths: &[PathBuf]) -> Result<Vec<bool>> {
        let mut result = Vec::with_capacity(paths.len());
        for path in paths {
            result.push(tokio::fs::try_exists(path).await?);
        }
        Ok(result)
    }

    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        log::debug!("Wrote {}", path.display());
        Ok(path.to_path_buf())
    }
}

/// Download-style fallback: every file goes to one directory
#[derive(Debug, Clone)]
pub struct DownloadFolder {
    dir: PathBuf,
}

impl DownloadFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputPlatform for DownloadFolder {
    fn checks_existence(&self) -> bool {
        false
    }

    fn destination(&self, _folder: &Path, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    async fn exists(&self, paths: &[PathBuf]) -> Result<Vec<bool>> {
        Ok(vec![false; paths.len()])
    }

    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = match path.file_name() {
            Some(name) => self.dir.join(name),
            None => path.to_path_buf(),
        };
        tokio::fs::write(&target, bytes).await?;
        log::debug!("Downloaded {}", target.display());
        Ok(target)
    }
}

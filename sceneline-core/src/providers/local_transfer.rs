//! Filesystem-backed [`FileTransfer`] implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FileTransfer, ProviderError, ProviderResult, TransferMode};

/// Moves and copies files through a temporary sibling so the destination
/// only ever appears fully written.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTransfer;

impl LocalTransfer {
    fn staging_path(destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".sceneline-partial~");
        destination.with_file_name(name)
    }

    fn transfer_sync(
        source: &Path,
        destination: &Path,
        mode: TransferMode,
    ) -> ProviderResult<()> {
        if mode == TransferMode::Move {
            // Same-device rename is already atomic.
            if std::fs::rename(source, destination).is_ok() {
                debug!(?source, ?destination, "renamed in place");
                return Ok(());
            }
        }

        let staging = Self::staging_path(destination);
        if let Err(e) = std::fs::copy(source, &staging) {
            let _ = std::fs::remove_file(&staging);
            return Err(ProviderError::Io(e));
        }
        if let Err(e) = std::fs::rename(&staging, destination) {
            let _ = std::fs::remove_file(&staging);
            return Err(ProviderError::Io(e));
        }

        if mode == TransferMode::Move {
            std::fs::remove_file(source)?;
        }
        debug!(?source, ?destination, "staged transfer complete");
        Ok(())
    }
}

#[async_trait]
impl FileTransfer for LocalTransfer {
    async fn transfer(
        &self,
        source: &Path,
        destination: &Path,
        mode: TransferMode,
    ) -> ProviderResult<()> {
        Self::transfer_sync(source, destination, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn move_relocates_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        let dst = dir.path().join("b.mp4");
        std::fs::write(&src, b"payload").unwrap();

        LocalTransfer
            .transfer(&src, &dst, TransferMode::Move)
            .await
            .unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn copy_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        let dst = dir.path().join("b.mp4");
        std::fs::write(&src, b"payload").unwrap();

        LocalTransfer
            .transfer(&src, &dst, TransferMode::Copy)
            .await
            .unwrap();

        assert!(src.exists());
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn failed_transfer_leaves_no_partial_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing.mp4");
        let dst = dir.path().join("b.mp4");

        let result = LocalTransfer
            .transfer(&src, &dst, TransferMode::Copy)
            .await;

        assert!(result.is_err());
        assert!(!dst.exists());
        assert!(!LocalTransfer::staging_path(&dst).exists());
    }
}

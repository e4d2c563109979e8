//! Collaborator capabilities consumed by the pipeline.
//!
//! The concrete metadata client, persistence layer, and root folder
//! registry live outside this crate; the pipeline only sees these traits.

pub mod local_transfer;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use sceneline_model::{CandidateEntity, ForeignId, LibraryEntity, NamingConfig};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Metadata provider search surface.
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    async fn search_movies(&self, term: &str) -> ProviderResult<Vec<CandidateEntity>>;

    async fn search_scenes(&self, term: &str) -> ProviderResult<Vec<CandidateEntity>>;

    /// Look a candidate up by its stable foreign identifier.
    async fn search_by_id(&self, id: ForeignId) -> ProviderResult<Vec<CandidateEntity>>;
}

/// Library root resolution.
#[async_trait]
pub trait RootFolderSource: Send + Sync {
    /// The library root that contains `path`, if any.
    async fn root_for(&self, path: &Path) -> ProviderResult<Option<PathBuf>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Move,
    Copy,
}

/// File relocation capability. Implementations must not leave a partially
/// written destination behind on failure.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    async fn transfer(
        &self,
        source: &Path,
        destination: &Path,
        mode: TransferMode,
    ) -> ProviderResult<()>;
}

/// Read-only naming configuration snapshots.
#[async_trait]
pub trait NamingConfigSource: Send + Sync {
    async fn naming_config(&self) -> ProviderResult<NamingConfig>;
}

/// Dedup lookup against already-persisted entities.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_by_foreign_id(
        &self,
        id: ForeignId,
    ) -> ProviderResult<Option<LibraryEntity>>;
}

pub use local_transfer::LocalTransfer;

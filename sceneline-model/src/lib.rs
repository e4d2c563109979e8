//! Core data model definitions shared across Sceneline crates.
#![allow(missing_docs)]

pub mod entities;
pub mod error;
pub mod ids;
pub mod naming_config;
pub mod quality;
pub mod release;
pub mod subject;

// Intentionally curated re-exports for downstream consumers.
pub use entities::{CandidateEntity, LibraryEntity};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ForeignId;
pub use naming_config::{CharReplacement, NamingConfig};
pub use quality::{
    Confidence, QualityDetermination, QualitySignal, QualitySource,
    Resolution, ResolutionEvidence, SignalOrigin,
};
pub use release::ParsedRelease;
pub use subject::{
    Decision, ImportSubject, MatchResult, RejectionType, SearchStrategy,
};

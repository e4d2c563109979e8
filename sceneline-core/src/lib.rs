//! # Sceneline Core
//!
//! Identification pipeline for the Sceneline media-library manager: takes a
//! raw file path plus a permissively parsed release, matches it against a
//! metadata search collaborator, fuses weighted quality signals, runs the
//! import decision chain, and computes the destination name through the
//! token-based naming engine.
//!
//! ## Architecture
//!
//! Control flows top-down through the modules:
//!
//! - [`identify`]: the orchestrator composing the stages below
//! - [`matcher`]: strategy selection and tie-refusing candidate matching
//! - [`quality`]: weighted signal fusion onto the resolution ladder
//! - [`decision`]: ordered accept/reject specification chain
//! - [`naming`]: template/token resolution for folders and file names
//! - [`providers`]: collaborator traits (metadata search, file transfer,
//!   naming config, entity store)
//!
//! Everything below the orchestrator is pure or read-only; the only
//! suspension points are the outbound search and the file transfer, both
//! owned by collaborators. The pipeline is deterministic and safe to re-run
//! against a partially processed library.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Decision specification chain and shipped rules
pub mod decision;

/// Error types and error handling utilities
pub mod error;

/// End-to-end identification orchestrator
pub mod identify;

/// Candidate matching against the metadata provider
pub mod matcher;

/// Naming token engine
pub mod naming;

/// Collaborator capability traits
pub mod providers;

/// Quality signal fusion
pub mod quality;

pub use decision::{DecisionCriteria, Rule, evaluate};
pub use error::{IdentifyError, Result};
pub use identify::{Identifier, IdentifyOutcome, MediaProbe};
pub use matcher::{match_release, select_strategy};
pub use naming::{NamingContext, build_folder, resolve};
pub use providers::{
    EntityStore, FileTransfer, LocalTransfer, MetadataSearch,
    NamingConfigSource, ProviderError, RootFolderSource, TransferMode,
};
pub use quality::fuse;

use std::path::PathBuf;

use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model error: {0}")]
    Model(#[from] sceneline_model::ModelError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unknown naming token: {{{token}}}")]
    UnknownToken { token: String },

    #[error("Invalid naming template: {0}")]
    InvalidTemplate(String),

    #[error("No library root covers path: {0}")]
    NoRootFolder(PathBuf),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, IdentifyError>;

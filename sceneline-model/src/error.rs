use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidForeignId(String),
    InvalidConfig(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidForeignId(msg) => {
                write!(f, "invalid foreign id: {msg}")
            }
            ModelError::InvalidConfig(msg) => {
                write!(f, "invalid naming config: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;

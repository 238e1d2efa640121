//! Error types shared by every part of the crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Dimension mismatch: expected {expected} inputs, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Malformed genome: {0}")]
    MalformedGenome(String),

    #[error("Incompatible parents: mother has {mother} layers, father has {father}")]
    IncompatibleParents { mother: usize, father: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

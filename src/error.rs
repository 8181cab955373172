//! Error types for the beam solver

use thiserror::Error;

/// Main error type for model building and analysis
#[derive(Error, Debug)]
pub enum FEAError {
    /// Degenerate element geometry (coincident end nodes)
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    /// Dangling reference, duplicate id, bad DOF index, duplicate constraint,
    /// or invalid material/section/load input
    #[error("Invalid model configuration: {0}")]
    Configuration(String),

    #[error("Singular stiffness matrix - model may be under-constrained: {0}")]
    SingularSystem(String),

    #[error("No positive buckling load factor - structure is not in compression along any buckling path")]
    NoBucklingMode,

    #[error("Numerical failure: {0}")]
    Numerical(String),

    #[error("Analysis cancelled during {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for solver operations
pub type FEAResult<T> = Result<T, FEAError>;

impl FEAError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

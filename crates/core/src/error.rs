//! Error types for the core domain

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid release date for movie {movie_id}: {value:?}")]
    InvalidReleaseDate { movie_id: String, value: String },

    #[error("Catalog parse error: {0}")]
    Catalog(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for the territory engine

use thiserror::Error;

use crate::models::TerritoryId;

#[derive(Debug, Error)]
pub enum TerritoryError {
    // Geometry errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Contract violations (bad caller input that is not geometry)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Geocoder errors
    #[error("Failed to geocode '{address}': {reason}")]
    GeocodeFailed { address: String, reason: String },

    // Engine errors
    #[error("Territory not found: {id}")]
    TerritoryNotFound { id: TerritoryId },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Store adapter errors
    #[error("Store error: {0}")]
    Store(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TerritoryError {
    /// Shorthand for an `InvalidGeometry` error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        TerritoryError::InvalidGeometry { reason: reason.into() }
    }

    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        TerritoryError::InvalidArgument { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, TerritoryError>;

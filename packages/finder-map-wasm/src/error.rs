//! Error types for WKT reading and reprojection.

use thiserror::Error;

/// Errors produced while turning geometry descriptions into map features.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("{}invalid WKT geometry: {message}", at_prefix(*index))]
    Parse {
        index: Option<usize>,
        message: String,
    },

    #[error("{}latitude {latitude} is outside [-90, 90]", at_prefix(*index))]
    LatitudeOutOfRange {
        index: Option<usize>,
        latitude: f64,
    },

    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    #[error("failed to encode feature: {0}")]
    Serialize(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn at_prefix(index: Option<usize>) -> String {
    match index {
        Some(index) => format!("geometry {}: ", index),
        None => String::new(),
    }
}

impl MapError {
    /// Attach the position of the failing geometry within a batch.
    pub fn at_index(self, at: usize) -> Self {
        match self {
            MapError::Parse { message, .. } => MapError::Parse {
                index: Some(at),
                message,
            },
            MapError::LatitudeOutOfRange { latitude, .. } => MapError::LatitudeOutOfRange {
                index: Some(at),
                latitude,
            },
            other => other,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, MapError::Parse { .. })
    }
}

impl From<geozero::error::GeozeroError> for MapError {
    fn from(err: geozero::error::GeozeroError) -> Self {
        MapError::Parse {
            index: None,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Serialize(err.to_string())
    }
}

/// Result alias for map operations.
pub type Result<T> = std::result::Result<T, MapError>;

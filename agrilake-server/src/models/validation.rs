//! Validation error types

use std::fmt;

/// Client input rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Body did not match the expected shape (missing field, wrong type, bad JSON)
    Malformed { detail: String },

    /// Path segment or query string could not be decoded
    InvalidParameter { detail: String },

    /// Body was larger than the server's configured limit
    BodyTooLarge,

    /// A batch endpoint received an empty collection
    EmptyBatch { message: &'static str },
}

impl ValidationError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }

    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            detail: detail.into(),
        }
    }

    /// Empty farm batch
    pub fn no_farm_data() -> Self {
        Self::EmptyBatch {
            message: "No farm data provided",
        }
    }

    /// Empty lake batch
    pub fn no_data() -> Self {
        Self::EmptyBatch {
            message: "No data provided",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { detail } => write!(f, "Invalid JSON format: {}", detail),
            Self::InvalidParameter { detail } => {
                write!(f, "Invalid request parameters: {}", detail)
            }
            Self::BodyTooLarge => f.write_str("Request body exceeds the size limit"),
            Self::EmptyBatch { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

//! Error types for the imputation blocks.
//!
//! All fallible operations return [`ImputeError`], built with `thiserror`.
//! Errors serialize to a `{code, message}` pair so a pipeline host can hand
//! them to a frontend unchanged.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for imputation blocks.
#[derive(Error, Debug)]
pub enum ImputeError {
    /// The configured statistic cannot be computed on a column's dtype.
    #[error("Unsupported operation: '{statistic}' is not defined for column '{column}' of type {dtype}")]
    UnsupportedOperation {
        statistic: String,
        column: String,
        dtype: String,
    },

    /// The statistic name is not one of the supported statistics.
    #[error("Unsupported operation: unknown statistic '{0}'")]
    UnknownStatistic(String),

    /// A dump names a block type that this crate cannot build.
    #[error("Unknown block type '{0}'")]
    UnknownBlockType(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputeError>,
    },
}

impl ImputeError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for the pipeline host.
    ///
    /// An unknown statistic name is reported with the same code as a
    /// statistic that exists but does not apply to a column, since both mean
    /// the table cannot compute the requested method.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation { .. } | Self::UnknownStatistic(_) => {
                "UNSUPPORTED_OPERATION"
            }
            Self::UnknownBlockType(_) => "UNKNOWN_BLOCK_TYPE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a capability error.
    pub fn is_unsupported(&self) -> bool {
        match self {
            Self::UnsupportedOperation { .. } | Self::UnknownStatistic(_) => true,
            Self::WithContext { source, .. } => source.is_unsupported(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputeError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for imputation operations.
pub type Result<T> = std::result::Result<T, ImputeError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ImputeError::Polars(e).with_context(context))
    }
}

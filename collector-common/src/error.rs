use thiserror::Error;

use crate::signal::DataType;

/// Common error type for collector components.
#[derive(Debug, Error)]
pub enum Error {
    /// The component type does not handle this signal kind.
    ///
    /// This is a permanent capability boundary, not a transient failure.
    /// Hosts match on it to tell "not wired for this" apart from a real
    /// construction error.
    #[error("{data_type} data type is not supported")]
    DataTypeNotSupported { data_type: DataType },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown component type: {0}")]
    UnknownType(String),

    #[error("Component type already registered: {0}")]
    DuplicateType(String),

    #[error("Invalid component id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    #[error("Context cancelled")]
    Cancelled,

    #[error("Context deadline exceeded")]
    DeadlineExceeded,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a component implementation, kept intact.
    #[error(transparent)]
    Component(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create the unsupported signal kind error.
    pub fn not_supported(data_type: DataType) -> Self {
        Self::DataTypeNotSupported { data_type }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error raised by a component implementation.
    pub fn component<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Component(Box::new(source))
    }

    /// Whether this is the unsupported signal kind error.
    pub fn is_data_type_not_supported(&self) -> bool {
        matches!(self, Self::DataTypeNotSupported { .. })
    }

    /// Recover the original component error, if this wraps one of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Component(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type alias using the collector [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

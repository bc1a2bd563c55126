//! Error types for HarmWatch

/// Result type alias using HarmWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for HarmWatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An ingested event is missing a required field
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// A subscriber sent control data that could not be parsed
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A send to a single subscriber failed
    #[error("delivery failure: {0}")]
    DeliveryFailure(String),

    /// Classifier construction or execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new invalid event error
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    /// Create a new malformed message error
    pub fn malformed_message(msg: impl Into<String>) -> Self {
        Self::MalformedMessage(msg.into())
    }

    /// Create a new delivery failure error
    pub fn delivery_failure(msg: impl Into<String>) -> Self {
        Self::DeliveryFailure(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error should be reported back to the event producer.
    ///
    /// Only validation failures cross that boundary; everything else is
    /// local to one subscriber or to the hub itself.
    pub fn is_producer_facing(&self) -> bool {
        matches!(self, Self::InvalidEvent(_))
    }
}

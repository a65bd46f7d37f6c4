//! GTP Error types

use ogs_tlv::{CodecError, FieldError};
use thiserror::Error;

/// GTP Error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GtpError {
    /// Buffer too short for operation
    #[error("Buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },

    /// Invalid message type
    #[error("Invalid message type: {0}")]
    InvalidMessageType(u8),

    /// Invalid IE type
    #[error("Invalid IE type: {0}")]
    InvalidIeType(u8),

    /// Invalid version
    #[error("Invalid GTP version: {0}")]
    InvalidVersion(u8),

    /// Invalid cause value
    #[error("Invalid cause value: {0}")]
    InvalidCause(u8),

    /// Encoding error
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// IE payload field could not be set or read
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Codec engine error
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// GTP Result type
pub type GtpResult<T> = Result<T, GtpError>;

//! PFCP Error Types
//!
//! Error types for PFCP protocol operations.

use ogs_tlv::{CodecError, FieldError};
use thiserror::Error;

/// PFCP Error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PfcpError {
    /// Invalid message type
    #[error("Invalid message type: {0}")]
    InvalidMessageType(u8),

    /// Invalid IE type
    #[error("Invalid IE type: {0}")]
    InvalidIeType(u16),

    /// Invalid cause value
    #[error("Invalid cause value: {0}")]
    InvalidCause(u8),

    /// Invalid node ID type
    #[error("Invalid node ID type: {0}")]
    InvalidNodeIdType(u8),

    /// Invalid interface type
    #[error("Invalid interface type: {0}")]
    InvalidInterfaceType(u8),

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

/// PFCP Result type
pub type PfcpResult<T> = Result<T, PfcpError>;

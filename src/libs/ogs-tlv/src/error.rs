//! TLV codec error types

use std::fmt;

use thiserror::Error;

use crate::ie::IeKey;

/// Low-level bit cursor error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Not enough bits left in the current window
    #[error("Window exhausted: need {needed} bits, have {available}")]
    Exhausted { needed: usize, available: usize },

    /// Byte-granular access attempted off a byte boundary
    #[error("Unaligned byte access at bit offset {0}")]
    Unaligned(usize),

    /// Integer width outside 1..=64
    #[error("Invalid bit width: {0}")]
    Width(u8),
}

/// Field-level fault raised while decoding, encoding or mutating a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// Value outside the declared range or bit width
    #[error("Field {field}: value {value} out of range")]
    OutOfRange { field: &'static str, value: u64 },

    /// Bytes left in an IE window after its payload layout
    #[error("{layout}: {remaining} trailing bytes")]
    Trailing { layout: &'static str, remaining: usize },

    /// Fixed-width byte field set with the wrong length
    #[error("Field {field}: expected {expected} bytes, got {actual}")]
    BadLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Field is computed from other fields and cannot be assigned
    #[error("Field {0} is derived and cannot be set")]
    Derived(&'static str),

    /// Value kind does not match the field kind
    #[error("Field {0}: wrong value kind")]
    Kind(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Declared length is smaller than the fields it covers
    #[error("Length field {field}: {value} is shorter than the covered header")]
    Length { field: &'static str, value: u64 },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Layout declaration error, detected when the layout plan is first built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{layout}: field {field} references unknown field {target}")]
    UnknownReference {
        layout: &'static str,
        field: &'static str,
        target: &'static str,
    },

    #[error("{layout}: presence of {field} depends on later field {flag}")]
    ForwardPresence {
        layout: &'static str,
        field: &'static str,
        flag: &'static str,
    },

    #[error("{layout}: list {field} has no count field declared before it")]
    MissingCount {
        layout: &'static str,
        field: &'static str,
    },

    #[error("{layout}: field {field} has invalid width {bits}")]
    InvalidWidth {
        layout: &'static str,
        field: &'static str,
        bits: u8,
    },

    #[error("{layout}: field {field} has an unsupported kind for its rule")]
    InvalidRule {
        layout: &'static str,
        field: &'static str,
    },

    #[error("{layout}: derivation cycle through {field}")]
    Cycle {
        layout: &'static str,
        field: &'static str,
    },

    #[error("{layout}: duplicate field name {field}")]
    DuplicateField {
        layout: &'static str,
        field: &'static str,
    },
}

/// Registry construction error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{registry}: duplicate IE definition {key}")]
    DuplicateIe { registry: &'static str, key: String },

    #[error("{registry}: duplicate message type {code}")]
    DuplicateMessage { registry: &'static str, code: u8 },

    #[error("{registry}: duplicate extension header type {kind:#04x}")]
    DuplicateExtension { registry: &'static str, kind: u8 },

    #[error("{group}: IE {key} declared twice")]
    DuplicateEntry { group: &'static str, key: IeKey },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A mandatory IE that was not found while decoding a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingIe {
    /// Name of the message or grouped IE that declares the IE
    pub container: &'static str,
    pub key: IeKey,
    pub name: &'static str,
}

impl fmt::Display for MissingIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) in {}", self.name, self.key, self.container)
    }
}

fn join_missing(missing: &[MissingIe]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Message codec error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer too short for operation
    #[error("Buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },

    /// Structurally invalid input
    #[error("Invalid buffer: {0}")]
    BufferInvalid(String),

    /// Message type not present in the registry
    #[error("Unknown message type: {0}")]
    TypeNotFound(u8),

    /// Mandatory IEs absent in strict mode
    #[error("Missing mandatory IE: {}", join_missing(.0))]
    MandatoryIeMissing(Vec<MissingIe>),

    /// Encoding error
    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl CodecError {
    /// Map a field fault raised while decoding an enclosing structure.
    pub fn from_decode(err: FieldError) -> Self {
        match err {
            FieldError::Cursor(cursor) => cursor.into(),
            other => CodecError::BufferInvalid(other.to_string()),
        }
    }

    /// Map a field fault raised while serializing.
    pub fn from_encode(err: FieldError) -> Self {
        CodecError::EncodingError(err.to_string())
    }
}

impl From<CursorError> for CodecError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::Exhausted { needed, available } => CodecError::BufferTooShort {
                needed: needed.div_ceil(8),
                available: available / 8,
            },
            other => CodecError::BufferInvalid(other.to_string()),
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Outcome classification reported by the message dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultCode {
    Ok,
    BufferTooShort,
    BufferInvalid,
    TypeNotFound,
    MandatoryIeMissing,
}

impl FaultCode {
    pub fn is_ok(self) -> bool {
        self == FaultCode::Ok
    }
}

impl From<&CodecError> for FaultCode {
    fn from(err: &CodecError) -> Self {
        match err {
            CodecError::BufferTooShort { .. } => FaultCode::BufferTooShort,
            CodecError::BufferInvalid(_) | CodecError::EncodingError(_) => FaultCode::BufferInvalid,
            CodecError::TypeNotFound(_) => FaultCode::TypeNotFound,
            CodecError::MandatoryIeMissing(_) => FaultCode::MandatoryIeMissing,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultCode::Ok => "OK",
            FaultCode::BufferTooShort => "BUFFER_TOO_SHORT",
            FaultCode::BufferInvalid => "BUFFER_INVALID",
            FaultCode::TypeNotFound => "TYPE_NOT_FOUND",
            FaultCode::MandatoryIeMissing => "MANDATORY_IE_MISSING",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_exhaustion_maps_to_too_short() {
        let err: CodecError = CursorError::Exhausted {
            needed: 12,
            available: 16,
        }
        .into();
        assert_eq!(
            err,
            CodecError::BufferTooShort {
                needed: 2,
                available: 2
            }
        );
        assert_eq!(FaultCode::from(&err), FaultCode::BufferTooShort);
    }

    #[test]
    fn test_missing_ie_display() {
        let err = CodecError::MandatoryIeMissing(vec![MissingIe {
            container: "Heartbeat Request",
            key: IeKey::new(96, 0),
            name: "Recovery Time Stamp",
        }]);
        assert_eq!(
            err.to_string(),
            "Missing mandatory IE: Recovery Time Stamp (96/0) in Heartbeat Request"
        );
    }

    #[test]
    fn test_field_fault_maps_to_invalid() {
        let err = CodecError::from_decode(FieldError::OutOfRange {
            field: "version",
            value: 3,
        });
        assert_eq!(FaultCode::from(&err), FaultCode::BufferInvalid);
    }
}

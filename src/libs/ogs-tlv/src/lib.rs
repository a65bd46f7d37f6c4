//! NextGCore TLV Codec Engine
//!
//! This crate provides the protocol-independent machinery shared by the
//! GTP and PFCP control-plane codecs: bit-granular field layouts with
//! derived lengths, counts and presence flags, TLV/TV information
//! element framing with raw fallback, grouped IEs with mandatory and
//! optional conformance checking, extension header chains, message
//! envelopes, static registries and the type-code dispatcher.

pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod extension;
pub mod group;
pub mod ie;
pub mod layout;
pub mod message;
pub mod record;
pub mod registry;

#[cfg(test)]
mod test_util;

pub use config::{CodecConfig, ConfigError};
pub use cursor::{BitWriter, Cursor};
pub use dispatch::{decode_message, decode_message_with, encode_message};
pub use error::{
    CodecError, CodecResult, CursorError, FaultCode, FieldError, LayoutError, MissingIe,
    RegistryError,
};
pub use extension::{ExtContent, ExtensionHeader};
pub use group::{Conformance, DecodeCtx, DecodeMode, Entry, Group, GroupSpec, Need, Slot};
pub use ie::{Ie, IeFormat, IeHeader, IeKey, IeValue, Payload};
pub use layout::{FieldDef, Kind, Layout, Presence, ValueRule};
pub use message::{Message, Protocol, FIRST_EXTENSION_TYPE, MESSAGE_TYPE};
pub use record::{NoParent, Parent, Record, Value};
pub use registry::{MessageSpec, PayloadDef, Registry, RegistryBuilder};

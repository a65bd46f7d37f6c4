//! GTPv0 Protocol Implementation
//!
//! This module implements GTPv0 signalling as specified in GSM 09.60 on
//! top of the `ogs-tlv` codec engine. GTPv0 has no extension headers and
//! carries a 64-bit Tunnel Identifier in a fixed 20-byte header.

pub mod header;
pub mod ie;
pub mod message;

pub use header::*;
pub use ie::*;
pub use message::*;

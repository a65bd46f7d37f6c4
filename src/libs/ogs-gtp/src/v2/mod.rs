//! GTPv2-C Protocol Implementation
//!
//! This module implements GTPv2-C (Control Plane) as specified in
//! 3GPP TS 29.274 on top of the `ogs-tlv` codec engine.

pub mod header;
pub mod ie;
pub mod message;
pub mod types;

pub use header::*;
pub use ie::*;
pub use message::*;
pub use types::*;

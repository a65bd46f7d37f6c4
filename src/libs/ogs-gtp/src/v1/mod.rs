//! GTPv1-C Protocol Implementation
//!
//! This module implements GTPv1-C (Control Plane) as specified in
//! 3GPP TS 29.060 on top of the `ogs-tlv` codec engine.

pub mod header;
pub mod ie;
pub mod message;

pub use header::*;
pub use ie::*;
pub use message::*;

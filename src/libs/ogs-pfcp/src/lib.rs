//! NextGCore PFCP Protocol Library
//!
//! This crate provides PFCP (Packet Forwarding Control Protocol) message building
//! and parsing as specified in 3GPP TS 29.244, on top of the `ogs-tlv` codec
//! engine.
//!
//! PFCP is used for communication between the Control Plane (CP) and User Plane (UP)
//! functions in 5G and LTE networks.
//!
//! # Features
//!
//! - PFCP header with optional SEID and message priority
//! - Node and session message tables checked for mandatory IEs
//! - Nested grouped IEs (Create PDR, PDI, Create FAR, ...)
//! - Vendor-specific IEs carrying an enterprise ID
//!
//! # Example
//!
//! ```rust
//! use ogs_pfcp::message::{decode_message, encode_message, heartbeat_request};
//! use ogs_pfcp::FaultCode;
//!
//! let msg = heartbeat_request(1, 0x12345678).unwrap();
//! let buf = encode_message(&msg).unwrap();
//!
//! let (decoded, fault) = decode_message(&buf);
//! assert_eq!(fault, FaultCode::Ok);
//! assert_eq!(decoded.unwrap().name(), "Heartbeat Request");
//! ```

pub mod error;
pub mod header;
pub mod ie;
pub mod message;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use error::{PfcpError, PfcpResult};
pub use header::{PfcpMessageType, PFCP_HEADER_LEN, PFCP_HEADER_LEN_WITH_SEID};
pub use ie::Pfcp;
pub use message::{decode_message, decode_message_with, encode_message};
pub use ogs_tlv::{FaultCode, Message};
pub use types::PFCP_UDP_PORT;

//! GTPv0 Header
//!
//! Fixed 20-byte GTPv0 header (GSM 09.60 section 6). The length counts
//! the octets after the header.

use ogs_tlv::{FieldDef, Layout, ValueRule, MESSAGE_TYPE};

use crate::error::GtpError;

/// GTPv0 header length
pub const GTPV0_HEADER_LEN: usize = 20;

/// GTPv0 Version
pub const GTP0_VERSION_0: u64 = 0;

/// Byte offset of the message type
pub const GTP0_TYPE_OFFSET: usize = 1;

/// SNDCP N-PDU number value when unused
pub const GTP0_SNDCP_NPDU_UNUSED: u64 = 0xFF;

/// GTPv0 Signalling Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp0MessageType {
    EchoRequest = 1,
    EchoResponse = 2,
    VersionNotSupported = 3,
    CreatePdpContextRequest = 16,
    CreatePdpContextResponse = 17,
    UpdatePdpContextRequest = 18,
    UpdatePdpContextResponse = 19,
    DeletePdpContextRequest = 20,
    DeletePdpContextResponse = 21,
    ErrorIndication = 26,
}

impl TryFrom<u8> for Gtp0MessageType {
    type Error = GtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gtp0MessageType::EchoRequest),
            2 => Ok(Gtp0MessageType::EchoResponse),
            3 => Ok(Gtp0MessageType::VersionNotSupported),
            16 => Ok(Gtp0MessageType::CreatePdpContextRequest),
            17 => Ok(Gtp0MessageType::CreatePdpContextResponse),
            18 => Ok(Gtp0MessageType::UpdatePdpContextRequest),
            19 => Ok(Gtp0MessageType::UpdatePdpContextResponse),
            20 => Ok(Gtp0MessageType::DeletePdpContextRequest),
            21 => Ok(Gtp0MessageType::DeletePdpContextResponse),
            26 => Ok(Gtp0MessageType::ErrorIndication),
            _ => Err(GtpError::InvalidMessageType(value)),
        }
    }
}

/// GTPv0 header
pub static GTP0_HEADER: Layout = Layout::new(
    "GTPv0 header",
    &[
        FieldDef::uint("version", 3)
            .with_default(GTP0_VERSION_0)
            .range(GTP0_VERSION_0, GTP0_VERSION_0),
        FieldDef::uint("pt", 1).with_default(1),
        FieldDef::uint("spare", 3).with_default(0b111),
        FieldDef::uint("snn", 1),
        FieldDef::uint(MESSAGE_TYPE, 8),
        FieldDef::uint("length", 16).derived(ValueRule::LengthOf { from: None }),
        FieldDef::uint("sequence_number", 16),
        FieldDef::uint("flow_label", 16),
        FieldDef::uint("sndcp_npdu_number", 8).with_default(GTP0_SNDCP_NPDU_UNUSED),
        FieldDef::uint("spare2", 24).with_default(0xFF_FFFF),
        FieldDef::uint("tid", 64),
    ],
);

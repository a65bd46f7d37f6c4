//! GTPv2 Header
//!
//! GTPv2-C header structure as specified in 3GPP TS 29.274 section 5.1.
//! The TEID is present when T is set; the last octet holds the message
//! priority when MP is set and is spare otherwise. The length counts
//! everything after the first four octets.

use ogs_tlv::{FieldDef, Layout, Presence, ValueRule, MESSAGE_TYPE};

use crate::error::GtpError;

/// GTPv2-C header length (with TEID)
pub const GTPV2C_HEADER_LEN: usize = 12;

/// GTPv2-C header length (without TEID)
pub const GTPV2C_HEADER_LEN_NO_TEID: usize = 8;

/// GTPv2 Version
pub const GTP2_VERSION_2: u64 = 2;

/// Byte offset of the message type
pub const GTP2_TYPE_OFFSET: usize = 1;

/// GTPv2-C Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2MessageType {
    EchoRequest = 1,
    EchoResponse = 2,
    VersionNotSupportedIndication = 3,
    CreateSessionRequest = 32,
    CreateSessionResponse = 33,
    ModifyBearerRequest = 34,
    ModifyBearerResponse = 35,
    DeleteSessionRequest = 36,
    DeleteSessionResponse = 37,
    CreateBearerRequest = 95,
    CreateBearerResponse = 96,
    DeleteBearerRequest = 99,
    DeleteBearerResponse = 100,
    ReleaseAccessBearersRequest = 170,
    ReleaseAccessBearersResponse = 171,
    DownlinkDataNotification = 176,
    DownlinkDataNotificationAcknowledge = 177,
}

impl TryFrom<u8> for Gtp2MessageType {
    type Error = GtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gtp2MessageType::EchoRequest),
            2 => Ok(Gtp2MessageType::EchoResponse),
            3 => Ok(Gtp2MessageType::VersionNotSupportedIndication),
            32 => Ok(Gtp2MessageType::CreateSessionRequest),
            33 => Ok(Gtp2MessageType::CreateSessionResponse),
            34 => Ok(Gtp2MessageType::ModifyBearerRequest),
            35 => Ok(Gtp2MessageType::ModifyBearerResponse),
            36 => Ok(Gtp2MessageType::DeleteSessionRequest),
            37 => Ok(Gtp2MessageType::DeleteSessionResponse),
            95 => Ok(Gtp2MessageType::CreateBearerRequest),
            96 => Ok(Gtp2MessageType::CreateBearerResponse),
            99 => Ok(Gtp2MessageType::DeleteBearerRequest),
            100 => Ok(Gtp2MessageType::DeleteBearerResponse),
            170 => Ok(Gtp2MessageType::ReleaseAccessBearersRequest),
            171 => Ok(Gtp2MessageType::ReleaseAccessBearersResponse),
            176 => Ok(Gtp2MessageType::DownlinkDataNotification),
            177 => Ok(Gtp2MessageType::DownlinkDataNotificationAcknowledge),
            _ => Err(GtpError::InvalidMessageType(value)),
        }
    }
}

/// GTPv2-C header
pub static GTP2_HEADER: Layout = Layout::new(
    "GTPv2-C header",
    &[
        FieldDef::uint("version", 3)
            .with_default(GTP2_VERSION_2)
            .range(GTP2_VERSION_2, GTP2_VERSION_2),
        FieldDef::uint("p", 1),
        FieldDef::uint("t", 1),
        FieldDef::uint("mp", 1),
        FieldDef::uint("spare", 2),
        FieldDef::uint(MESSAGE_TYPE, 8),
        FieldDef::uint("length", 16).derived(ValueRule::LengthOf { from: Some("teid") }),
        FieldDef::uint("teid", 32).present(Presence::IfSet("t")),
        FieldDef::uint("sequence_number", 24),
        FieldDef::uint("message_priority", 4).present(Presence::IfSet("mp")),
        FieldDef::uint("spare2", 4).present(Presence::IfSet("mp")),
        FieldDef::uint("spare3", 8).present(Presence::IfClear("mp")),
    ],
);

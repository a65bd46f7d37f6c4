//! PFCP Header
//!
//! PFCP message header as specified in 3GPP TS 29.244 section 7.2.2. The
//! SEID is present when S is set; the last octet holds the message
//! priority when MP is set and is spare otherwise. The length counts
//! everything after the first four octets.
//!
//! ```text
//! +-----+-------+----+----+---+
//! | Ver | Spare | FO | MP | S |   Message Type   |   Message Length   |
//! +-----+-------+----+----+---+
//! |               SEID (8 octets, if S)                               |
//! |     Sequence Number (3 octets)      | Priority/Spare (1 octet)    |
//! ```

use ogs_tlv::{FieldDef, Layout, Presence, ValueRule, MESSAGE_TYPE};

use crate::error::PfcpError;
use crate::types::PFCP_VERSION;

/// PFCP Header length without SEID (8 bytes)
pub const PFCP_HEADER_LEN: usize = 8;

/// PFCP Header length with SEID (16 bytes)
pub const PFCP_HEADER_LEN_WITH_SEID: usize = 16;

/// Byte offset of the message type
pub const PFCP_TYPE_OFFSET: usize = 1;

/// PFCP Message Types
///
/// Only types with a registered message table can be built or decoded into a
/// structured body; `new_message` returns `InvalidMessageType` for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PfcpMessageType {
    // Node related messages (no SEID)
    HeartbeatRequest = 1,
    HeartbeatResponse = 2,
    PfdManagementRequest = 3,
    PfdManagementResponse = 4,
    AssociationSetupRequest = 5,
    AssociationSetupResponse = 6,
    AssociationUpdateRequest = 7,
    AssociationUpdateResponse = 8,
    AssociationReleaseRequest = 9,
    AssociationReleaseResponse = 10,
    VersionNotSupportedResponse = 11,
    NodeReportRequest = 12,
    NodeReportResponse = 13,
    SessionSetDeletionRequest = 14,
    SessionSetDeletionResponse = 15,
    SessionSetModificationRequest = 16,
    SessionSetModificationResponse = 17,

    // Session related messages (with SEID)
    SessionEstablishmentRequest = 50,
    SessionEstablishmentResponse = 51,
    SessionModificationRequest = 52,
    SessionModificationResponse = 53,
    SessionDeletionRequest = 54,
    SessionDeletionResponse = 55,
    SessionReportRequest = 56,
    SessionReportResponse = 57,
}

impl TryFrom<u8> for PfcpMessageType {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::HeartbeatRequest),
            2 => Ok(Self::HeartbeatResponse),
            3 => Ok(Self::PfdManagementRequest),
            4 => Ok(Self::PfdManagementResponse),
            5 => Ok(Self::AssociationSetupRequest),
            6 => Ok(Self::AssociationSetupResponse),
            7 => Ok(Self::AssociationUpdateRequest),
            8 => Ok(Self::AssociationUpdateResponse),
            9 => Ok(Self::AssociationReleaseRequest),
            10 => Ok(Self::AssociationReleaseResponse),
            11 => Ok(Self::VersionNotSupportedResponse),
            12 => Ok(Self::NodeReportRequest),
            13 => Ok(Self::NodeReportResponse),
            14 => Ok(Self::SessionSetDeletionRequest),
            15 => Ok(Self::SessionSetDeletionResponse),
            16 => Ok(Self::SessionSetModificationRequest),
            17 => Ok(Self::SessionSetModificationResponse),
            50 => Ok(Self::SessionEstablishmentRequest),
            51 => Ok(Self::SessionEstablishmentResponse),
            52 => Ok(Self::SessionModificationRequest),
            53 => Ok(Self::SessionModificationResponse),
            54 => Ok(Self::SessionDeletionRequest),
            55 => Ok(Self::SessionDeletionResponse),
            56 => Ok(Self::SessionReportRequest),
            57 => Ok(Self::SessionReportResponse),
            _ => Err(PfcpError::InvalidMessageType(value)),
        }
    }
}

impl PfcpMessageType {
    /// Check if this message type requires SEID
    pub fn has_seid(&self) -> bool {
        matches!(
            self,
            Self::SessionEstablishmentRequest
                | Self::SessionEstablishmentResponse
                | Self::SessionModificationRequest
                | Self::SessionModificationResponse
                | Self::SessionDeletionRequest
                | Self::SessionDeletionResponse
                | Self::SessionReportRequest
                | Self::SessionReportResponse
        )
    }

    /// Get the name of the message type
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeartbeatRequest => "Heartbeat Request",
            Self::HeartbeatResponse => "Heartbeat Response",
            Self::PfdManagementRequest => "PFD Management Request",
            Self::PfdManagementResponse => "PFD Management Response",
            Self::AssociationSetupRequest => "Association Setup Request",
            Self::AssociationSetupResponse => "Association Setup Response",
            Self::AssociationUpdateRequest => "Association Update Request",
            Self::AssociationUpdateResponse => "Association Update Response",
            Self::AssociationReleaseRequest => "Association Release Request",
            Self::AssociationReleaseResponse => "Association Release Response",
            Self::VersionNotSupportedResponse => "Version Not Supported Response",
            Self::NodeReportRequest => "Node Report Request",
            Self::NodeReportResponse => "Node Report Response",
            Self::SessionSetDeletionRequest => "Session Set Deletion Request",
            Self::SessionSetDeletionResponse => "Session Set Deletion Response",
            Self::SessionSetModificationRequest => "Session Set Modification Request",
            Self::SessionSetModificationResponse => "Session Set Modification Response",
            Self::SessionEstablishmentRequest => "Session Establishment Request",
            Self::SessionEstablishmentResponse => "Session Establishment Response",
            Self::SessionModificationRequest => "Session Modification Request",
            Self::SessionModificationResponse => "Session Modification Response",
            Self::SessionDeletionRequest => "Session Deletion Request",
            Self::SessionDeletionResponse => "Session Deletion Response",
            Self::SessionReportRequest => "Session Report Request",
            Self::SessionReportResponse => "Session Report Response",
        }
    }
}

/// PFCP header
pub static PFCP_HEADER: Layout = Layout::new(
    "PFCP header",
    &[
        FieldDef::uint("version", 3)
            .with_default(PFCP_VERSION)
            .range(PFCP_VERSION, PFCP_VERSION),
        FieldDef::uint("spare", 2),
        FieldDef::uint("fo", 1),
        FieldDef::uint("mp", 1),
        FieldDef::uint("s", 1),
        FieldDef::uint(MESSAGE_TYPE, 8),
        FieldDef::uint("length", 16).derived(ValueRule::LengthOf { from: Some("seid") }),
        FieldDef::uint("seid", 64).present(Presence::IfSet("s")),
        FieldDef::uint("sequence_number", 24),
        FieldDef::uint("message_priority", 4).present(Presence::IfSet("mp")),
        FieldDef::uint("spare2", 4).present(Presence::IfSet("mp")),
        FieldDef::uint("spare3", 8).present(Presence::IfClear("mp")),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use ogs_tlv::{Cursor, NoParent, Record};

    #[test]
    fn test_header_without_seid() {
        let hdr = Record::with(
            &PFCP_HEADER,
            &[(MESSAGE_TYPE, 1), ("sequence_number", 12345)],
        )
        .unwrap();
        let bytes = hdr.to_bytes(&NoParent).unwrap();
        assert_eq!(bytes.as_ref(), &[0x20, 1, 0, 4, 0x00, 0x30, 0x39, 0]);
    }

    #[test]
    fn test_header_with_seid() {
        let hdr = Record::with(
            &PFCP_HEADER,
            &[
                (MESSAGE_TYPE, 50),
                ("s", 1),
                ("seid", 0x123456789ABCDEF0),
                ("sequence_number", 54321),
            ],
        )
        .unwrap();
        let bytes = hdr.to_bytes(&NoParent).unwrap();
        assert_eq!(bytes.len(), PFCP_HEADER_LEN_WITH_SEID);
        assert_eq!(&bytes[..4], &[0x21, 50, 0, 12]);

        let decoded = Record::decode(&PFCP_HEADER, &mut Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.get("seid"), Some(0x123456789ABCDEF0));
        assert_eq!(decoded.get("sequence_number"), Some(54321));
        assert_eq!(decoded.tail_len().unwrap(), 0);
    }

    #[test]
    fn test_unsupported_version() {
        let data = [0x40, 1, 0, 4, 0, 0, 1, 0];
        assert!(Record::decode(&PFCP_HEADER, &mut Cursor::from_slice(&data)).is_err());
    }

    #[test]
    fn test_message_type_has_seid() {
        assert!(!PfcpMessageType::HeartbeatRequest.has_seid());
        assert!(!PfcpMessageType::AssociationSetupRequest.has_seid());
        assert!(PfcpMessageType::SessionEstablishmentRequest.has_seid());
        assert!(PfcpMessageType::SessionModificationRequest.has_seid());
        assert_eq!(
            PfcpMessageType::try_from(57).unwrap().name(),
            "Session Report Response"
        );
    }
}

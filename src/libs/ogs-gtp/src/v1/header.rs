//! GTPv1 Header
//!
//! GTPv1-C header as specified in 3GPP TS 29.060 section 6: eight
//! mandatory octets, then a four-octet optional segment (sequence number,
//! N-PDU number, next extension header type) present whenever any of the
//! E, S or PN flags is set, then the extension header chain.

use ogs_tlv::{FieldDef, Layout, Presence, ValueRule, FIRST_EXTENSION_TYPE, MESSAGE_TYPE};

use crate::error::GtpError;

/// GTPv1 header length without the optional segment
pub const GTPV1_HEADER_LEN: usize = 8;

/// GTPv1-C header length (with sequence number)
pub const GTPV1C_HEADER_LEN: usize = 12;

/// GTPv1 Version
pub const GTP1_VERSION_1: u64 = 1;

/// Byte offset of the message type
pub const GTP1_TYPE_OFFSET: usize = 1;

/// GTPv1-C Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp1cMessageType {
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
    SupportedExtensionHeadersNotification = 31,
}

impl TryFrom<u8> for Gtp1cMessageType {
    type Error = GtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gtp1cMessageType::EchoRequest),
            2 => Ok(Gtp1cMessageType::EchoResponse),
            3 => Ok(Gtp1cMessageType::VersionNotSupported),
            16 => Ok(Gtp1cMessageType::CreatePdpContextRequest),
            17 => Ok(Gtp1cMessageType::CreatePdpContextResponse),
            18 => Ok(Gtp1cMessageType::UpdatePdpContextRequest),
            19 => Ok(Gtp1cMessageType::UpdatePdpContextResponse),
            20 => Ok(Gtp1cMessageType::DeletePdpContextRequest),
            21 => Ok(Gtp1cMessageType::DeletePdpContextResponse),
            26 => Ok(Gtp1cMessageType::ErrorIndication),
            31 => Ok(Gtp1cMessageType::SupportedExtensionHeadersNotification),
            _ => Err(GtpError::InvalidMessageType(value)),
        }
    }
}

/// GTPv1 Extension Header Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtensionHeaderType {
    NoMoreExtensionHeaders = 0x00,
    MbmsSupportIndication = 0x01,
    MsInfoChangeReportingSupportIndication = 0x02,
    ServiceClassIndicator = 0x20,
    UdpPort = 0x40,
    LongPdcpPduNumber = 0x82,
    PdcpPduNumber = 0xC0,
}

impl TryFrom<u8> for ExtensionHeaderType {
    type Error = GtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ExtensionHeaderType::NoMoreExtensionHeaders),
            0x01 => Ok(ExtensionHeaderType::MbmsSupportIndication),
            0x02 => Ok(ExtensionHeaderType::MsInfoChangeReportingSupportIndication),
            0x20 => Ok(ExtensionHeaderType::ServiceClassIndicator),
            0x40 => Ok(ExtensionHeaderType::UdpPort),
            0x82 => Ok(ExtensionHeaderType::LongPdcpPduNumber),
            0xC0 => Ok(ExtensionHeaderType::PdcpPduNumber),
            _ => Err(GtpError::InvalidIeType(value)),
        }
    }
}

/// GTPv1-C header
pub static GTP1_HEADER: Layout = Layout::new(
    "GTPv1-C header",
    &[
        FieldDef::uint("version", 3)
            .with_default(GTP1_VERSION_1)
            .range(GTP1_VERSION_1, GTP1_VERSION_1),
        FieldDef::uint("pt", 1).with_default(1),
        FieldDef::uint("spare", 1),
        FieldDef::uint("e", 1),
        FieldDef::uint("s", 1),
        FieldDef::uint("pn", 1),
        FieldDef::uint(MESSAGE_TYPE, 8),
        FieldDef::uint("length", 16).derived(ValueRule::LengthOf {
            from: Some("sequence_number"),
        }),
        FieldDef::uint("teid", 32),
        FieldDef::uint("sequence_number", 16).present(Presence::IfAny(&["e", "s", "pn"])),
        FieldDef::uint("npdu_number", 8).present(Presence::IfAny(&["e", "s", "pn"])),
        // Rewritten from the extension chain on encode, 0 when E is clear
        FieldDef::uint("next_extension_type", 8)
            .present(Presence::IfAny(&["e", "s", "pn"]))
            .derived(ValueRule::Parent(FIRST_EXTENSION_TYPE)),
    ],
);

// Extension header contents, between the length and next-type octets

pub static MBMS_SUPPORT_INDICATION: Layout = Layout::new(
    "MBMS support indication",
    &[FieldDef::uint("spare", 16).with_default(0xFFFF)],
);

pub static MS_INFO_CHANGE_REPORTING_SUPPORT_INDICATION: Layout = Layout::new(
    "MS Info Change Reporting support indication",
    &[FieldDef::uint("spare", 16).with_default(0xFFFF)],
);

pub static SERVICE_CLASS_INDICATOR: Layout = Layout::new(
    "Service Class Indicator",
    &[
        FieldDef::uint("service_class_indicator", 8),
        FieldDef::uint("spare", 8),
    ],
);

pub static UDP_PORT: Layout = Layout::new("UDP Port", &[FieldDef::uint("udp_port", 16)]);

pub static PDCP_PDU_NUMBER: Layout =
    Layout::new("PDCP PDU Number", &[FieldDef::uint("pdcp_pdu_number", 16)]);

pub static LONG_PDCP_PDU_NUMBER: Layout = Layout::new(
    "Long PDCP PDU Number",
    &[
        FieldDef::uint("spare", 6),
        FieldDef::uint("pdcp_pdu_number", 18),
        FieldDef::uint("spare2", 24),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use ogs_tlv::{Cursor, NoParent, Record};

    #[test]
    fn test_message_type_conversion() {
        assert_eq!(
            Gtp1cMessageType::try_from(18).unwrap(),
            Gtp1cMessageType::UpdatePdpContextRequest
        );
        assert_eq!(
            Gtp1cMessageType::try_from(99),
            Err(GtpError::InvalidMessageType(99))
        );
        assert_eq!(
            ExtensionHeaderType::try_from(0x40).unwrap(),
            ExtensionHeaderType::UdpPort
        );
    }

    #[test]
    fn test_header_without_optional_segment() {
        let hdr = Record::with(&GTP1_HEADER, &[(MESSAGE_TYPE, 1), ("teid", 0x1234)]).unwrap();
        let bytes = hdr.to_bytes(&NoParent).unwrap();
        assert_eq!(bytes.as_ref(), &[0x30, 1, 0, 0, 0, 0, 0x12, 0x34]);
    }

    #[test]
    fn test_header_with_sequence() {
        let data = [0x32, 16, 0, 4, 0, 0, 0, 0, 0x12, 0x34, 0, 0];
        let hdr = Record::decode(&GTP1_HEADER, &mut Cursor::from_slice(&data)).unwrap();
        assert_eq!(hdr.get("sequence_number"), Some(0x1234));
        assert_eq!(hdr.get("next_extension_type"), Some(0));
        assert_eq!(hdr.tail_len().unwrap(), 0);
        assert_eq!(hdr.size(), GTPV1C_HEADER_LEN);
    }

    #[test]
    fn test_long_pdcp_layout_is_six_bytes() {
        let rec = Record::with(&LONG_PDCP_PDU_NUMBER, &[("pdcp_pdu_number", 0x3FFFF)]).unwrap();
        assert_eq!(rec.to_bytes(&NoParent).unwrap().len(), 6);
    }
}

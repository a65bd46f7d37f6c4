//! GTPv1 Information Elements
//!
//! IE framing and payload layouts for GTPv1-C (3GPP TS 29.060 section 7.7).
//! Types below 128 are TV with a fixed value length; types from 128 up are
//! TLV with a 16-bit length. Type 238 carries a 16-bit extended type after
//! the length.

use bytes::{BufMut, Bytes, BytesMut};
use ogs_tlv::{
    CodecError, CodecResult, Cursor, FieldDef, Ie, IeFormat, IeHeader, Layout, Record, ValueRule,
};

use crate::error::{GtpError, GtpResult};

/// Type announcing an extended IE type
pub const EXTENDED_IE_TYPE: u16 = 238;

/// GTPv1-C IE codec marker
#[derive(Debug, Clone, Copy)]
pub struct Gtp1;

/// GTPv1 IE Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp1IeType {
    // TV
    Cause = 1,
    Imsi = 2,
    Rai = 3,
    ReorderingRequired = 8,
    Recovery = 14,
    SelectionMode = 15,
    TeidDataI = 16,
    TeidControlPlane = 17,
    TeidDataII = 18,
    TeardownInd = 19,
    Nsapi = 20,
    ChargingCharacteristics = 26,
    TraceReference = 27,
    TraceType = 28,
    ChargingId = 127,
    // TLV
    EndUserAddress = 128,
    AccessPointName = 131,
    ProtocolConfigurationOptions = 132,
    GsnAddress = 133,
    Msisdn = 134,
    QualityOfServiceProfile = 135,
    TrafficFlowTemplate = 137,
    ExtensionHeaderTypeList = 141,
    TriggerId = 142,
    OmcIdentity = 143,
    CommonFlags = 148,
    ApnRestriction = 149,
    RatType = 151,
    UserLocationInformation = 152,
    MsTimeZone = 153,
    ImeiSv = 154,
    MsInfoChangeReportingAction = 181,
    DirectTunnelFlags = 182,
    BearerControlMode = 184,
    EvolvedAllocationRetentionPriorityI = 191,
    ExtendedCommonFlags = 193,
    Ambr = 198,
    UliTimestamp = 214,
    SpecialIeTypeForIeTypeExtension = 238,
    ChargingGatewayAddress = 251,
    PrivateExtension = 255,
}

impl Gtp1IeType {
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

/// Check if IE type is TV format (fixed length)
pub fn is_tv_ie(ie_type: u8) -> bool {
    ie_type < 128
}

/// Get TV IE length based on type
pub fn get_tv_ie_length(ie_type: u8) -> Option<usize> {
    match ie_type {
        1 => Some(1),   // Cause
        2 => Some(8),   // IMSI
        3 => Some(6),   // RAI
        4 => Some(4),   // TLLI
        5 => Some(4),   // P-TMSI
        8 => Some(1),   // Reordering Required
        9 => Some(28),  // Authentication Triplet
        11 => Some(1),  // MAP Cause
        12 => Some(3),  // P-TMSI Signature
        13 => Some(1),  // MS Validated
        14 => Some(1),  // Recovery
        15 => Some(1),  // Selection Mode
        16 => Some(4),  // TEID Data I
        17 => Some(4),  // TEID Control Plane
        18 => Some(5),  // TEID Data II
        19 => Some(1),  // Teardown Ind
        20 => Some(1),  // NSAPI
        21 => Some(1),  // RANAP Cause
        22 => Some(9),  // RAB Context
        23 => Some(1),  // Radio Priority SMS
        24 => Some(1),  // Radio Priority
        25 => Some(2),  // Packet Flow ID
        26 => Some(2),  // Charging Characteristics
        27 => Some(2),  // Trace Reference
        28 => Some(2),  // Trace Type
        29 => Some(1),  // MS Not Reachable Reason
        127 => Some(4), // Charging ID
        _ => None,
    }
}

impl IeFormat for Gtp1 {
    const ESCAPE: Option<u16> = Some(EXTENDED_IE_TYPE);

    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
        let tag = cur.read_u8()?;
        let length = if is_tv_ie(tag) {
            None
        } else {
            Some(cur.read_u16()? as usize)
        };
        Ok(IeHeader {
            tag: tag as u16,
            length,
            ..Default::default()
        })
    }

    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
        let tag = u8::try_from(ie.tag)
            .map_err(|_| CodecError::EncodingError(format!("GTPv1 IE type {} exceeds 255", ie.tag)))?;
        match length {
            None => buf.put_u8(tag),
            Some(_) if is_tv_ie(tag) => {
                return Err(CodecError::EncodingError(format!(
                    "GTPv1 IE type {tag} is TV but has no known length"
                )))
            }
            Some(len) => {
                buf.put_u8(tag);
                buf.put_u16(len as u16);
            }
        }
        Ok(())
    }

    fn tv_len(tag: u16) -> Option<usize> {
        u8::try_from(tag).ok().and_then(get_tv_ie_length)
    }
}

// Payload layouts

pub static CAUSE: Layout = Layout::new("Cause", &[FieldDef::uint("cause", 8)]);

pub static IMSI: Layout = Layout::new("IMSI", &[FieldDef::bytes("imsi", 8)]);

pub static RAI: Layout = Layout::new(
    "Routing Area Identity",
    &[
        FieldDef::bytes("plmn_id", 3),
        FieldDef::uint("lac", 16),
        FieldDef::uint("rac", 8),
    ],
);

pub static REORDERING_REQUIRED: Layout = Layout::new(
    "Reordering Required",
    &[
        FieldDef::uint("spare", 7).with_default(0x7F),
        FieldDef::uint("reordering_required", 1),
    ],
);

pub static RECOVERY: Layout = Layout::new("Recovery", &[FieldDef::uint("restart_counter", 8)]);

pub static SELECTION_MODE: Layout = Layout::new(
    "Selection Mode",
    &[
        FieldDef::uint("spare", 6).with_default(0x3F),
        FieldDef::uint("selection_mode", 2),
    ],
);

pub static TEID: Layout = Layout::new("Tunnel Endpoint Identifier", &[FieldDef::uint("teid", 32)]);

pub static TEID_DATA_II: Layout = Layout::new(
    "Tunnel Endpoint Identifier Data II",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("nsapi", 4),
        FieldDef::uint("teid", 32),
    ],
);

pub static TEARDOWN_IND: Layout = Layout::new(
    "Teardown Ind",
    &[
        FieldDef::uint("spare", 7).with_default(0x7F),
        FieldDef::uint("teardown_ind", 1),
    ],
);

/// NSAPI values 0 to 4 are reserved
pub static NSAPI: Layout = Layout::new(
    "NSAPI",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("nsapi", 4).range(5, 15),
    ],
);

pub static CHARGING_CHARACTERISTICS: Layout = Layout::new(
    "Charging Characteristics",
    &[FieldDef::uint("charging_characteristics", 16)],
);

pub static CHARGING_ID: Layout = Layout::new("Charging ID", &[FieldDef::uint("charging_id", 32)]);

pub static END_USER_ADDRESS: Layout = Layout::new(
    "End User Address",
    &[
        FieldDef::uint("spare", 4).with_default(0xF),
        FieldDef::uint("pdp_type_organization", 4),
        FieldDef::uint("pdp_type_number", 8),
        FieldDef::rest("pdp_address"),
    ],
);

pub static ACCESS_POINT_NAME: Layout = Layout::new("Access Point Name", &[FieldDef::rest("apn")]);

pub static GSN_ADDRESS: Layout = Layout::new("GSN Address", &[FieldDef::rest("address")]);

pub static MSISDN: Layout = Layout::new("MSISDN", &[FieldDef::rest("msisdn")]);

pub static QOS_PROFILE: Layout = Layout::new(
    "Quality of Service Profile",
    &[
        FieldDef::uint("allocation_retention_priority", 8),
        FieldDef::rest("profile"),
    ],
);

pub static EXTENSION_HEADER_TYPE_LIST: Layout = Layout::new(
    "Extension Header Type List",
    &[
        FieldDef::uint("count", 8).derived(ValueRule::CountOf("types")),
        FieldDef::list("types", 8),
    ],
);

pub static COMMON_FLAGS: Layout = Layout::new(
    "Common Flags",
    &[
        FieldDef::uint("dual_address_bearer", 1),
        FieldDef::uint("upgrade_qos_supported", 1),
        FieldDef::uint("nrsn", 1),
        FieldDef::uint("no_qos_negotiation", 1),
        FieldDef::uint("mbms_counting_information", 1),
        FieldDef::uint("ran_procedures_ready", 1),
        FieldDef::uint("mbms_service_type", 1),
        FieldDef::uint("prohibit_payload_compression", 1),
    ],
);

pub static APN_RESTRICTION: Layout =
    Layout::new("APN Restriction", &[FieldDef::uint("restriction_type", 8)]);

pub static RAT_TYPE: Layout = Layout::new("RAT Type", &[FieldDef::uint("rat_type", 8)]);

pub static MS_TIME_ZONE: Layout = Layout::new(
    "MS Time Zone",
    &[
        FieldDef::uint("time_zone", 8),
        FieldDef::uint("spare", 6),
        FieldDef::uint("daylight_saving_time", 2),
    ],
);

pub static DIRECT_TUNNEL_FLAGS: Layout = Layout::new(
    "Direct Tunnel Flags",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("ei", 1),
        FieldDef::uint("gcsi", 1),
        FieldDef::uint("dti", 1),
        FieldDef::rest("spare_octets"),
    ],
);

pub static EVOLVED_ARP_I: Layout = Layout::new(
    "Evolved Allocation/Retention Priority I",
    &[
        FieldDef::uint("spare", 1),
        FieldDef::uint("pci", 1),
        FieldDef::uint("pl", 4),
        FieldDef::uint("spare2", 1),
        FieldDef::uint("pvi", 1),
    ],
);

pub static AMBR: Layout = Layout::new(
    "Aggregate Maximum Bit Rate",
    &[
        FieldDef::uint("apn_ambr_uplink", 32),
        FieldDef::uint("apn_ambr_downlink", 32),
    ],
);

/// User Location Information; the location fields depend on the
/// geographic location type and stay opaque.
pub static USER_LOCATION_INFORMATION: Layout = Layout::new(
    "User Location Information",
    &[
        FieldDef::uint("geographic_location_type", 8),
        FieldDef::rest("geographic_location"),
    ],
);

/// Charging Gateway Address, IPv4 or IPv6 by length
pub static CHARGING_GATEWAY_ADDRESS: Layout =
    Layout::new("Charging Gateway Address", &[FieldDef::rest("address")]);

pub static PRIVATE_EXTENSION: Layout = Layout::new(
    "Private Extension",
    &[
        FieldDef::uint("extension_identifier", 16),
        FieldDef::rest("extension_value"),
    ],
);

pub static TRACE_REFERENCE: Layout =
    Layout::new("Trace Reference", &[FieldDef::uint("trace_reference", 16)]);

pub static TRACE_TYPE: Layout = Layout::new("Trace Type", &[FieldDef::uint("trace_type", 16)]);

pub static BEARER_CONTROL_MODE: Layout =
    Layout::new("Bearer Control Mode", &[FieldDef::uint("bearer_control_mode", 8)]);

/// IMEI(SV), TBCD coded
pub static IMEI_SV: Layout = Layout::new("IMEI(SV)", &[FieldDef::bytes("imeisv", 8)]);

fn fields_ie(ie_type: Gtp1IeType, layout: &'static Layout, values: &[(&str, u64)]) -> GtpResult<Ie> {
    Ok(Ie::fields(ie_type.tag(), Record::with(layout, values)?))
}

fn bytes_ie(ie_type: Gtp1IeType, layout: &'static Layout, field: &str, value: Bytes) -> GtpResult<Ie> {
    let mut rec = Record::new(layout);
    rec.set_bytes(field, value)?;
    Ok(Ie::fields(ie_type.tag(), rec))
}

pub fn cause_ie(cause: u8) -> GtpResult<Ie> {
    fields_ie(Gtp1IeType::Cause, &CAUSE, &[("cause", cause as u64)])
}

pub fn recovery_ie(restart_counter: u8) -> GtpResult<Ie> {
    fields_ie(
        Gtp1IeType::Recovery,
        &RECOVERY,
        &[("restart_counter", restart_counter as u64)],
    )
}

pub fn teid_data_i_ie(teid: u32) -> GtpResult<Ie> {
    fields_ie(Gtp1IeType::TeidDataI, &TEID, &[("teid", teid as u64)])
}

pub fn teid_control_plane_ie(teid: u32) -> GtpResult<Ie> {
    fields_ie(Gtp1IeType::TeidControlPlane, &TEID, &[("teid", teid as u64)])
}

pub fn nsapi_ie(nsapi: u8) -> GtpResult<Ie> {
    fields_ie(Gtp1IeType::Nsapi, &NSAPI, &[("nsapi", nsapi as u64)])
}

pub fn gsn_address_ie(address: impl Into<Bytes>) -> GtpResult<Ie> {
    let address = address.into();
    if address.len() != 4 && address.len() != 16 {
        return Err(GtpError::EncodingError(format!(
            "GSN address must be 4 or 16 bytes, got {}",
            address.len()
        )));
    }
    bytes_ie(Gtp1IeType::GsnAddress, &GSN_ADDRESS, "address", address)
}

pub fn apn_ie(apn: impl Into<Bytes>) -> GtpResult<Ie> {
    bytes_ie(Gtp1IeType::AccessPointName, &ACCESS_POINT_NAME, "apn", apn.into())
}

pub fn qos_profile_ie(arp: u8, profile: impl Into<Bytes>) -> GtpResult<Ie> {
    let mut rec = Record::with(&QOS_PROFILE, &[("allocation_retention_priority", arp as u64)])?;
    rec.set_bytes("profile", profile.into())?;
    Ok(Ie::fields(Gtp1IeType::QualityOfServiceProfile.tag(), rec))
}

pub fn extension_header_type_list_ie(types: &[u8]) -> GtpResult<Ie> {
    let mut rec = Record::new(&EXTENSION_HEADER_TYPE_LIST);
    rec.set_list("types", types.iter().map(|t| *t as u64).collect())?;
    Ok(Ie::fields(Gtp1IeType::ExtensionHeaderTypeList.tag(), rec))
}

pub fn private_extension_ie(extension_identifier: u16, value: impl Into<Bytes>) -> GtpResult<Ie> {
    let mut rec = Record::with(
        &PRIVATE_EXTENSION,
        &[("extension_identifier", extension_identifier as u64)],
    )?;
    rec.set_bytes("extension_value", value.into())?;
    Ok(Ie::fields(Gtp1IeType::PrivateExtension.tag(), rec))
}

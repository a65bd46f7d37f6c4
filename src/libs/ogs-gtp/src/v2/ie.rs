//! GTPv2 Information Elements
//!
//! Every GTPv2-C IE (3GPP TS 29.274 section 8) is TLV with a 4-byte
//! header: type, 16-bit length, then a spare nibble and the instance.
//! Type 254 carries a 16-bit extended type after the header.

use bytes::{BufMut, Bytes, BytesMut};
use ogs_tlv::{
    CodecError, CodecResult, Cursor, Entry, FieldDef, Group, GroupSpec, Ie, IeFormat, IeHeader,
    Layout, Presence, Record,
};

use super::types::{Gtp2Cause, Gtp2FTeidInterfaceType, Gtp2PdnType, Gtp2RatType};
use crate::error::{GtpError, GtpResult};

/// Type announcing an extended IE type
pub const EXTENDED_IE_TYPE: u16 = 254;

/// Largest instance value the 4-bit field can carry
pub const GTP2_MAX_INSTANCE: u8 = 15;

/// GTPv2-C IE codec marker
#[derive(Debug, Clone, Copy)]
pub struct Gtp2;

/// GTPv2 IE Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2IeType {
    Imsi = 1,
    Cause = 2,
    Recovery = 3,
    Apn = 71,
    Ambr = 72,
    Ebi = 73,
    Mei = 75,
    Msisdn = 76,
    Indication = 77,
    Pco = 78,
    Paa = 79,
    BearerQos = 80,
    RatType = 82,
    ServingNetwork = 83,
    BearerTft = 84,
    Uli = 86,
    FTeid = 87,
    DelayValue = 92,
    BearerContext = 93,
    ChargingId = 94,
    ChargingCharacteristics = 95,
    BearerFlags = 97,
    PdnType = 99,
    Pti = 100,
    UeTimeZone = 114,
    ApnRestriction = 127,
    SelectionMode = 128,
    NodeType = 135,
    SendingNodeFeatures = 152,
    Arp = 155,
    SpecialIeTypeForIeTypeExtension = 254,
    PrivateExtension = 255,
}

impl Gtp2IeType {
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

impl IeFormat for Gtp2 {
    const ESCAPE: Option<u16> = Some(EXTENDED_IE_TYPE);

    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
        let tag = cur.read_u8()? as u16;
        let length = cur.read_u16()? as usize;
        let spare = cur.read_bits(4)? as u8;
        let instance = cur.read_bits(4)? as u8;
        Ok(IeHeader {
            tag,
            instance,
            spare,
            length: Some(length),
        })
    }

    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
        let tag = u8::try_from(ie.tag)
            .map_err(|_| CodecError::EncodingError(format!("GTPv2 IE type {} exceeds 255", ie.tag)))?;
        let length = length.ok_or_else(|| {
            CodecError::EncodingError(format!("GTPv2 IE type {tag} has no length"))
        })?;
        if ie.instance > GTP2_MAX_INSTANCE || ie.spare > 0x0F {
            return Err(CodecError::EncodingError(format!(
                "GTPv2 IE type {tag}: instance {} or spare {} exceeds 4 bits",
                ie.instance, ie.spare
            )));
        }
        buf.put_u8(tag);
        buf.put_u16(length as u16);
        buf.put_u8((ie.spare << 4) | ie.instance);
        Ok(())
    }
}

// Payload layouts

pub static IMSI: Layout = Layout::new("IMSI", &[FieldDef::rest("imsi")]);

pub static CAUSE: Layout = Layout::new(
    "Cause",
    &[
        FieldDef::uint("cause", 8),
        FieldDef::uint("spare", 5),
        FieldDef::uint("pce", 1),
        FieldDef::uint("bce", 1),
        FieldDef::uint("cs", 1),
        FieldDef::rest("offending_ie"),
    ],
);

pub static RECOVERY: Layout = Layout::new("Recovery", &[FieldDef::uint("restart_counter", 8)]);

pub static APN: Layout = Layout::new("Access Point Name", &[FieldDef::rest("apn")]);

pub static AMBR: Layout = Layout::new(
    "Aggregate Maximum Bit Rate",
    &[
        FieldDef::uint("uplink", 32),
        FieldDef::uint("downlink", 32),
    ],
);

pub static EBI: Layout = Layout::new(
    "EPS Bearer ID",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("ebi", 4),
        FieldDef::rest("spare_octets"),
    ],
);

pub static MEI: Layout = Layout::new("Mobile Equipment Identity", &[FieldDef::rest("mei")]);

pub static MSISDN: Layout = Layout::new("MSISDN", &[FieldDef::rest("msisdn")]);

/// Indication flags; the octet count grows with each release
pub static INDICATION: Layout = Layout::new("Indication", &[FieldDef::rest("flags")]);

pub static PAA: Layout = Layout::new(
    "PDN Address Allocation",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("pdn_type", 3),
        FieldDef::rest("address"),
    ],
);

pub static BEARER_QOS: Layout = Layout::new(
    "Bearer Level QoS",
    &[
        FieldDef::uint("spare", 1),
        FieldDef::uint("pci", 1),
        FieldDef::uint("pl", 4),
        FieldDef::uint("spare2", 1),
        FieldDef::uint("pvi", 1),
        FieldDef::uint("qci", 8),
        FieldDef::uint("mbr_uplink", 40),
        FieldDef::uint("mbr_downlink", 40),
        FieldDef::uint("gbr_uplink", 40),
        FieldDef::uint("gbr_downlink", 40),
    ],
);

pub static RAT_TYPE: Layout = Layout::new("RAT Type", &[FieldDef::uint("rat_type", 8)]);

pub static SERVING_NETWORK: Layout =
    Layout::new("Serving Network", &[FieldDef::bytes("plmn_id", 3)]);

pub static ULI: Layout = Layout::new(
    "User Location Information",
    &[
        FieldDef::uint("extended_macro_enodeb_id", 1),
        FieldDef::uint("macro_enodeb_id", 1),
        FieldDef::uint("lai", 1),
        FieldDef::uint("ecgi", 1),
        FieldDef::uint("tai", 1),
        FieldDef::uint("rai", 1),
        FieldDef::uint("sai", 1),
        FieldDef::uint("cgi", 1),
        FieldDef::rest("locations"),
    ],
);

pub static F_TEID: Layout = Layout::new(
    "Fully Qualified TEID",
    &[
        FieldDef::uint("v4", 1),
        FieldDef::uint("v6", 1),
        FieldDef::uint("interface_type", 6),
        FieldDef::uint("teid_gre_key", 32),
        FieldDef::bytes("ipv4_address", 4).present(Presence::IfSet("v4")),
        FieldDef::bytes("ipv6_address", 16).present(Presence::IfSet("v6")),
    ],
);

pub static DELAY_VALUE: Layout = Layout::new("Delay Value", &[FieldDef::uint("delay", 8)]);

pub static CHARGING_ID: Layout = Layout::new("Charging ID", &[FieldDef::uint("charging_id", 32)]);

pub static CHARGING_CHARACTERISTICS: Layout = Layout::new(
    "Charging Characteristics",
    &[FieldDef::uint("charging_characteristics", 16)],
);

pub static BEARER_FLAGS: Layout = Layout::new(
    "Bearer Flags",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("asi", 1),
        FieldDef::uint("vind", 1),
        FieldDef::uint("vb", 1),
        FieldDef::uint("ppc", 1),
    ],
);

pub static PDN_TYPE: Layout = Layout::new(
    "PDN Type",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("pdn_type", 3).range(Gtp2PdnType::Ipv4 as u64, Gtp2PdnType::Ethernet as u64),
    ],
);

pub static PTI: Layout = Layout::new("Procedure Transaction ID", &[FieldDef::uint("pti", 8)]);

pub static UE_TIME_ZONE: Layout = Layout::new(
    "UE Time Zone",
    &[
        FieldDef::uint("time_zone", 8),
        FieldDef::uint("spare", 6),
        FieldDef::uint("daylight_saving_time", 2),
    ],
);

pub static APN_RESTRICTION: Layout =
    Layout::new("APN Restriction", &[FieldDef::uint("restriction_type", 8)]);

pub static SELECTION_MODE: Layout = Layout::new(
    "Selection Mode",
    &[
        FieldDef::uint("spare", 6),
        FieldDef::uint("selection_mode", 2),
    ],
);

pub static NODE_TYPE: Layout = Layout::new("Node Type", &[FieldDef::uint("node_type", 8)]);

pub static SENDING_NODE_FEATURES: Layout =
    Layout::new("Node Features", &[FieldDef::uint("features", 8)]);

pub static ARP: Layout = Layout::new(
    "Allocation/Retention Priority",
    &[
        FieldDef::uint("spare", 1),
        FieldDef::uint("pci", 1),
        FieldDef::uint("pl", 4),
        FieldDef::uint("spare2", 1),
        FieldDef::uint("pvi", 1),
    ],
);

pub static PRIVATE_EXTENSION: Layout = Layout::new(
    "Private Extension",
    &[
        FieldDef::uint("enterprise_id", 16),
        FieldDef::rest("value"),
    ],
);

// Bearer Context, grouped. The generic form applies wherever a message
// does not scope a more specific one.

pub static BEARER_CONTEXT: GroupSpec = GroupSpec::keyed(
    "Bearer Context",
    &[Entry::new(73, 0, "EPS Bearer ID")],
    &[
        Entry::new(2, 0, "Cause"),
        Entry::new(78, 0, "Protocol Configuration Options"),
        Entry::new(80, 0, "Bearer Level QoS"),
        Entry::new(84, 0, "Bearer TFT"),
        Entry::new(87, 0, "F-TEID"),
        Entry::new(87, 1, "F-TEID"),
        Entry::new(87, 2, "F-TEID"),
        Entry::new(87, 3, "F-TEID"),
        Entry::new(87, 4, "F-TEID"),
        Entry::new(87, 5, "F-TEID"),
        Entry::new(94, 0, "Charging ID"),
        Entry::new(97, 0, "Bearer Flags"),
    ],
);

pub static BEARER_CONTEXT_TO_BE_CREATED: GroupSpec = GroupSpec::keyed(
    "Bearer Context to be created",
    &[
        Entry::new(73, 0, "EPS Bearer ID"),
        Entry::new(80, 0, "Bearer Level QoS"),
    ],
    &[
        Entry::new(84, 0, "TFT"),
        Entry::new(87, 0, "S1-U eNodeB F-TEID"),
        Entry::new(87, 1, "S4-U SGSN F-TEID"),
        Entry::new(87, 2, "S5/S8-U SGW F-TEID"),
        Entry::new(87, 3, "S5/S8-U PGW F-TEID"),
        Entry::new(87, 4, "S12 RNC F-TEID"),
        Entry::new(87, 5, "S2b-U ePDG F-TEID"),
    ],
);

pub static BEARER_CONTEXT_TO_BE_REMOVED: GroupSpec = GroupSpec::keyed(
    "Bearer Context to be removed",
    &[Entry::new(73, 0, "EPS Bearer ID")],
    &[Entry::new(87, 0, "S4-U SGSN F-TEID")],
);

pub static BEARER_CONTEXT_CREATED: GroupSpec = GroupSpec::keyed(
    "Bearer Context created",
    &[
        Entry::new(73, 0, "EPS Bearer ID"),
        Entry::new(2, 0, "Cause"),
    ],
    &[
        Entry::new(87, 0, "S1-U SGW F-TEID"),
        Entry::new(87, 1, "S4-U SGW F-TEID"),
        Entry::new(87, 2, "S5/S8-U PGW F-TEID"),
        Entry::new(87, 3, "S12 SGW F-TEID"),
        Entry::new(80, 0, "Bearer Level QoS"),
        Entry::new(94, 0, "Charging ID"),
        Entry::new(97, 0, "Bearer Flags"),
    ],
);

pub static BEARER_CONTEXT_MARKED_FOR_REMOVAL: GroupSpec = GroupSpec::keyed(
    "Bearer Context marked for removal",
    &[
        Entry::new(73, 0, "EPS Bearer ID"),
        Entry::new(2, 0, "Cause"),
    ],
    &[],
);

pub static BEARER_CONTEXT_TO_BE_ESTABLISHED: GroupSpec = GroupSpec::keyed(
    "Bearer Context to be established",
    &[
        Entry::new(73, 0, "EPS Bearer ID"),
        Entry::new(84, 0, "TFT"),
        Entry::new(80, 0, "Bearer Level QoS"),
    ],
    &[
        Entry::new(78, 0, "Protocol Configuration Options"),
        Entry::new(87, 0, "S1-U SGW F-TEID"),
        Entry::new(87, 1, "S5/S8-U PGW F-TEID"),
        Entry::new(87, 2, "S12 SGW F-TEID"),
        Entry::new(87, 3, "S4-U SGW F-TEID"),
        Entry::new(94, 0, "Charging ID"),
        Entry::new(97, 0, "Bearer Flags"),
    ],
);

fn fields_ie(ie_type: Gtp2IeType, layout: &'static Layout, values: &[(&str, u64)]) -> GtpResult<Ie> {
    Ok(Ie::fields(ie_type.tag(), Record::with(layout, values)?))
}

fn bytes_ie(ie_type: Gtp2IeType, layout: &'static Layout, field: &str, value: Bytes) -> GtpResult<Ie> {
    let mut rec = Record::new(layout);
    rec.set_bytes(field, value)?;
    Ok(Ie::fields(ie_type.tag(), rec))
}

pub fn imsi_ie(imsi: impl Into<Bytes>) -> GtpResult<Ie> {
    bytes_ie(Gtp2IeType::Imsi, &IMSI, "imsi", imsi.into())
}

pub fn cause_ie(cause: Gtp2Cause) -> GtpResult<Ie> {
    fields_ie(Gtp2IeType::Cause, &CAUSE, &[("cause", cause as u64)])
}

pub fn recovery_ie(restart_counter: u8) -> GtpResult<Ie> {
    fields_ie(
        Gtp2IeType::Recovery,
        &RECOVERY,
        &[("restart_counter", restart_counter as u64)],
    )
}

pub fn apn_ie(apn: impl Into<Bytes>) -> GtpResult<Ie> {
    bytes_ie(Gtp2IeType::Apn, &APN, "apn", apn.into())
}

pub fn ambr_ie(uplink: u32, downlink: u32) -> GtpResult<Ie> {
    fields_ie(
        Gtp2IeType::Ambr,
        &AMBR,
        &[("uplink", uplink as u64), ("downlink", downlink as u64)],
    )
}

pub fn ebi_ie(ebi: u8) -> GtpResult<Ie> {
    fields_ie(Gtp2IeType::Ebi, &EBI, &[("ebi", ebi as u64)])
}

pub fn rat_type_ie(rat_type: Gtp2RatType) -> GtpResult<Ie> {
    fields_ie(Gtp2IeType::RatType, &RAT_TYPE, &[("rat_type", rat_type as u64)])
}

pub fn pdn_type_ie(pdn_type: Gtp2PdnType) -> GtpResult<Ie> {
    fields_ie(Gtp2IeType::PdnType, &PDN_TYPE, &[("pdn_type", pdn_type as u64)])
}

/// F-TEID with an IPv4 address
pub fn f_teid_ipv4_ie(
    instance: u8,
    interface_type: Gtp2FTeidInterfaceType,
    teid: u32,
    addr: [u8; 4],
) -> GtpResult<Ie> {
    let mut rec = Record::with(
        &F_TEID,
        &[
            ("v4", 1),
            ("interface_type", interface_type as u64),
            ("teid_gre_key", teid as u64),
        ],
    )?;
    rec.set_bytes("ipv4_address", addr.to_vec())?;
    Ok(Ie::fields(Gtp2IeType::FTeid.tag(), rec).with_instance(instance))
}

/// Bearer Level QoS; bit rates in kbps
pub fn bearer_qos_ie(qci: u8, pl: u8, mbr: (u64, u64), gbr: (u64, u64)) -> GtpResult<Ie> {
    fields_ie(
        Gtp2IeType::BearerQos,
        &BEARER_QOS,
        &[
            ("pl", pl as u64),
            ("qci", qci as u64),
            ("mbr_uplink", mbr.0),
            ("mbr_downlink", mbr.1),
            ("gbr_uplink", gbr.0),
            ("gbr_downlink", gbr.1),
        ],
    )
}

pub fn bearer_context_ie(instance: u8, ies: Group) -> GtpResult<Ie> {
    if instance > GTP2_MAX_INSTANCE {
        return Err(GtpError::EncodingError(format!(
            "instance {instance} exceeds {GTP2_MAX_INSTANCE}"
        )));
    }
    Ok(Ie::grouped(Gtp2IeType::BearerContext.tag(), ies).with_instance(instance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_carries_instance() {
        let mut buf = BytesMut::new();
        recovery_ie(3)
            .unwrap()
            .with_instance(2)
            .encode::<Gtp2>(&mut buf)
            .unwrap();
        assert_eq!(buf.as_ref(), &[3, 0, 1, 0x02, 3]);
    }

    #[test]
    fn test_instance_overflow_rejected() {
        let mut buf = BytesMut::new();
        let err = Ie::raw(3, vec![1]).with_instance(16).encode::<Gtp2>(&mut buf);
        assert!(matches!(err, Err(CodecError::EncodingError(_))));
        assert!(bearer_context_ie(16, Group::new()).is_err());
    }

    #[test]
    fn test_f_teid_ipv4() {
        let ie = f_teid_ipv4_ie(
            1,
            Gtp2FTeidInterfaceType::S5S8PgwGtpC,
            0x01020304,
            [192, 168, 0, 1],
        )
        .unwrap();
        let mut buf = BytesMut::new();
        ie.encode::<Gtp2>(&mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[87, 0, 9, 0x01, 0x87, 1, 2, 3, 4, 192, 168, 0, 1]
        );
    }

    #[test]
    fn test_bearer_qos_size() {
        let ie = bearer_qos_ie(9, 15, (0, 0), (0, 0)).unwrap();
        assert_eq!(ie.value_bytes::<Gtp2>().unwrap().len(), 22);
    }

    #[test]
    fn test_pdn_type_range() {
        assert!(pdn_type_ie(Gtp2PdnType::Ipv4v6).is_ok());
        let mut rec = Record::new(&PDN_TYPE);
        assert!(rec.set("pdn_type", 0).is_err());
    }
}

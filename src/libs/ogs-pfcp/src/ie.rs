//! PFCP Information Elements
//!
//! IE framing, payload layouts and grouped IE tables for PFCP as specified
//! in 3GPP TS 29.244 section 8. Every IE carries a 16-bit type and a 16-bit
//! length; types with the top bit set are vendor-specific and carry an
//! enterprise ID ahead of the value.

use bytes::{BufMut, Bytes, BytesMut};
use ogs_tlv::{
    CodecError, CodecResult, Cursor, Entry, FieldDef, Group, GroupSpec, Ie, IeFormat, IeHeader,
    Layout, Presence, Record,
};

use crate::error::{PfcpError, PfcpResult};
use crate::types::*;

/// Type bit marking a vendor-specific IE
pub const PFCP_ENTERPRISE_BIT: u16 = 0x8000;

/// PFCP IE codec marker
#[derive(Debug, Clone, Copy)]
pub struct Pfcp;

/// PFCP IE Type values (TS 29.244 Section 8.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum IeType {
    CreatePdr = 1,
    Pdi = 2,
    CreateFar = 3,
    ForwardingParameters = 4,
    CreateUrr = 6,
    CreateQer = 7,
    CreatedPdr = 8,
    UpdatePdr = 9,
    UpdateFar = 10,
    UpdateForwardingParameters = 11,
    RemovePdr = 15,
    RemoveFar = 16,
    RemoveUrr = 17,
    RemoveQer = 18,
    Cause = 19,
    SourceInterface = 20,
    FTeid = 21,
    NetworkInstance = 22,
    SdfFilter = 23,
    ApplicationId = 24,
    GateStatus = 25,
    Mbr = 26,
    Gbr = 27,
    Precedence = 29,
    VolumeThreshold = 31,
    ReportingTriggers = 37,
    ReportType = 39,
    OffendingIe = 40,
    DestinationInterface = 42,
    UpFunctionFeatures = 43,
    ApplyAction = 44,
    PfcpSmreqFlags = 49,
    PdrId = 56,
    FSeid = 57,
    NodeId = 60,
    MeasurementMethod = 62,
    UsageReportTrigger = 63,
    VolumeMeasurement = 66,
    UsageReportSrr = 80,
    UrrId = 81,
    DownlinkDataReport = 83,
    OuterHeaderCreation = 84,
    BarId = 88,
    CpFunctionFeatures = 89,
    UeIpAddress = 93,
    OuterHeaderRemoval = 95,
    RecoveryTimeStamp = 96,
    UrSeqn = 104,
    FarId = 108,
    QerId = 109,
    PdnType = 113,
    FailedRuleId = 114,
    UserPlaneInactivityTimer = 117,
    Qfi = 124,
}

impl IeType {
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

impl IeFormat for Pfcp {
    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
        let tag = cur.read_u16()?;
        let length = cur.read_u16()? as usize;
        Ok(IeHeader {
            tag,
            instance: 0,
            spare: 0,
            length: Some(length),
        })
    }

    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
        let length = length
            .ok_or_else(|| CodecError::EncodingError(format!("PFCP IE {} has no length", ie.tag)))?;
        if ie.instance != 0 {
            return Err(CodecError::EncodingError(format!(
                "PFCP IE {} has no instance field",
                ie.tag
            )));
        }
        buf.put_u16(ie.tag);
        buf.put_u16(length as u16);
        Ok(())
    }

    fn has_enterprise(tag: u16) -> bool {
        tag & PFCP_ENTERPRISE_BIT != 0
    }
}

// Payload layouts

pub static CAUSE: Layout = Layout::new("Cause", &[FieldDef::uint("cause", 8)]);

pub static SOURCE_INTERFACE: Layout = Layout::new(
    "Source Interface",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("interface", 4),
    ],
);

/// F-TEID. With CH set the UP function chooses the TEID and no address
/// follows; the choose ID is present when CHID is set.
pub static F_TEID: Layout = Layout::new(
    "F-TEID",
    &[
        FieldDef::uint("flags", 8),
        FieldDef::uint("teid", 32).present(Presence::IfMasked {
            flag: "flags",
            mask: F_TEID_CH,
            value: 0,
        }),
        FieldDef::bytes("ipv4_address", 4).present(Presence::IfMasked {
            flag: "flags",
            mask: F_TEID_CH | F_TEID_V4,
            value: F_TEID_V4,
        }),
        FieldDef::bytes("ipv6_address", 16).present(Presence::IfMasked {
            flag: "flags",
            mask: F_TEID_CH | F_TEID_V6,
            value: F_TEID_V6,
        }),
        FieldDef::uint("choose_id", 8).present(Presence::IfBits {
            flag: "flags",
            mask: F_TEID_CHID,
        }),
    ],
);

pub static NETWORK_INSTANCE: Layout =
    Layout::new("Network Instance", &[FieldDef::rest("network_instance")]);

pub static GATE_STATUS: Layout = Layout::new(
    "Gate Status",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("ul_gate", 2),
        FieldDef::uint("dl_gate", 2),
    ],
);

pub static BIT_RATE: Layout = Layout::new(
    "Bit Rate",
    &[
        FieldDef::uint("uplink", 40),
        FieldDef::uint("downlink", 40),
    ],
);

pub static PRECEDENCE: Layout = Layout::new("Precedence", &[FieldDef::uint("precedence", 32)]);

pub static REPORT_TYPE: Layout = Layout::new(
    "Report Type",
    &[
        FieldDef::uint("spare", 1),
        FieldDef::uint("uisr", 1),
        FieldDef::uint("sesr", 1),
        FieldDef::uint("tmir", 1),
        FieldDef::uint("upir", 1),
        FieldDef::uint("erir", 1),
        FieldDef::uint("usar", 1),
        FieldDef::uint("dldr", 1),
    ],
);

pub static OFFENDING_IE: Layout = Layout::new("Offending IE", &[FieldDef::uint("ie_type", 16)]);

pub static DESTINATION_INTERFACE: Layout = Layout::new(
    "Destination Interface",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("interface", 4),
    ],
);

/// Feature octets grow with each release
pub static FEATURES: Layout = Layout::new("Function Features", &[FieldDef::rest("features")]);

pub static APPLY_ACTION: Layout = Layout::new(
    "Apply Action",
    &[
        FieldDef::uint("flags", 8),
        FieldDef::rest("extended_flags"),
    ],
);

pub static PDR_ID: Layout = Layout::new("PDR ID", &[FieldDef::uint("rule_id", 16)]);

pub static F_SEID: Layout = Layout::new(
    "F-SEID",
    &[
        FieldDef::uint("spare", 6),
        FieldDef::uint("v4", 1),
        FieldDef::uint("v6", 1),
        FieldDef::uint("seid", 64),
        FieldDef::bytes("ipv4_address", 4).present(Presence::IfSet("v4")),
        FieldDef::bytes("ipv6_address", 16).present(Presence::IfSet("v6")),
    ],
);

pub static NODE_ID: Layout = Layout::new(
    "Node ID",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("node_id_type", 4).range(NodeIdType::Ipv4 as u64, NodeIdType::Fqdn as u64),
        FieldDef::rest("node_id"),
    ],
);

pub static MEASUREMENT_METHOD: Layout = Layout::new(
    "Measurement Method",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("event", 1),
        FieldDef::uint("volum", 1),
        FieldDef::uint("durat", 1),
    ],
);

/// Trigger octets grow with each release
pub static TRIGGERS: Layout = Layout::new("Triggers", &[FieldDef::rest("triggers")]);

pub static VOLUME: Layout = Layout::new(
    "Volume",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("dlvol", 1),
        FieldDef::uint("ulvol", 1),
        FieldDef::uint("tovol", 1),
        FieldDef::uint("total_volume", 64).present(Presence::IfSet("tovol")),
        FieldDef::uint("uplink_volume", 64).present(Presence::IfSet("ulvol")),
        FieldDef::uint("downlink_volume", 64).present(Presence::IfSet("dlvol")),
    ],
);

pub static URR_ID: Layout = Layout::new("URR ID", &[FieldDef::uint("rule_id", 32)]);

/// Outer Header Creation; each description bit pulls in its own fields
pub static OUTER_HEADER_CREATION: Layout = Layout::new(
    "Outer Header Creation",
    &[
        FieldDef::uint("description", 16),
        FieldDef::uint("teid", 32).present(Presence::IfBits {
            flag: "description",
            mask: OHC_GTPU_UDP_IPV4 | OHC_GTPU_UDP_IPV6,
        }),
        FieldDef::bytes("ipv4_address", 4).present(Presence::IfBits {
            flag: "description",
            mask: OHC_GTPU_UDP_IPV4 | OHC_UDP_IPV4 | OHC_IPV4,
        }),
        FieldDef::bytes("ipv6_address", 16).present(Presence::IfBits {
            flag: "description",
            mask: OHC_GTPU_UDP_IPV6 | OHC_UDP_IPV6 | OHC_IPV6,
        }),
        FieldDef::uint("port_number", 16).present(Presence::IfBits {
            flag: "description",
            mask: OHC_UDP_IPV4 | OHC_UDP_IPV6,
        }),
        FieldDef::bytes("c_tag", 3).present(Presence::IfBits {
            flag: "description",
            mask: OHC_C_TAG,
        }),
        FieldDef::bytes("s_tag", 3).present(Presence::IfBits {
            flag: "description",
            mask: OHC_S_TAG,
        }),
    ],
);

pub static BAR_ID: Layout = Layout::new("BAR ID", &[FieldDef::uint("bar_id", 8)]);

pub static UE_IP_ADDRESS: Layout = Layout::new(
    "UE IP Address",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("ipv6d", 1),
        FieldDef::uint("sd", 1),
        FieldDef::uint("v4", 1),
        FieldDef::uint("v6", 1),
        FieldDef::bytes("ipv4_address", 4).present(Presence::IfSet("v4")),
        FieldDef::bytes("ipv6_address", 16).present(Presence::IfSet("v6")),
        FieldDef::uint("ipv6_prefix_delegation_bits", 8).present(Presence::IfSet("ipv6d")),
    ],
);

pub static OUTER_HEADER_REMOVAL: Layout = Layout::new(
    "Outer Header Removal",
    &[
        FieldDef::uint("description", 8),
        FieldDef::rest("extension_header_deletion"),
    ],
);

pub static RECOVERY_TIME_STAMP: Layout =
    Layout::new("Recovery Time Stamp", &[FieldDef::uint("timestamp", 32)]);

pub static UR_SEQN: Layout = Layout::new("UR-SEQN", &[FieldDef::uint("seqn", 32)]);

pub static FAR_ID: Layout = Layout::new("FAR ID", &[FieldDef::uint("rule_id", 32)]);

pub static QER_ID: Layout = Layout::new("QER ID", &[FieldDef::uint("rule_id", 32)]);

pub static PDN_TYPE: Layout = Layout::new(
    "PDN Type",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("pdn_type", 3).range(1, 5),
    ],
);

pub static FAILED_RULE_ID: Layout = Layout::new(
    "Failed Rule ID",
    &[
        FieldDef::uint("spare", 3),
        FieldDef::uint("rule_id_type", 5),
        FieldDef::rest("rule_id"),
    ],
);

pub static TIMER_VALUE: Layout = Layout::new("Timer", &[FieldDef::uint("seconds", 32)]);

pub static QFI: Layout = Layout::new(
    "QFI",
    &[
        FieldDef::uint("spare", 2),
        FieldDef::uint("qfi", 6),
    ],
);

pub static SMREQ_FLAGS: Layout = Layout::new(
    "PFCPSMReq-Flags",
    &[
        FieldDef::uint("spare", 5),
        FieldDef::uint("qaurr", 1),
        FieldDef::uint("sndem", 1),
        FieldDef::uint("drobu", 1),
    ],
);

// Grouped IEs

pub static CREATE_PDR: GroupSpec = GroupSpec::keyed(
    "Create PDR",
    &[
        Entry::new(56, 0, "PDR ID"),
        Entry::new(29, 0, "Precedence"),
        Entry::new(2, 0, "PDI"),
    ],
    &[
        Entry::new(95, 0, "Outer Header Removal"),
        Entry::new(108, 0, "FAR ID"),
        Entry::new(81, 0, "URR ID"),
        Entry::new(109, 0, "QER ID"),
    ],
);

pub static PDI: GroupSpec = GroupSpec::keyed(
    "PDI",
    &[Entry::new(20, 0, "Source Interface")],
    &[
        Entry::new(21, 0, "Local F-TEID"),
        Entry::new(22, 0, "Network Instance"),
        Entry::new(93, 0, "UE IP Address"),
        Entry::new(23, 0, "SDF Filter"),
        Entry::new(24, 0, "Application ID"),
        Entry::new(124, 0, "QFI"),
    ],
);

pub static CREATE_FAR: GroupSpec = GroupSpec::keyed(
    "Create FAR",
    &[
        Entry::new(108, 0, "FAR ID"),
        Entry::new(44, 0, "Apply Action"),
    ],
    &[
        Entry::new(4, 0, "Forwarding Parameters"),
        Entry::new(88, 0, "BAR ID"),
    ],
);

pub static FORWARDING_PARAMETERS: GroupSpec = GroupSpec::keyed(
    "Forwarding Parameters",
    &[Entry::new(42, 0, "Destination Interface")],
    &[
        Entry::new(22, 0, "Network Instance"),
        Entry::new(84, 0, "Outer Header Creation"),
    ],
);

pub static CREATE_URR: GroupSpec = GroupSpec::keyed(
    "Create URR",
    &[
        Entry::new(81, 0, "URR ID"),
        Entry::new(62, 0, "Measurement Method"),
        Entry::new(37, 0, "Reporting Triggers"),
    ],
    &[Entry::new(31, 0, "Volume Threshold")],
);

pub static CREATE_QER: GroupSpec = GroupSpec::keyed(
    "Create QER",
    &[
        Entry::new(109, 0, "QER ID"),
        Entry::new(25, 0, "Gate Status"),
    ],
    &[
        Entry::new(26, 0, "Maximum Bitrate"),
        Entry::new(27, 0, "Guaranteed Bitrate"),
        Entry::new(124, 0, "QoS Flow Identifier"),
    ],
);

pub static CREATED_PDR: GroupSpec = GroupSpec::keyed(
    "Created PDR",
    &[Entry::new(56, 0, "PDR ID")],
    &[
        Entry::new(21, 0, "Local F-TEID"),
        Entry::new(93, 0, "UE IP Address"),
    ],
);

pub static UPDATE_PDR: GroupSpec = GroupSpec::keyed(
    "Update PDR",
    &[Entry::new(56, 0, "PDR ID")],
    &[
        Entry::new(95, 0, "Outer Header Removal"),
        Entry::new(29, 0, "Precedence"),
        Entry::new(2, 0, "PDI"),
        Entry::new(108, 0, "FAR ID"),
    ],
);

pub static UPDATE_FAR: GroupSpec = GroupSpec::keyed(
    "Update FAR",
    &[Entry::new(108, 0, "FAR ID")],
    &[
        Entry::new(44, 0, "Apply Action"),
        Entry::new(11, 0, "Update Forwarding Parameters"),
        Entry::new(88, 0, "BAR ID"),
    ],
);

pub static UPDATE_FORWARDING_PARAMETERS: GroupSpec = GroupSpec::keyed(
    "Update Forwarding Parameters",
    &[],
    &[
        Entry::new(42, 0, "Destination Interface"),
        Entry::new(22, 0, "Network Instance"),
        Entry::new(84, 0, "Outer Header Creation"),
    ],
);

pub static REMOVE_PDR: GroupSpec =
    GroupSpec::keyed("Remove PDR", &[Entry::new(56, 0, "PDR ID")], &[]);

pub static REMOVE_FAR: GroupSpec =
    GroupSpec::keyed("Remove FAR", &[Entry::new(108, 0, "FAR ID")], &[]);

pub static REMOVE_URR: GroupSpec =
    GroupSpec::keyed("Remove URR", &[Entry::new(81, 0, "URR ID")], &[]);

pub static REMOVE_QER: GroupSpec =
    GroupSpec::keyed("Remove QER", &[Entry::new(109, 0, "QER ID")], &[]);

pub static USAGE_REPORT_SRR: GroupSpec = GroupSpec::keyed(
    "Usage Report (Session Report Request)",
    &[
        Entry::new(81, 0, "URR ID"),
        Entry::new(104, 0, "UR-SEQN"),
        Entry::new(63, 0, "Usage Report Trigger"),
    ],
    &[Entry::new(66, 0, "Volume Measurement")],
);

pub static DOWNLINK_DATA_REPORT: GroupSpec = GroupSpec::keyed(
    "Downlink Data Report",
    &[Entry::new(56, 0, "PDR ID")],
    &[],
);

fn fields_ie(ie_type: IeType, layout: &'static Layout, values: &[(&str, u64)]) -> PfcpResult<Ie> {
    Ok(Ie::fields(ie_type.tag(), Record::with(layout, values)?))
}

pub fn cause_ie(cause: PfcpCause) -> PfcpResult<Ie> {
    fields_ie(IeType::Cause, &CAUSE, &[("cause", cause as u64)])
}

pub fn recovery_time_stamp_ie(timestamp: u32) -> PfcpResult<Ie> {
    fields_ie(
        IeType::RecoveryTimeStamp,
        &RECOVERY_TIME_STAMP,
        &[("timestamp", timestamp as u64)],
    )
}

pub fn node_id_ipv4_ie(addr: [u8; 4]) -> PfcpResult<Ie> {
    let mut rec = Record::with(&NODE_ID, &[("node_id_type", NodeIdType::Ipv4 as u64)])?;
    rec.set_bytes("node_id", addr.to_vec())?;
    Ok(Ie::fields(IeType::NodeId.tag(), rec))
}

/// Node ID carrying an FQDN, already in DNS label encoding
pub fn node_id_fqdn_ie(fqdn: impl Into<Bytes>) -> PfcpResult<Ie> {
    let mut rec = Record::with(&NODE_ID, &[("node_id_type", NodeIdType::Fqdn as u64)])?;
    rec.set_bytes("node_id", fqdn.into())?;
    Ok(Ie::fields(IeType::NodeId.tag(), rec))
}

pub fn f_seid_ipv4_ie(seid: u64, addr: [u8; 4]) -> PfcpResult<Ie> {
    let mut rec = Record::with(&F_SEID, &[("v4", 1), ("seid", seid)])?;
    rec.set_bytes("ipv4_address", addr.to_vec())?;
    Ok(Ie::fields(IeType::FSeid.tag(), rec))
}

pub fn f_teid_ipv4_ie(teid: u32, addr: [u8; 4]) -> PfcpResult<Ie> {
    let mut rec = Record::with(&F_TEID, &[("flags", F_TEID_V4), ("teid", teid as u64)])?;
    rec.set_bytes("ipv4_address", addr.to_vec())?;
    Ok(Ie::fields(IeType::FTeid.tag(), rec))
}

/// F-TEID asking the UP function to allocate an IPv4 TEID
pub fn f_teid_choose_ie(choose_id: Option<u8>) -> PfcpResult<Ie> {
    let mut flags = F_TEID_CH | F_TEID_V4;
    if choose_id.is_some() {
        flags |= F_TEID_CHID;
    }
    let mut rec = Record::with(&F_TEID, &[("flags", flags)])?;
    if let Some(id) = choose_id {
        rec.set("choose_id", id as u64)?;
    }
    Ok(Ie::fields(IeType::FTeid.tag(), rec))
}

pub fn source_interface_ie(interface: SourceInterface) -> PfcpResult<Ie> {
    fields_ie(
        IeType::SourceInterface,
        &SOURCE_INTERFACE,
        &[("interface", interface as u64)],
    )
}

pub fn destination_interface_ie(interface: DestinationInterface) -> PfcpResult<Ie> {
    fields_ie(
        IeType::DestinationInterface,
        &DESTINATION_INTERFACE,
        &[("interface", interface as u64)],
    )
}

pub fn network_instance_ie(name: impl Into<Bytes>) -> PfcpResult<Ie> {
    let mut rec = Record::new(&NETWORK_INSTANCE);
    rec.set_bytes("network_instance", name.into())?;
    Ok(Ie::fields(IeType::NetworkInstance.tag(), rec))
}

pub fn pdr_id_ie(rule_id: u16) -> PfcpResult<Ie> {
    fields_ie(IeType::PdrId, &PDR_ID, &[("rule_id", rule_id as u64)])
}

pub fn far_id_ie(rule_id: u32) -> PfcpResult<Ie> {
    fields_ie(IeType::FarId, &FAR_ID, &[("rule_id", rule_id as u64)])
}

pub fn urr_id_ie(rule_id: u32) -> PfcpResult<Ie> {
    fields_ie(IeType::UrrId, &URR_ID, &[("rule_id", rule_id as u64)])
}

pub fn qer_id_ie(rule_id: u32) -> PfcpResult<Ie> {
    fields_ie(IeType::QerId, &QER_ID, &[("rule_id", rule_id as u64)])
}

pub fn precedence_ie(precedence: u32) -> PfcpResult<Ie> {
    fields_ie(
        IeType::Precedence,
        &PRECEDENCE,
        &[("precedence", precedence as u64)],
    )
}

pub fn apply_action_ie(flags: u64) -> PfcpResult<Ie> {
    fields_ie(IeType::ApplyAction, &APPLY_ACTION, &[("flags", flags)])
}

pub fn outer_header_creation_gtpu_ipv4_ie(teid: u32, addr: [u8; 4]) -> PfcpResult<Ie> {
    let mut rec = Record::with(
        &OUTER_HEADER_CREATION,
        &[("description", OHC_GTPU_UDP_IPV4), ("teid", teid as u64)],
    )?;
    rec.set_bytes("ipv4_address", addr.to_vec())?;
    Ok(Ie::fields(IeType::OuterHeaderCreation.tag(), rec))
}

pub fn outer_header_removal_ie(description: OuterHeaderRemovalDescription) -> PfcpResult<Ie> {
    fields_ie(
        IeType::OuterHeaderRemoval,
        &OUTER_HEADER_REMOVAL,
        &[("description", description as u64)],
    )
}

/// UE IP Address; `destination` sets the S/D flag
pub fn ue_ip_address_ipv4_ie(addr: [u8; 4], destination: bool) -> PfcpResult<Ie> {
    let mut rec = Record::with(&UE_IP_ADDRESS, &[("v4", 1), ("sd", destination as u64)])?;
    rec.set_bytes("ipv4_address", addr.to_vec())?;
    Ok(Ie::fields(IeType::UeIpAddress.tag(), rec))
}

pub fn report_type_ie(flags: &[&str]) -> PfcpResult<Ie> {
    let mut rec = Record::new(&REPORT_TYPE);
    for flag in flags {
        rec.set(flag, 1)?;
    }
    Ok(Ie::fields(IeType::ReportType.tag(), rec))
}

/// Grouped IE of the given type
pub fn grouped_ie(ie_type: IeType, ies: Group) -> Ie {
    Ie::grouped(ie_type.tag(), ies)
}

/// Vendor-specific IE; `tag` must carry the enterprise bit
pub fn vendor_ie(tag: u16, enterprise_id: u16, value: impl Into<Bytes>) -> PfcpResult<Ie> {
    if tag & PFCP_ENTERPRISE_BIT == 0 {
        return Err(PfcpError::InvalidIeType(tag));
    }
    Ok(Ie::raw(tag, value).with_enterprise(enterprise_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(ie: &Ie) -> Bytes {
        ie.value_bytes::<Pfcp>().unwrap()
    }

    #[test]
    fn test_ie_header() {
        let mut buf = BytesMut::new();
        recovery_time_stamp_ie(0xE1234567)
            .unwrap()
            .encode::<Pfcp>(&mut buf)
            .unwrap();
        assert_eq!(buf.as_ref(), &[0, 96, 0, 4, 0xE1, 0x23, 0x45, 0x67]);
    }

    #[test]
    fn test_f_teid_presence() {
        let ie = f_teid_ipv4_ie(0x11223344, [10, 0, 0, 1]).unwrap();
        assert_eq!(value(&ie).as_ref(), &[0x01, 0x11, 0x22, 0x33, 0x44, 10, 0, 0, 1]);

        // CH suppresses TEID and address
        let ie = f_teid_choose_ie(Some(5)).unwrap();
        assert_eq!(value(&ie).as_ref(), &[0x0D, 5]);
        let ie = f_teid_choose_ie(None).unwrap();
        assert_eq!(value(&ie).as_ref(), &[0x05]);
    }

    #[test]
    fn test_outer_header_creation() {
        let ie = outer_header_creation_gtpu_ipv4_ie(1, [192, 168, 1, 1]).unwrap();
        assert_eq!(
            value(&ie).as_ref(),
            &[0x01, 0x00, 0, 0, 0, 1, 192, 168, 1, 1]
        );

        let mut rec = Record::with(&OUTER_HEADER_CREATION, &[("description", OHC_UDP_IPV4)]).unwrap();
        rec.set_bytes("ipv4_address", vec![10, 0, 0, 1]).unwrap();
        rec.set("port_number", 2152).unwrap();
        assert!(!rec.is_present("teid"));
        assert_eq!(rec.size(), 2 + 4 + 2);
    }

    #[test]
    fn test_f_seid() {
        let ie = f_seid_ipv4_ie(0x0102030405060708, [10, 0, 0, 9]).unwrap();
        assert_eq!(
            value(&ie).as_ref(),
            &[0x02, 1, 2, 3, 4, 5, 6, 7, 8, 10, 0, 0, 9]
        );
    }

    #[test]
    fn test_enterprise_ie() {
        let ie = vendor_ie(0x8001, 18681, vec![0xAA, 0xBB]).unwrap();
        let mut buf = BytesMut::new();
        ie.encode::<Pfcp>(&mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x80, 0x01, 0, 4, 0x48, 0xF9, 0xAA, 0xBB]);

        assert_eq!(
            vendor_ie(0x0001, 18681, vec![]),
            Err(PfcpError::InvalidIeType(1))
        );
        let missing = Ie::raw(0x8001, vec![0xAA]);
        assert!(missing.encode::<Pfcp>(&mut BytesMut::new()).is_err());
    }

    #[test]
    fn test_instance_rejected() {
        let ie = pdr_id_ie(1).unwrap().with_instance(1);
        assert!(matches!(
            ie.encode::<Pfcp>(&mut BytesMut::new()),
            Err(CodecError::EncodingError(_))
        ));
    }

    #[test]
    fn test_report_type_flags() {
        let ie = report_type_ie(&["dldr", "usar"]).unwrap();
        assert_eq!(value(&ie).as_ref(), &[0x03]);
        assert!(report_type_ie(&["bogus"]).is_err());
    }
}

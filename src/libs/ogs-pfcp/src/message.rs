//! PFCP Messages
//!
//! Node and session message tables (3GPP TS 29.244 section 7). Rule IEs
//! such as Create PDR repeat freely, so every body is checked by key.

use std::sync::OnceLock;

use bytes::Bytes;
use ogs_tlv::{
    CodecConfig, Entry, FaultCode, GroupSpec, Layout, Message, MessageSpec, PayloadDef, Protocol,
    Registry, RegistryError,
};

use crate::error::{PfcpError, PfcpResult};
use crate::header::*;
use crate::ie::*;

pub static HEARTBEAT_REQUEST: MessageSpec = MessageSpec::new(
    1,
    GroupSpec::keyed(
        "Heartbeat Request",
        &[Entry::new(96, 0, "Recovery Time Stamp")],
        &[Entry::new(192, 0, "Source IP Address")],
    ),
);

pub static HEARTBEAT_RESPONSE: MessageSpec = MessageSpec::new(
    2,
    GroupSpec::keyed(
        "Heartbeat Response",
        &[Entry::new(96, 0, "Recovery Time Stamp")],
        &[],
    ),
);

pub static ASSOCIATION_SETUP_REQUEST: MessageSpec = MessageSpec::new(
    5,
    GroupSpec::keyed(
        "Association Setup Request",
        &[
            Entry::new(60, 0, "Node ID"),
            Entry::new(96, 0, "Recovery Time Stamp"),
        ],
        &[
            Entry::new(43, 0, "UP Function Features"),
            Entry::new(89, 0, "CP Function Features"),
        ],
    ),
);

pub static ASSOCIATION_SETUP_RESPONSE: MessageSpec = MessageSpec::new(
    6,
    GroupSpec::keyed(
        "Association Setup Response",
        &[
            Entry::new(60, 0, "Node ID"),
            Entry::new(19, 0, "Cause"),
            Entry::new(96, 0, "Recovery Time Stamp"),
        ],
        &[
            Entry::new(43, 0, "UP Function Features"),
            Entry::new(89, 0, "CP Function Features"),
        ],
    ),
);

pub static ASSOCIATION_RELEASE_REQUEST: MessageSpec = MessageSpec::new(
    9,
    GroupSpec::keyed(
        "Association Release Request",
        &[Entry::new(60, 0, "Node ID")],
        &[],
    ),
);

pub static ASSOCIATION_RELEASE_RESPONSE: MessageSpec = MessageSpec::new(
    10,
    GroupSpec::keyed(
        "Association Release Response",
        &[Entry::new(60, 0, "Node ID"), Entry::new(19, 0, "Cause")],
        &[],
    ),
);

pub static VERSION_NOT_SUPPORTED_RESPONSE: MessageSpec = MessageSpec::new(
    11,
    GroupSpec::keyed("Version Not Supported Response", &[], &[]),
);

pub static SESSION_ESTABLISHMENT_REQUEST: MessageSpec = MessageSpec::new(
    50,
    GroupSpec::keyed(
        "Session Establishment Request",
        &[
            Entry::new(60, 0, "Node ID"),
            Entry::new(57, 0, "CP F-SEID"),
            Entry::new(1, 0, "Create PDR"),
            Entry::new(3, 0, "Create FAR"),
        ],
        &[
            Entry::new(6, 0, "Create URR"),
            Entry::new(7, 0, "Create QER"),
            Entry::new(113, 0, "PDN Type"),
            Entry::new(117, 0, "User Plane Inactivity Timer"),
        ],
    ),
);

pub static SESSION_ESTABLISHMENT_RESPONSE: MessageSpec = MessageSpec::new(
    51,
    GroupSpec::keyed(
        "Session Establishment Response",
        &[Entry::new(60, 0, "Node ID"), Entry::new(19, 0, "Cause")],
        &[
            Entry::new(40, 0, "Offending IE"),
            Entry::new(57, 0, "UP F-SEID"),
            Entry::new(8, 0, "Created PDR"),
            Entry::new(114, 0, "Failed Rule ID"),
        ],
    ),
);

pub static SESSION_MODIFICATION_REQUEST: MessageSpec = MessageSpec::new(
    52,
    GroupSpec::keyed(
        "Session Modification Request",
        &[],
        &[
            Entry::new(57, 0, "CP F-SEID"),
            Entry::new(15, 0, "Remove PDR"),
            Entry::new(16, 0, "Remove FAR"),
            Entry::new(17, 0, "Remove URR"),
            Entry::new(18, 0, "Remove QER"),
            Entry::new(1, 0, "Create PDR"),
            Entry::new(3, 0, "Create FAR"),
            Entry::new(6, 0, "Create URR"),
            Entry::new(7, 0, "Create QER"),
            Entry::new(9, 0, "Update PDR"),
            Entry::new(10, 0, "Update FAR"),
            Entry::new(49, 0, "PFCPSMReq-Flags"),
            Entry::new(117, 0, "User Plane Inactivity Timer"),
        ],
    ),
);

pub static SESSION_MODIFICATION_RESPONSE: MessageSpec = MessageSpec::new(
    53,
    GroupSpec::keyed(
        "Session Modification Response",
        &[Entry::new(19, 0, "Cause")],
        &[
            Entry::new(40, 0, "Offending IE"),
            Entry::new(8, 0, "Created PDR"),
            Entry::new(114, 0, "Failed Rule ID"),
        ],
    ),
);

pub static SESSION_DELETION_REQUEST: MessageSpec = MessageSpec::new(
    54,
    GroupSpec::keyed("Session Deletion Request", &[], &[]),
);

pub static SESSION_DELETION_RESPONSE: MessageSpec = MessageSpec::new(
    55,
    GroupSpec::keyed(
        "Session Deletion Response",
        &[Entry::new(19, 0, "Cause")],
        &[Entry::new(40, 0, "Offending IE")],
    ),
);

pub static SESSION_REPORT_REQUEST: MessageSpec = MessageSpec::new(
    56,
    GroupSpec::keyed(
        "Session Report Request",
        &[Entry::new(39, 0, "Report Type")],
        &[
            Entry::new(83, 0, "Downlink Data Report"),
            Entry::new(80, 0, "Usage Report"),
        ],
    ),
);

pub static SESSION_REPORT_RESPONSE: MessageSpec = MessageSpec::new(
    57,
    GroupSpec::keyed(
        "Session Report Response",
        &[Entry::new(19, 0, "Cause")],
        &[Entry::new(40, 0, "Offending IE")],
    ),
);

/// Build the PFCP registry from the static tables.
pub fn build_registry() -> Result<Registry, RegistryError> {
    let fields = PayloadDef::Fields;
    let grouped = PayloadDef::Grouped;
    Registry::builder("PFCP")
        .header(&PFCP_HEADER)
        .ie(IeType::CreatePdr.tag(), grouped(&CREATE_PDR))
        .ie(IeType::Pdi.tag(), grouped(&PDI))
        .ie(IeType::CreateFar.tag(), grouped(&CREATE_FAR))
        .ie(
            IeType::ForwardingParameters.tag(),
            grouped(&FORWARDING_PARAMETERS),
        )
        .ie(IeType::CreateUrr.tag(), grouped(&CREATE_URR))
        .ie(IeType::CreateQer.tag(), grouped(&CREATE_QER))
        .ie(IeType::CreatedPdr.tag(), grouped(&CREATED_PDR))
        .ie(IeType::UpdatePdr.tag(), grouped(&UPDATE_PDR))
        .ie(IeType::UpdateFar.tag(), grouped(&UPDATE_FAR))
        .ie(
            IeType::UpdateForwardingParameters.tag(),
            grouped(&UPDATE_FORWARDING_PARAMETERS),
        )
        .ie(IeType::RemovePdr.tag(), grouped(&REMOVE_PDR))
        .ie(IeType::RemoveFar.tag(), grouped(&REMOVE_FAR))
        .ie(IeType::RemoveUrr.tag(), grouped(&REMOVE_URR))
        .ie(IeType::RemoveQer.tag(), grouped(&REMOVE_QER))
        .ie(IeType::Cause.tag(), fields(&CAUSE))
        .ie(IeType::SourceInterface.tag(), fields(&SOURCE_INTERFACE))
        .ie(IeType::FTeid.tag(), fields(&F_TEID))
        .ie(IeType::NetworkInstance.tag(), fields(&NETWORK_INSTANCE))
        .ie(IeType::GateStatus.tag(), fields(&GATE_STATUS))
        .ie(IeType::Mbr.tag(), fields(&BIT_RATE))
        .ie(IeType::Gbr.tag(), fields(&BIT_RATE))
        .ie(IeType::Precedence.tag(), fields(&PRECEDENCE))
        .ie(IeType::ReportingTriggers.tag(), fields(&TRIGGERS))
        .ie(IeType::ReportType.tag(), fields(&REPORT_TYPE))
        .ie(IeType::OffendingIe.tag(), fields(&OFFENDING_IE))
        .ie(
            IeType::DestinationInterface.tag(),
            fields(&DESTINATION_INTERFACE),
        )
        .ie(IeType::UpFunctionFeatures.tag(), fields(&FEATURES))
        .ie(IeType::ApplyAction.tag(), fields(&APPLY_ACTION))
        .ie(IeType::PfcpSmreqFlags.tag(), fields(&SMREQ_FLAGS))
        .ie(IeType::PdrId.tag(), fields(&PDR_ID))
        .ie(IeType::FSeid.tag(), fields(&F_SEID))
        .ie(IeType::NodeId.tag(), fields(&NODE_ID))
        .ie(IeType::MeasurementMethod.tag(), fields(&MEASUREMENT_METHOD))
        .ie(IeType::UsageReportTrigger.tag(), fields(&TRIGGERS))
        .ie(IeType::VolumeThreshold.tag(), fields(&VOLUME))
        .ie(IeType::VolumeMeasurement.tag(), fields(&VOLUME))
        .ie(IeType::UsageReportSrr.tag(), grouped(&USAGE_REPORT_SRR))
        .ie(IeType::UrrId.tag(), fields(&URR_ID))
        .ie(
            IeType::DownlinkDataReport.tag(),
            grouped(&DOWNLINK_DATA_REPORT),
        )
        .ie(
            IeType::OuterHeaderCreation.tag(),
            fields(&OUTER_HEADER_CREATION),
        )
        .ie(IeType::BarId.tag(), fields(&BAR_ID))
        .ie(IeType::CpFunctionFeatures.tag(), fields(&FEATURES))
        .ie(IeType::UeIpAddress.tag(), fields(&UE_IP_ADDRESS))
        .ie(
            IeType::OuterHeaderRemoval.tag(),
            fields(&OUTER_HEADER_REMOVAL),
        )
        .ie(IeType::RecoveryTimeStamp.tag(), fields(&RECOVERY_TIME_STAMP))
        .ie(IeType::UrSeqn.tag(), fields(&UR_SEQN))
        .ie(IeType::FarId.tag(), fields(&FAR_ID))
        .ie(IeType::QerId.tag(), fields(&QER_ID))
        .ie(IeType::PdnType.tag(), fields(&PDN_TYPE))
        .ie(IeType::FailedRuleId.tag(), fields(&FAILED_RULE_ID))
        .ie(
            IeType::UserPlaneInactivityTimer.tag(),
            fields(&TIMER_VALUE),
        )
        .ie(IeType::Qfi.tag(), fields(&QFI))
        .message(&HEARTBEAT_REQUEST)
        .message(&HEARTBEAT_RESPONSE)
        .message(&ASSOCIATION_SETUP_REQUEST)
        .message(&ASSOCIATION_SETUP_RESPONSE)
        .message(&ASSOCIATION_RELEASE_REQUEST)
        .message(&ASSOCIATION_RELEASE_RESPONSE)
        .message(&VERSION_NOT_SUPPORTED_RESPONSE)
        .message(&SESSION_ESTABLISHMENT_REQUEST)
        .message(&SESSION_ESTABLISHMENT_RESPONSE)
        .message(&SESSION_MODIFICATION_REQUEST)
        .message(&SESSION_MODIFICATION_RESPONSE)
        .message(&SESSION_DELETION_REQUEST)
        .message(&SESSION_DELETION_RESPONSE)
        .message(&SESSION_REPORT_REQUEST)
        .message(&SESSION_REPORT_RESPONSE)
        .build()
}

/// The PFCP registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| match build_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("invalid PFCP tables: {e}"),
    })
}

impl Protocol for Pfcp {
    const NAME: &'static str = "PFCP";
    const MIN_HEADER_LEN: usize = PFCP_HEADER_LEN;
    const TYPE_OFFSET: usize = PFCP_TYPE_OFFSET;

    fn header_layout() -> &'static Layout {
        &PFCP_HEADER
    }

    fn registry() -> &'static Registry {
        registry()
    }
}

/// Decode a PFCP message.
pub fn decode_message(buf: &[u8]) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message::<Pfcp>(buf)
}

pub fn decode_message_with(buf: &[u8], config: &CodecConfig) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message_with::<Pfcp>(buf, config)
}

pub fn encode_message(msg: &Message) -> PfcpResult<Bytes> {
    Ok(ogs_tlv::encode_message::<Pfcp>(msg)?)
}

/// Empty message. Session messages need a SEID and node messages must
/// not carry one.
pub fn new_message(
    message_type: PfcpMessageType,
    seid: Option<u64>,
    sequence_number: u32,
) -> PfcpResult<Message> {
    if message_type.has_seid() != seid.is_some() {
        log::debug!("{}: SEID {:?} rejected", message_type.name(), seid);
        return Err(PfcpError::EncodingError(format!(
            "{} {} a SEID",
            message_type.name(),
            if message_type.has_seid() {
                "requires"
            } else {
                "does not take"
            }
        )));
    }
    let code = message_type as u8;
    let spec = registry()
        .message(code)
        .ok_or(PfcpError::InvalidMessageType(code))?;
    let mut msg = Message::new::<Pfcp>(spec)?;
    if let Some(seid) = seid {
        msg.header.set("s", 1)?;
        msg.header.set("seid", seid)?;
    }
    msg.header.set("sequence_number", sequence_number as u64)?;
    Ok(msg)
}

pub fn heartbeat_request(sequence_number: u32, recovery_time_stamp: u32) -> PfcpResult<Message> {
    let mut msg = new_message(PfcpMessageType::HeartbeatRequest, None, sequence_number)?;
    msg.body.push(recovery_time_stamp_ie(recovery_time_stamp)?);
    Ok(msg)
}

pub fn heartbeat_response(sequence_number: u32, recovery_time_stamp: u32) -> PfcpResult<Message> {
    let mut msg = new_message(PfcpMessageType::HeartbeatResponse, None, sequence_number)?;
    msg.body.push(recovery_time_stamp_ie(recovery_time_stamp)?);
    Ok(msg)
}

/// Cause value of a message, if present and well formed
pub fn cause(msg: &Message) -> Option<u8> {
    msg.body
        .get(IeType::Cause.tag(), 0)
        .and_then(|ie| ie.record())
        .and_then(|r| r.get("cause"))
        .map(|c| c as u8)
}

/// SEID of a session message header
pub fn seid(msg: &Message) -> Option<u64> {
    msg.header.get("seid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use ogs_tlv::{DecodeMode, Group, Ie, IeKey};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn create_pdr(with_pdi: bool) -> Ie {
        let mut pdr = Group::new()
            .with(pdr_id_ie(1).unwrap())
            .with(precedence_ie(255).unwrap());
        if with_pdi {
            let pdi = Group::new()
                .with(source_interface_ie(SourceInterface::Access).unwrap())
                .with(f_teid_choose_ie(Some(5)).unwrap())
                .with(network_instance_ie(&b"internet"[..]).unwrap())
                .with(ue_ip_address_ipv4_ie([10, 45, 0, 2], true).unwrap());
            pdr.push(grouped_ie(IeType::Pdi, pdi));
        }
        pdr.push(
            outer_header_removal_ie(OuterHeaderRemovalDescription::GtpUUdpIpv4).unwrap(),
        );
        pdr.push(far_id_ie(1).unwrap());
        grouped_ie(IeType::CreatePdr, pdr)
    }

    fn create_far() -> Ie {
        let params = Group::new()
            .with(destination_interface_ie(DestinationInterface::Core).unwrap())
            .with(network_instance_ie(&b"internet"[..]).unwrap());
        let far = Group::new()
            .with(far_id_ie(1).unwrap())
            .with(apply_action_ie(APPLY_ACTION_FORW).unwrap())
            .with(grouped_ie(IeType::ForwardingParameters, params));
        grouped_ie(IeType::CreateFar, far)
    }

    fn session_establishment(with_pdi: bool) -> Message {
        let mut msg =
            new_message(PfcpMessageType::SessionEstablishmentRequest, Some(0), 7).unwrap();
        msg.body.push(node_id_ipv4_ie([10, 0, 0, 1]).unwrap());
        msg.body.push(f_seid_ipv4_ie(0x1111, [10, 0, 0, 1]).unwrap());
        msg.body.push(create_pdr(with_pdi));
        msg.body.push(create_far());
        msg
    }

    #[test]
    fn test_registry_builds() {
        let registry = build_registry().unwrap();
        assert_eq!(registry.message_count(), 15);
        assert!(registry.message(3).is_none());
    }

    #[test]
    fn test_heartbeat_request_encoding() {
        let msg = heartbeat_request(1, 0x12345678).unwrap();
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0x20, 1, 0, 12, 0, 0, 1, 0, 0, 96, 0, 4, 0x12, 0x34, 0x56, 0x78]
        );
        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.name(), "Heartbeat Request");
        assert_eq!(seid(&decoded), None);
    }

    #[test]
    fn test_heartbeat_without_recovery_time_stamp() {
        init();
        let buf = [0x20, 1, 0, 4, 0, 0, 1, 0];
        let (msg, fault) = decode_message(&buf);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.missing.len(), 1);
        assert_eq!(msg.missing[0].key, IeKey::new(96, 0));
        assert_eq!(msg.missing[0].name, "Recovery Time Stamp");
    }

    #[test]
    fn test_unknown_ie_kept_raw() {
        let mut msg = heartbeat_request(2, 1).unwrap();
        msg.body.push(Ie::raw(0x0888, vec![0xDE, 0xAD]));
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(&bytes[16..], &[0x08, 0x88, 0, 2, 0xDE, 0xAD]);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        let ie = decoded.body.get(0x0888, 0).unwrap();
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[0xDE, 0xAD]);
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_enterprise_ie_decoded() {
        let mut msg = heartbeat_response(3, 1).unwrap();
        msg.body.push(vendor_ie(0x8001, 18681, vec![1, 2, 3]).unwrap());
        let bytes = encode_message(&msg).unwrap();

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        let ie = decoded.body.get(0x8001, 0).unwrap();
        assert_eq!(ie.enterprise, Some(18681));
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_session_establishment_round_trip() {
        init();
        let bytes = encode_message(&session_establishment(true)).unwrap();
        assert_eq!(bytes[0], 0x21);
        let declared = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
        assert_eq!(declared, bytes.len() - 4);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(seid(&decoded), Some(0));
        assert_eq!(decoded.header.get("sequence_number"), Some(7));

        let pdr = decoded.body.get(1, 0).unwrap().group().unwrap();
        let pdi = pdr.get(2, 0).unwrap().group().unwrap();
        let f_teid = pdi.get(21, 0).unwrap().record().unwrap();
        assert_eq!(f_teid.get("choose_id"), Some(5));
        assert!(!f_teid.is_present("teid"));
        let ue_ip = pdi.get(93, 0).unwrap().record().unwrap();
        assert_eq!(ue_ip.get("sd"), Some(1));
        assert_eq!(ue_ip.get_bytes("ipv4_address").unwrap().as_ref(), &[10, 45, 0, 2]);

        let far = decoded.body.get(3, 0).unwrap().group().unwrap();
        let params = far.get(4, 0).unwrap().group().unwrap();
        let dest = params.get(42, 0).unwrap().record().unwrap();
        assert_eq!(dest.get("interface"), Some(DestinationInterface::Core as u64));
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_repeated_rules() {
        let mut msg = session_establishment(true);
        msg.body.push(create_pdr(true));
        let (decoded, fault) = decode_message(&encode_message(&msg).unwrap());
        assert_eq!(fault, FaultCode::Ok);
        assert_eq!(decoded.unwrap().body.get_all(1).count(), 2);
    }

    #[test]
    fn test_create_pdr_missing_pdi() {
        let bytes = encode_message(&session_establishment(false)).unwrap();

        let strict = Message::decode::<Pfcp>(
            &SESSION_ESTABLISHMENT_REQUEST,
            &bytes,
            DecodeMode::Strict,
        );
        assert!(matches!(
            strict,
            Err(ogs_tlv::CodecError::MandatoryIeMissing(_))
        ));

        let (msg, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.missing[0].container, "Create PDR");
        assert_eq!(msg.missing[0].name, "PDI");
    }

    #[test]
    fn test_out_of_range_node_id_kept_raw() {
        let mut msg = new_message(PfcpMessageType::AssociationSetupRequest, None, 4).unwrap();
        msg.body.push(Ie::raw(60, vec![0x07, 10, 0, 0, 1]));
        msg.body.push(recovery_time_stamp_ie(9).unwrap());
        let bytes = encode_message(&msg).unwrap();

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert!(decoded.body.get(60, 0).unwrap().is_raw());
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_association_setup_response_cause() {
        let mut msg = new_message(PfcpMessageType::AssociationSetupResponse, None, 4).unwrap();
        msg.body.push(node_id_fqdn_ie(&b"\x03upf\x04test"[..]).unwrap());
        msg.body.push(cause_ie(PfcpCause::RequestAccepted).unwrap());
        msg.body.push(recovery_time_stamp_ie(9).unwrap());
        let (decoded, fault) = decode_message(&encode_message(&msg).unwrap());
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(cause(&decoded), Some(1));
        let node_id = decoded.body.get(60, 0).unwrap().record().unwrap();
        assert_eq!(node_id.get("node_id_type"), Some(NodeIdType::Fqdn as u64));
    }

    #[test]
    fn test_version_not_supported_response() {
        let msg = new_message(PfcpMessageType::VersionNotSupportedResponse, None, 1).unwrap();
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(bytes.as_ref(), &[0x20, 11, 0, 4, 0, 0, 1, 0]);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.name(), "Version Not Supported Response");
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn test_seid_presence_enforced() {
        assert!(matches!(
            new_message(PfcpMessageType::SessionEstablishmentRequest, None, 1),
            Err(PfcpError::EncodingError(_))
        ));
        assert!(matches!(
            new_message(PfcpMessageType::HeartbeatRequest, Some(1), 1),
            Err(PfcpError::EncodingError(_))
        ));
        assert_eq!(
            new_message(PfcpMessageType::PfdManagementRequest, None, 1).unwrap_err(),
            PfcpError::InvalidMessageType(3)
        );
    }

    #[test]
    fn test_message_priority() {
        let mut msg = new_message(PfcpMessageType::SessionDeletionRequest, Some(0xAB), 5).unwrap();
        msg.header.set("mp", 1).unwrap();
        msg.header.set("message_priority", 2).unwrap();
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(bytes.len(), PFCP_HEADER_LEN_WITH_SEID);
        assert_eq!(bytes[0], 0x23);
        assert_eq!(bytes[15], 0x20);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.header.get("message_priority"), Some(2));
        assert_eq!(seid(&decoded), Some(0xAB));
    }

    #[test]
    fn test_unknown_message_type() {
        let buf = [0x20, 99, 0, 4, 0, 0, 1, 0];
        assert_eq!(decode_message(&buf), (None, FaultCode::TypeNotFound));
    }
}

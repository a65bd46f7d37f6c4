//! GTPv1 Messages
//!
//! GTPv1-C message tables (3GPP TS 29.060 section 7). Every message lists
//! its IEs in ascending type order, so bodies are checked slot by slot.
//! Update PDP Context Request has two IE tables, depending on whether the
//! SGSN or the GGSN initiated the procedure; the GGSN-initiated table is
//! the alternate. Both Update PDP Context Responses mandate only Cause, so
//! they share one table.

use std::sync::OnceLock;

use bytes::Bytes;
use ogs_tlv::{
    CodecConfig, FaultCode, GroupSpec, Layout, Message, MessageSpec, PayloadDef, Protocol, Record,
    Registry, RegistryError, Slot,
};

use super::header::*;
use super::ie::*;
use crate::error::{GtpError, GtpResult};

pub static ECHO_REQUEST: MessageSpec = MessageSpec::new(
    1,
    GroupSpec::ordered("Echo Request", &[Slot::optional(255, "Private Extension")]),
);

pub static ECHO_RESPONSE: MessageSpec = MessageSpec::new(
    2,
    GroupSpec::ordered(
        "Echo Response",
        &[
            Slot::mandatory(14, "Recovery"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static VERSION_NOT_SUPPORTED: MessageSpec =
    MessageSpec::new(3, GroupSpec::ordered("Version Not Supported", &[]));

pub static CREATE_PDP_CONTEXT_REQUEST: MessageSpec = MessageSpec::new(
    16,
    GroupSpec::ordered(
        "Create PDP Context Request",
        &[
            Slot::optional(2, "IMSI"),
            Slot::optional(3, "Routing Area Identity"),
            Slot::optional(14, "Recovery"),
            Slot::optional(15, "Selection Mode"),
            Slot::mandatory(16, "Tunnel Endpoint Identifier Data I"),
            Slot::optional(17, "Tunnel Endpoint Identifier Control Plane"),
            Slot::mandatory(20, "NSAPI"),
            Slot::optional(20, "Linked NSAPI"),
            Slot::optional(26, "Charging Characteristics"),
            Slot::optional(27, "Trace Reference"),
            Slot::optional(28, "Trace Type"),
            Slot::optional(128, "End User Address"),
            Slot::optional(131, "Access Point Name"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::mandatory(133, "SGSN Address for signalling"),
            Slot::mandatory(133, "SGSN Address for user traffic"),
            Slot::optional(134, "MSISDN"),
            Slot::mandatory(135, "Quality of Service Profile"),
            Slot::optional(137, "TFT"),
            Slot::optional(142, "Trigger Id"),
            Slot::optional(143, "OMC Identity"),
            Slot::optional(148, "Common Flags"),
            Slot::optional(149, "APN Restriction"),
            Slot::optional(151, "RAT Type"),
            Slot::optional(152, "User Location Information"),
            Slot::optional(153, "MS Time Zone"),
            Slot::optional(154, "IMEI(SV)"),
            Slot::optional(191, "Evolved Allocation/Retention Priority I"),
            Slot::optional(198, "APN-AMBR"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static CREATE_PDP_CONTEXT_RESPONSE: MessageSpec = MessageSpec::new(
    17,
    GroupSpec::ordered(
        "Create PDP Context Response",
        &[
            Slot::mandatory(1, "Cause"),
            Slot::optional(8, "Reordering Required"),
            Slot::optional(14, "Recovery"),
            Slot::optional(16, "Tunnel Endpoint Identifier Data I"),
            Slot::optional(17, "Tunnel Endpoint Identifier Control Plane"),
            Slot::optional(20, "NSAPI"),
            Slot::optional(127, "Charging ID"),
            Slot::optional(128, "End User Address"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(133, "GGSN Address for Control Plane"),
            Slot::optional(133, "GGSN Address for user traffic"),
            Slot::optional(133, "Alternative GGSN Address for Control Plane"),
            Slot::optional(133, "Alternative GGSN Address for user traffic"),
            Slot::optional(135, "Quality of Service Profile"),
            Slot::optional(148, "Common Flags"),
            Slot::optional(149, "APN Restriction"),
            Slot::optional(181, "MS Info Change Reporting Action"),
            Slot::optional(184, "Bearer Control Mode"),
            Slot::optional(191, "Evolved Allocation/Retention Priority I"),
            Slot::optional(198, "APN-AMBR"),
            Slot::optional(251, "Charging Gateway Address"),
            Slot::optional(251, "Alternative Charging Gateway Address"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

/// Update PDP Context Request sent by an SGSN
pub static UPDATE_PDP_CONTEXT_REQUEST: MessageSpec = MessageSpec::new(
    18,
    GroupSpec::ordered(
        "Update PDP Context Request",
        &[
            Slot::optional(2, "IMSI"),
            Slot::optional(3, "Routing Area Identity"),
            Slot::optional(14, "Recovery"),
            Slot::mandatory(16, "Tunnel Endpoint Identifier Data I"),
            Slot::optional(17, "Tunnel Endpoint Identifier Control Plane"),
            Slot::mandatory(20, "NSAPI"),
            Slot::optional(27, "Trace Reference"),
            Slot::optional(28, "Trace Type"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::mandatory(133, "SGSN Address for Control Plane"),
            Slot::mandatory(133, "SGSN Address for User Traffic"),
            Slot::optional(133, "Alternative SGSN Address for Control Plane"),
            Slot::optional(133, "Alternative SGSN Address for User Traffic"),
            Slot::mandatory(135, "Quality of Service Profile"),
            Slot::optional(137, "TFT"),
            Slot::optional(142, "Trigger Id"),
            Slot::optional(143, "OMC Identity"),
            Slot::optional(148, "Common Flags"),
            Slot::optional(151, "RAT Type"),
            Slot::optional(152, "User Location Information"),
            Slot::optional(153, "MS Time Zone"),
            Slot::optional(182, "Direct Tunnel Flags"),
            Slot::optional(191, "Evolved Allocation/Retention Priority I"),
            Slot::optional(193, "Extended Common Flags"),
            Slot::optional(198, "APN-AMBR"),
            Slot::optional(214, "ULI Timestamp"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

/// Update PDP Context Request sent by a GGSN
pub static UPDATE_PDP_CONTEXT_REQUEST_GGSN: MessageSpec = MessageSpec::new(
    18,
    GroupSpec::ordered(
        "Update PDP Context Request (GGSN-initiated)",
        &[
            Slot::optional(2, "IMSI"),
            Slot::optional(14, "Recovery"),
            Slot::mandatory(20, "NSAPI"),
            Slot::optional(128, "End User Address"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(135, "Quality of Service Profile"),
            Slot::optional(137, "TFT"),
            Slot::optional(148, "Common Flags"),
            Slot::optional(149, "APN Restriction"),
            Slot::optional(181, "MS Info Change Reporting Action"),
            Slot::optional(182, "Direct Tunnel Flags"),
            Slot::optional(184, "Bearer Control Mode"),
            Slot::optional(191, "Evolved Allocation/Retention Priority I"),
            Slot::optional(198, "APN-AMBR"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

/// Update PDP Context Response, sent by the GGSN or by the SGSN
/// answering a GGSN-initiated request
pub static UPDATE_PDP_CONTEXT_RESPONSE: MessageSpec = MessageSpec::new(
    19,
    GroupSpec::ordered(
        "Update PDP Context Response",
        &[
            Slot::mandatory(1, "Cause"),
            Slot::optional(14, "Recovery"),
            Slot::optional(16, "Tunnel Endpoint Identifier Data I"),
            Slot::optional(17, "Tunnel Endpoint Identifier Control Plane"),
            Slot::optional(127, "Charging ID"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(133, "Address for Control Plane"),
            Slot::optional(133, "Address for User Traffic"),
            Slot::optional(133, "Alternative Address for Control Plane"),
            Slot::optional(133, "Alternative Address for User Traffic"),
            Slot::optional(135, "Quality of Service Profile"),
            Slot::optional(148, "Common Flags"),
            Slot::optional(149, "APN Restriction"),
            Slot::optional(152, "User Location Information"),
            Slot::optional(153, "MS Time Zone"),
            Slot::optional(181, "MS Info Change Reporting Action"),
            Slot::optional(182, "Direct Tunnel Flags"),
            Slot::optional(184, "Bearer Control Mode"),
            Slot::optional(191, "Evolved Allocation/Retention Priority I"),
            Slot::optional(198, "APN-AMBR"),
            Slot::optional(251, "Charging Gateway Address"),
            Slot::optional(251, "Alternative Charging Gateway Address"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static DELETE_PDP_CONTEXT_REQUEST: MessageSpec = MessageSpec::new(
    20,
    GroupSpec::ordered(
        "Delete PDP Context Request",
        &[
            Slot::optional(1, "Cause"),
            Slot::optional(19, "Teardown Ind"),
            Slot::mandatory(20, "NSAPI"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(152, "User Location Information"),
            Slot::optional(153, "MS Time Zone"),
            Slot::optional(193, "Extended Common Flags"),
            Slot::optional(214, "ULI Timestamp"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static DELETE_PDP_CONTEXT_RESPONSE: MessageSpec = MessageSpec::new(
    21,
    GroupSpec::ordered(
        "Delete PDP Context Response",
        &[
            Slot::mandatory(1, "Cause"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(152, "User Location Information"),
            Slot::optional(153, "MS Time Zone"),
            Slot::optional(214, "ULI Timestamp"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static ERROR_INDICATION: MessageSpec = MessageSpec::new(
    26,
    GroupSpec::ordered(
        "Error Indication",
        &[
            Slot::mandatory(16, "Tunnel Endpoint Identifier Data I"),
            Slot::mandatory(133, "GTP-U Peer Address"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static SUPPORTED_EXTENSION_HEADERS_NOTIFICATION: MessageSpec = MessageSpec::new(
    31,
    GroupSpec::ordered(
        "Supported Extension Headers Notification",
        &[Slot::mandatory(141, "Extension Header Type List")],
    ),
);

/// Build the GTPv1-C registry from the static tables.
pub fn build_registry() -> Result<Registry, RegistryError> {
    let fields = PayloadDef::Fields;
    Registry::builder("GTPv1-C")
        .header(&GTP1_HEADER)
        .ie(Gtp1IeType::Cause.tag(), fields(&CAUSE))
        .ie(Gtp1IeType::Imsi.tag(), fields(&IMSI))
        .ie(Gtp1IeType::Rai.tag(), fields(&RAI))
        .ie(Gtp1IeType::ReorderingRequired.tag(), fields(&REORDERING_REQUIRED))
        .ie(Gtp1IeType::Recovery.tag(), fields(&RECOVERY))
        .ie(Gtp1IeType::SelectionMode.tag(), fields(&SELECTION_MODE))
        .ie(Gtp1IeType::TeidDataI.tag(), fields(&TEID))
        .ie(Gtp1IeType::TeidControlPlane.tag(), fields(&TEID))
        .ie(Gtp1IeType::TeidDataII.tag(), fields(&TEID_DATA_II))
        .ie(Gtp1IeType::TeardownInd.tag(), fields(&TEARDOWN_IND))
        .ie(Gtp1IeType::Nsapi.tag(), fields(&NSAPI))
        .ie(
            Gtp1IeType::ChargingCharacteristics.tag(),
            fields(&CHARGING_CHARACTERISTICS),
        )
        .ie(Gtp1IeType::TraceReference.tag(), fields(&TRACE_REFERENCE))
        .ie(Gtp1IeType::TraceType.tag(), fields(&TRACE_TYPE))
        .ie(Gtp1IeType::ChargingId.tag(), fields(&CHARGING_ID))
        .ie(Gtp1IeType::EndUserAddress.tag(), fields(&END_USER_ADDRESS))
        .ie(Gtp1IeType::AccessPointName.tag(), fields(&ACCESS_POINT_NAME))
        .ie(Gtp1IeType::GsnAddress.tag(), fields(&GSN_ADDRESS))
        .ie(Gtp1IeType::Msisdn.tag(), fields(&MSISDN))
        .ie(Gtp1IeType::QualityOfServiceProfile.tag(), fields(&QOS_PROFILE))
        .ie(
            Gtp1IeType::ExtensionHeaderTypeList.tag(),
            fields(&EXTENSION_HEADER_TYPE_LIST),
        )
        .ie(Gtp1IeType::CommonFlags.tag(), fields(&COMMON_FLAGS))
        .ie(Gtp1IeType::ApnRestriction.tag(), fields(&APN_RESTRICTION))
        .ie(Gtp1IeType::RatType.tag(), fields(&RAT_TYPE))
        .ie(
            Gtp1IeType::UserLocationInformation.tag(),
            fields(&USER_LOCATION_INFORMATION),
        )
        .ie(Gtp1IeType::MsTimeZone.tag(), fields(&MS_TIME_ZONE))
        .ie(Gtp1IeType::ImeiSv.tag(), fields(&IMEI_SV))
        .ie(Gtp1IeType::DirectTunnelFlags.tag(), fields(&DIRECT_TUNNEL_FLAGS))
        .ie(Gtp1IeType::BearerControlMode.tag(), fields(&BEARER_CONTROL_MODE))
        .ie(
            Gtp1IeType::EvolvedAllocationRetentionPriorityI.tag(),
            fields(&EVOLVED_ARP_I),
        )
        .ie(Gtp1IeType::Ambr.tag(), fields(&AMBR))
        .ie(
            Gtp1IeType::ChargingGatewayAddress.tag(),
            fields(&CHARGING_GATEWAY_ADDRESS),
        )
        .ie(Gtp1IeType::PrivateExtension.tag(), fields(&PRIVATE_EXTENSION))
        .message(&ECHO_REQUEST)
        .message(&ECHO_RESPONSE)
        .message(&VERSION_NOT_SUPPORTED)
        .message(&CREATE_PDP_CONTEXT_REQUEST)
        .message(&CREATE_PDP_CONTEXT_RESPONSE)
        .message(&UPDATE_PDP_CONTEXT_REQUEST)
        .message(&UPDATE_PDP_CONTEXT_RESPONSE)
        .message(&DELETE_PDP_CONTEXT_REQUEST)
        .message(&DELETE_PDP_CONTEXT_RESPONSE)
        .message(&ERROR_INDICATION)
        .message(&SUPPORTED_EXTENSION_HEADERS_NOTIFICATION)
        .alternate(&UPDATE_PDP_CONTEXT_REQUEST_GGSN)
        .extension(
            ExtensionHeaderType::MbmsSupportIndication as u8,
            &MBMS_SUPPORT_INDICATION,
        )
        .extension(
            ExtensionHeaderType::MsInfoChangeReportingSupportIndication as u8,
            &MS_INFO_CHANGE_REPORTING_SUPPORT_INDICATION,
        )
        .extension(
            ExtensionHeaderType::ServiceClassIndicator as u8,
            &SERVICE_CLASS_INDICATOR,
        )
        .extension(ExtensionHeaderType::UdpPort as u8, &UDP_PORT)
        .extension(
            ExtensionHeaderType::LongPdcpPduNumber as u8,
            &LONG_PDCP_PDU_NUMBER,
        )
        .extension(ExtensionHeaderType::PdcpPduNumber as u8, &PDCP_PDU_NUMBER)
        .build()
}

/// The GTPv1-C registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| match build_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("invalid GTPv1-C tables: {e}"),
    })
}

impl Protocol for Gtp1 {
    const NAME: &'static str = "GTPv1-C";
    const MIN_HEADER_LEN: usize = GTPV1_HEADER_LEN;
    const TYPE_OFFSET: usize = GTP1_TYPE_OFFSET;

    fn header_layout() -> &'static Layout {
        &GTP1_HEADER
    }

    fn registry() -> &'static Registry {
        registry()
    }

    fn first_extension(header: &Record) -> Option<u8> {
        if header.get("e") != Some(1) {
            return None;
        }
        header.get("next_extension_type").map(|t| t as u8)
    }
}

/// Decode a GTPv1-C message.
pub fn decode_message(buf: &[u8]) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message::<Gtp1>(buf)
}

pub fn decode_message_with(buf: &[u8], config: &CodecConfig) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message_with::<Gtp1>(buf, config)
}

/// Encode a GTPv1-C message. Extension headers are only written when the
/// header's E flag announces them.
pub fn encode_message(msg: &Message) -> GtpResult<Bytes> {
    if !msg.extensions.is_empty() && msg.header.get("e") != Some(1) {
        return Err(GtpError::EncodingError(
            "extension headers present but E flag clear".to_string(),
        ));
    }
    Ok(ogs_tlv::encode_message::<Gtp1>(msg)?)
}

/// Empty message with the S flag set, ready for IEs to be pushed.
pub fn new_message(
    message_type: Gtp1cMessageType,
    teid: u32,
    sequence_number: u16,
) -> GtpResult<Message> {
    let code = message_type as u8;
    let spec = registry()
        .message(code)
        .ok_or(GtpError::InvalidMessageType(code))?;
    let mut msg = Message::new::<Gtp1>(spec)?;
    msg.header.set("teid", teid as u64)?;
    msg.header.set("s", 1)?;
    msg.header.set("sequence_number", sequence_number as u64)?;
    Ok(msg)
}

pub fn echo_request(sequence_number: u16) -> GtpResult<Message> {
    new_message(Gtp1cMessageType::EchoRequest, 0, sequence_number)
}

pub fn echo_response(sequence_number: u16, restart_counter: u8) -> GtpResult<Message> {
    let mut msg = new_message(Gtp1cMessageType::EchoResponse, 0, sequence_number)?;
    msg.body.push(recovery_ie(restart_counter)?);
    Ok(msg)
}

/// Cause value of a response, if present and well formed
pub fn cause(msg: &Message) -> Option<u8> {
    msg.body
        .get(Gtp1IeType::Cause.tag(), 0)
        .and_then(|ie| ie.record())
        .and_then(|r| r.get("cause"))
        .map(|c| c as u8)
}

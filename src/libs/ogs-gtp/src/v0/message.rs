//! GTPv0 Messages
//!
//! GTPv0 signalling message tables (GSM 09.60 section 7). IEs appear in
//! ascending type order and are checked slot by slot.

use std::sync::OnceLock;

use bytes::Bytes;
use ogs_tlv::{
    CodecConfig, FaultCode, GroupSpec, Layout, Message, MessageSpec, PayloadDef, Protocol,
    Registry, RegistryError, Slot,
};

use super::header::*;
use super::ie::*;
use crate::error::{GtpError, GtpResult};
use crate::v1::ie as v1;

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
            Slot::mandatory(6, "Quality of Service Profile"),
            Slot::optional(14, "Recovery"),
            Slot::mandatory(15, "Selection Mode"),
            Slot::mandatory(16, "Flow Label Data I"),
            Slot::mandatory(17, "Flow Label Signalling"),
            Slot::mandatory(128, "End User Address"),
            Slot::mandatory(131, "Access Point Name"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::mandatory(133, "SGSN Address for signalling"),
            Slot::mandatory(133, "SGSN Address for user traffic"),
            Slot::mandatory(134, "MSISDN"),
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
            Slot::optional(6, "Quality of Service Profile"),
            Slot::optional(8, "Reordering Required"),
            Slot::optional(14, "Recovery"),
            Slot::optional(16, "Flow Label Data I"),
            Slot::optional(17, "Flow Label Signalling"),
            Slot::optional(127, "Charging ID"),
            Slot::optional(128, "End User Address"),
            Slot::optional(132, "Protocol Configuration Options"),
            Slot::optional(133, "GGSN Address for signalling"),
            Slot::optional(133, "GGSN Address for user traffic"),
            Slot::optional(251, "Charging Gateway Address"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static UPDATE_PDP_CONTEXT_REQUEST: MessageSpec = MessageSpec::new(
    18,
    GroupSpec::ordered(
        "Update PDP Context Request",
        &[
            Slot::mandatory(6, "Quality of Service Profile"),
            Slot::optional(14, "Recovery"),
            Slot::mandatory(16, "Flow Label Data I"),
            Slot::optional(17, "Flow Label Signalling"),
            Slot::mandatory(133, "SGSN Address for signalling"),
            Slot::mandatory(133, "SGSN Address for user traffic"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static UPDATE_PDP_CONTEXT_RESPONSE: MessageSpec = MessageSpec::new(
    19,
    GroupSpec::ordered(
        "Update PDP Context Response",
        &[
            Slot::mandatory(1, "Cause"),
            Slot::optional(6, "Quality of Service Profile"),
            Slot::optional(14, "Recovery"),
            Slot::optional(16, "Flow Label Data I"),
            Slot::optional(17, "Flow Label Signalling"),
            Slot::optional(127, "Charging ID"),
            Slot::optional(133, "GGSN Address for signalling"),
            Slot::optional(133, "GGSN Address for user traffic"),
            Slot::optional(251, "Charging Gateway Address"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static DELETE_PDP_CONTEXT_REQUEST: MessageSpec = MessageSpec::new(
    20,
    GroupSpec::ordered(
        "Delete PDP Context Request",
        &[Slot::optional(255, "Private Extension")],
    ),
);

pub static DELETE_PDP_CONTEXT_RESPONSE: MessageSpec = MessageSpec::new(
    21,
    GroupSpec::ordered(
        "Delete PDP Context Response",
        &[
            Slot::mandatory(1, "Cause"),
            Slot::optional(255, "Private Extension"),
        ],
    ),
);

pub static ERROR_INDICATION: MessageSpec = MessageSpec::new(
    26,
    GroupSpec::ordered("Error Indication", &[Slot::optional(255, "Private Extension")]),
);

/// Build the GTPv0 registry from the static tables.
pub fn build_registry() -> Result<Registry, RegistryError> {
    let fields = PayloadDef::Fields;
    Registry::builder("GTPv0")
        .header(&GTP0_HEADER)
        .ie(Gtp0IeType::Cause.tag(), fields(&v1::CAUSE))
        .ie(Gtp0IeType::Imsi.tag(), fields(&v1::IMSI))
        .ie(Gtp0IeType::Rai.tag(), fields(&v1::RAI))
        .ie(Gtp0IeType::QualityOfServiceProfile.tag(), fields(&QOS_PROFILE))
        .ie(
            Gtp0IeType::ReorderingRequired.tag(),
            fields(&v1::REORDERING_REQUIRED),
        )
        .ie(Gtp0IeType::Recovery.tag(), fields(&v1::RECOVERY))
        .ie(Gtp0IeType::SelectionMode.tag(), fields(&v1::SELECTION_MODE))
        .ie(Gtp0IeType::FlowLabelDataI.tag(), fields(&FLOW_LABEL))
        .ie(Gtp0IeType::FlowLabelSignalling.tag(), fields(&FLOW_LABEL))
        .ie(Gtp0IeType::FlowLabelDataII.tag(), fields(&FLOW_LABEL_DATA_II))
        .ie(
            Gtp0IeType::MsNotReachableReason.tag(),
            fields(&MS_NOT_REACHABLE_REASON),
        )
        .ie(Gtp0IeType::ChargingId.tag(), fields(&v1::CHARGING_ID))
        .ie(Gtp0IeType::EndUserAddress.tag(), fields(&v1::END_USER_ADDRESS))
        .ie(
            Gtp0IeType::AccessPointName.tag(),
            fields(&v1::ACCESS_POINT_NAME),
        )
        .ie(Gtp0IeType::GsnAddress.tag(), fields(&v1::GSN_ADDRESS))
        .ie(Gtp0IeType::Msisdn.tag(), fields(&v1::MSISDN))
        .ie(
            Gtp0IeType::ChargingGatewayAddress.tag(),
            fields(&v1::CHARGING_GATEWAY_ADDRESS),
        )
        .ie(
            Gtp0IeType::PrivateExtension.tag(),
            fields(&v1::PRIVATE_EXTENSION),
        )
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
        .build()
}

/// The GTPv0 registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| match build_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("invalid GTPv0 tables: {e}"),
    })
}

impl Protocol for Gtp0 {
    const NAME: &'static str = "GTPv0";
    const MIN_HEADER_LEN: usize = GTPV0_HEADER_LEN;
    const TYPE_OFFSET: usize = GTP0_TYPE_OFFSET;

    fn header_layout() -> &'static Layout {
        &GTP0_HEADER
    }

    fn registry() -> &'static Registry {
        registry()
    }
}

/// Decode a GTPv0 message.
pub fn decode_message(buf: &[u8]) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message::<Gtp0>(buf)
}

pub fn decode_message_with(buf: &[u8], config: &CodecConfig) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message_with::<Gtp0>(buf, config)
}

pub fn encode_message(msg: &Message) -> GtpResult<Bytes> {
    Ok(ogs_tlv::encode_message::<Gtp0>(msg)?)
}

/// Empty message for the tunnel `tid`.
pub fn new_message(
    message_type: Gtp0MessageType,
    tid: u64,
    sequence_number: u16,
    flow_label: u16,
) -> GtpResult<Message> {
    let code = message_type as u8;
    let spec = registry()
        .message(code)
        .ok_or(GtpError::InvalidMessageType(code))?;
    let mut msg = Message::new::<Gtp0>(spec)?;
    msg.header.set("tid", tid)?;
    msg.header.set("sequence_number", sequence_number as u64)?;
    msg.header.set("flow_label", flow_label as u64)?;
    Ok(msg)
}

pub fn echo_request(sequence_number: u16) -> GtpResult<Message> {
    new_message(Gtp0MessageType::EchoRequest, 0, sequence_number, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: [u8; 20] = [
        0x1E, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0,
        0, 0,
    ];

    #[test]
    fn test_registry_builds() {
        assert_eq!(build_registry().unwrap().message_count(), 10);
    }

    #[test]
    fn test_echo_request_fixture() {
        let (msg, fault) = decode_message(&ECHO);
        assert_eq!(fault, FaultCode::Ok);
        let msg = msg.unwrap();
        assert_eq!(msg.name(), "Echo Request");
        assert!(msg.body.is_empty());
        assert_eq!(msg.header.get("sequence_number"), Some(1));
        assert_eq!(encode_message(&msg).unwrap().as_ref(), &ECHO);
        assert_eq!(encode_message(&echo_request(1).unwrap()).unwrap().as_ref(), &ECHO);
    }

    #[test]
    fn test_create_pdp_context_request() {
        let mut msg = new_message(
            Gtp0MessageType::CreatePdpContextRequest,
            0x2143_6587_0921_43F5,
            9,
            0,
        )
        .unwrap();
        msg.body.push(qos_profile_ie(3, 3, 4, 2, 31).unwrap());
        msg.body.push(v1::recovery_ie(1).unwrap());
        msg.body.push(ogs_tlv::Ie::raw(15, vec![0xFC]));
        msg.body.push(flow_label_ie(Gtp0IeType::FlowLabelDataI, 100).unwrap());
        msg.body.push(flow_label_ie(Gtp0IeType::FlowLabelSignalling, 101).unwrap());
        msg.body.push(ogs_tlv::Ie::raw(128, vec![0xF1, 0x21]));
        msg.body.push(v1::apn_ie(b"\x03ims".to_vec()).unwrap());
        msg.body.push(v1::gsn_address_ie(vec![10, 0, 0, 1]).unwrap());
        msg.body.push(v1::gsn_address_ie(vec![10, 0, 0, 2]).unwrap());
        msg.body.push(ogs_tlv::Ie::raw(134, vec![0x91, 0x21, 0x43]));
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]) as usize, bytes.len() - 20);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.header.get("tid"), Some(0x2143_6587_0921_43F5));
        assert_eq!(
            decoded.body.get(16, 0).unwrap().record().unwrap().get("flow_label"),
            Some(100)
        );
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_missing_mandatory_reported() {
        let mut buf = ECHO.to_vec();
        buf[1] = 21;
        let (msg, fault) = decode_message(&buf);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        assert_eq!(msg.unwrap().missing[0].name, "Cause");
    }

    #[test]
    fn test_gtpv1_header_rejected() {
        let buf = [0x32, 1, 0, 4, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode_message(&buf), (None, FaultCode::BufferInvalid));
    }
}

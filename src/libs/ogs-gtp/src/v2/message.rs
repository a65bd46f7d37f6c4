//! GTPv2 Messages
//!
//! GTPv2-C message tables (3GPP TS 29.274 section 7). IEs are identified
//! by type and instance and may appear in any order, so bodies are checked
//! by key. Bearer Context has a different content in each message; the
//! messages that care carry a scoped override of the generic table.

use std::sync::OnceLock;

use bytes::Bytes;
use ogs_tlv::{
    CodecConfig, Entry, FaultCode, GroupSpec, IeKey, Layout, Message, MessageSpec, PayloadDef,
    Protocol, Registry, RegistryError,
};

use super::header::*;
use super::ie::*;
use crate::error::{GtpError, GtpResult};

const PRIVATE_EXTENSION_ENTRY: Entry = Entry::new(255, 0, "Private Extension");

pub static ECHO_REQUEST: MessageSpec = MessageSpec::new(
    1,
    GroupSpec::keyed(
        "Echo Request",
        &[Entry::new(3, 0, "Recovery")],
        &[
            Entry::new(152, 0, "Sending Node Features"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static ECHO_RESPONSE: MessageSpec = MessageSpec::new(
    2,
    GroupSpec::keyed(
        "Echo Response",
        &[Entry::new(3, 0, "Recovery")],
        &[
            Entry::new(152, 0, "Sending Node Features"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static VERSION_NOT_SUPPORTED_INDICATION: MessageSpec = MessageSpec::new(
    3,
    GroupSpec::keyed("Version Not Supported Indication", &[], &[]),
);

pub static CREATE_SESSION_REQUEST: MessageSpec = MessageSpec::new(
    32,
    GroupSpec::keyed(
        "Create Session Request",
        &[
            Entry::new(82, 0, "RAT Type"),
            Entry::new(87, 0, "Sender F-TEID for Control Plane"),
            Entry::new(71, 0, "Access Point Name"),
            Entry::new(93, 0, "Bearer Contexts to be created"),
        ],
        &[
            Entry::new(1, 0, "IMSI"),
            Entry::new(76, 0, "MSISDN"),
            Entry::new(75, 0, "ME Identity"),
            Entry::new(86, 0, "User Location Information"),
            Entry::new(83, 0, "Serving Network"),
            Entry::new(77, 0, "Indication Flags"),
            Entry::new(87, 1, "PGW S5/S8 Address for Control Plane"),
            Entry::new(128, 0, "Selection Mode"),
            Entry::new(99, 0, "PDN Type"),
            Entry::new(79, 0, "PDN Address Allocation"),
            Entry::new(127, 0, "Maximum APN Restriction"),
            Entry::new(72, 0, "Aggregate Maximum Bit Rate"),
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(93, 1, "Bearer Contexts to be removed"),
            Entry::new(95, 0, "Charging Characteristics"),
            Entry::new(114, 0, "UE Time Zone"),
            Entry::new(3, 0, "Recovery"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
)
.scoped(&CREATE_SESSION_REQUEST_SCOPE);

static CREATE_SESSION_REQUEST_SCOPE: [(IeKey, PayloadDef); 2] = [
    (
        IeKey::new(93, 0),
        PayloadDef::Grouped(&BEARER_CONTEXT_TO_BE_CREATED),
    ),
    (
        IeKey::new(93, 1),
        PayloadDef::Grouped(&BEARER_CONTEXT_TO_BE_REMOVED),
    ),
];

pub static CREATE_SESSION_RESPONSE: MessageSpec = MessageSpec::new(
    33,
    GroupSpec::keyed(
        "Create Session Response",
        &[Entry::new(2, 0, "Cause")],
        &[
            Entry::new(87, 0, "Sender F-TEID for Control Plane"),
            Entry::new(87, 1, "PGW S5/S8 F-TEID for Control Plane"),
            Entry::new(79, 0, "PDN Address Allocation"),
            Entry::new(127, 0, "APN Restriction"),
            Entry::new(72, 0, "Aggregate Maximum Bit Rate"),
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(93, 0, "Bearer Contexts created"),
            Entry::new(93, 1, "Bearer Contexts marked for removal"),
            Entry::new(3, 0, "Recovery"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
)
.scoped(&CREATE_SESSION_RESPONSE_SCOPE);

static CREATE_SESSION_RESPONSE_SCOPE: [(IeKey, PayloadDef); 2] = [
    (IeKey::new(93, 0), PayloadDef::Grouped(&BEARER_CONTEXT_CREATED)),
    (
        IeKey::new(93, 1),
        PayloadDef::Grouped(&BEARER_CONTEXT_MARKED_FOR_REMOVAL),
    ),
];

pub static MODIFY_BEARER_REQUEST: MessageSpec = MessageSpec::new(
    34,
    GroupSpec::keyed(
        "Modify Bearer Request",
        &[],
        &[
            Entry::new(75, 0, "ME Identity"),
            Entry::new(86, 0, "User Location Information"),
            Entry::new(83, 0, "Serving Network"),
            Entry::new(82, 0, "RAT Type"),
            Entry::new(77, 0, "Indication Flags"),
            Entry::new(87, 0, "Sender F-TEID for Control Plane"),
            Entry::new(72, 0, "Aggregate Maximum Bit Rate"),
            Entry::new(92, 0, "Delay Downlink Packet Notification Request"),
            Entry::new(93, 0, "Bearer Contexts to be modified"),
            Entry::new(93, 1, "Bearer Contexts to be removed"),
            Entry::new(114, 0, "UE Time Zone"),
            Entry::new(3, 0, "Recovery"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static MODIFY_BEARER_RESPONSE: MessageSpec = MessageSpec::new(
    35,
    GroupSpec::keyed(
        "Modify Bearer Response",
        &[Entry::new(2, 0, "Cause")],
        &[
            Entry::new(76, 0, "MSISDN"),
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(127, 0, "APN Restriction"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(93, 0, "Bearer Contexts modified"),
            Entry::new(93, 1, "Bearer Contexts marked for removal"),
            Entry::new(3, 0, "Recovery"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static DELETE_SESSION_REQUEST: MessageSpec = MessageSpec::new(
    36,
    GroupSpec::keyed(
        "Delete Session Request",
        &[],
        &[
            Entry::new(2, 0, "Cause"),
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(86, 0, "User Location Information"),
            Entry::new(77, 0, "Indication Flags"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(87, 0, "Sender F-TEID for Control Plane"),
            Entry::new(114, 0, "UE Time Zone"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static DELETE_SESSION_RESPONSE: MessageSpec = MessageSpec::new(
    37,
    GroupSpec::keyed(
        "Delete Session Response",
        &[Entry::new(2, 0, "Cause")],
        &[
            Entry::new(3, 0, "Recovery"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static CREATE_BEARER_REQUEST: MessageSpec = MessageSpec::new(
    95,
    GroupSpec::keyed(
        "Create Bearer Request",
        &[
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(93, 0, "Bearer Contexts"),
        ],
        &[
            Entry::new(100, 0, "Procedure Transaction Id"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(72, 0, "APN-AMBR"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
)
.scoped(&CREATE_BEARER_REQUEST_SCOPE);

static CREATE_BEARER_REQUEST_SCOPE: [(IeKey, PayloadDef); 1] = [(
    IeKey::new(93, 0),
    PayloadDef::Grouped(&BEARER_CONTEXT_TO_BE_ESTABLISHED),
)];

pub static CREATE_BEARER_RESPONSE: MessageSpec = MessageSpec::new(
    96,
    GroupSpec::keyed(
        "Create Bearer Response",
        &[
            Entry::new(2, 0, "Cause"),
            Entry::new(93, 0, "Bearer Contexts"),
        ],
        &[
            Entry::new(3, 0, "Recovery"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(86, 0, "User Location Information"),
            Entry::new(114, 0, "UE Time Zone"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static DELETE_BEARER_REQUEST: MessageSpec = MessageSpec::new(
    99,
    GroupSpec::keyed(
        "Delete Bearer Request",
        &[],
        &[
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(73, 1, "EPS Bearer IDs"),
            Entry::new(93, 0, "Failed Bearer Contexts"),
            Entry::new(100, 0, "Procedure Transaction Id"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(2, 0, "Cause"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static DELETE_BEARER_RESPONSE: MessageSpec = MessageSpec::new(
    100,
    GroupSpec::keyed(
        "Delete Bearer Response",
        &[Entry::new(2, 0, "Cause")],
        &[
            Entry::new(73, 0, "Linked EPS Bearer ID"),
            Entry::new(93, 0, "Bearer Contexts"),
            Entry::new(3, 0, "Recovery"),
            Entry::new(78, 0, "Protocol Configuration Options"),
            Entry::new(86, 0, "User Location Information"),
            Entry::new(114, 0, "UE Time Zone"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static RELEASE_ACCESS_BEARERS_REQUEST: MessageSpec = MessageSpec::new(
    170,
    GroupSpec::keyed(
        "Release Access Bearers Request",
        &[],
        &[
            Entry::new(73, 0, "List of RABs"),
            Entry::new(135, 0, "Originating Node"),
            Entry::new(77, 0, "Indication Flags"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static RELEASE_ACCESS_BEARERS_RESPONSE: MessageSpec = MessageSpec::new(
    171,
    GroupSpec::keyed(
        "Release Access Bearers Response",
        &[Entry::new(2, 0, "Cause")],
        &[Entry::new(3, 0, "Recovery"), PRIVATE_EXTENSION_ENTRY],
    ),
);

pub static DOWNLINK_DATA_NOTIFICATION: MessageSpec = MessageSpec::new(
    176,
    GroupSpec::keyed(
        "Downlink Data Notification",
        &[],
        &[
            Entry::new(2, 0, "Cause"),
            Entry::new(73, 0, "EPS Bearer ID"),
            Entry::new(155, 0, "Allocation/Retention Priority"),
            Entry::new(1, 0, "IMSI"),
            Entry::new(87, 0, "Sender F-TEID for Control Plane"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

pub static DOWNLINK_DATA_NOTIFICATION_ACKNOWLEDGE: MessageSpec = MessageSpec::new(
    177,
    GroupSpec::keyed(
        "Downlink Data Notification Acknowledge",
        &[Entry::new(2, 0, "Cause")],
        &[
            Entry::new(92, 0, "Data Notification Delay"),
            Entry::new(3, 0, "Recovery"),
            PRIVATE_EXTENSION_ENTRY,
        ],
    ),
);

/// Build the GTPv2-C registry from the static tables.
pub fn build_registry() -> Result<Registry, RegistryError> {
    let fields = PayloadDef::Fields;
    Registry::builder("GTPv2-C")
        .header(&GTP2_HEADER)
        .ie(Gtp2IeType::Imsi.tag(), fields(&IMSI))
        .ie(Gtp2IeType::Cause.tag(), fields(&CAUSE))
        .ie(Gtp2IeType::Recovery.tag(), fields(&RECOVERY))
        .ie(Gtp2IeType::Apn.tag(), fields(&APN))
        .ie(Gtp2IeType::Ambr.tag(), fields(&AMBR))
        .ie(Gtp2IeType::Ebi.tag(), fields(&EBI))
        .ie(Gtp2IeType::Mei.tag(), fields(&MEI))
        .ie(Gtp2IeType::Msisdn.tag(), fields(&MSISDN))
        .ie(Gtp2IeType::Indication.tag(), fields(&INDICATION))
        .ie(Gtp2IeType::Paa.tag(), fields(&PAA))
        .ie(Gtp2IeType::BearerQos.tag(), fields(&BEARER_QOS))
        .ie(Gtp2IeType::RatType.tag(), fields(&RAT_TYPE))
        .ie(Gtp2IeType::ServingNetwork.tag(), fields(&SERVING_NETWORK))
        .ie(Gtp2IeType::Uli.tag(), fields(&ULI))
        .ie(Gtp2IeType::FTeid.tag(), fields(&F_TEID))
        .ie(Gtp2IeType::DelayValue.tag(), fields(&DELAY_VALUE))
        .ie(
            Gtp2IeType::BearerContext.tag(),
            PayloadDef::Grouped(&BEARER_CONTEXT),
        )
        .ie(Gtp2IeType::ChargingId.tag(), fields(&CHARGING_ID))
        .ie(
            Gtp2IeType::ChargingCharacteristics.tag(),
            fields(&CHARGING_CHARACTERISTICS),
        )
        .ie(Gtp2IeType::BearerFlags.tag(), fields(&BEARER_FLAGS))
        .ie(Gtp2IeType::PdnType.tag(), fields(&PDN_TYPE))
        .ie(Gtp2IeType::Pti.tag(), fields(&PTI))
        .ie(Gtp2IeType::UeTimeZone.tag(), fields(&UE_TIME_ZONE))
        .ie(Gtp2IeType::ApnRestriction.tag(), fields(&APN_RESTRICTION))
        .ie(Gtp2IeType::SelectionMode.tag(), fields(&SELECTION_MODE))
        .ie(Gtp2IeType::NodeType.tag(), fields(&NODE_TYPE))
        .ie(
            Gtp2IeType::SendingNodeFeatures.tag(),
            fields(&SENDING_NODE_FEATURES),
        )
        .ie(Gtp2IeType::Arp.tag(), fields(&ARP))
        .ie(Gtp2IeType::PrivateExtension.tag(), fields(&PRIVATE_EXTENSION))
        .message(&ECHO_REQUEST)
        .message(&ECHO_RESPONSE)
        .message(&VERSION_NOT_SUPPORTED_INDICATION)
        .message(&CREATE_SESSION_REQUEST)
        .message(&CREATE_SESSION_RESPONSE)
        .message(&MODIFY_BEARER_REQUEST)
        .message(&MODIFY_BEARER_RESPONSE)
        .message(&DELETE_SESSION_REQUEST)
        .message(&DELETE_SESSION_RESPONSE)
        .message(&CREATE_BEARER_REQUEST)
        .message(&CREATE_BEARER_RESPONSE)
        .message(&DELETE_BEARER_REQUEST)
        .message(&DELETE_BEARER_RESPONSE)
        .message(&RELEASE_ACCESS_BEARERS_REQUEST)
        .message(&RELEASE_ACCESS_BEARERS_RESPONSE)
        .message(&DOWNLINK_DATA_NOTIFICATION)
        .message(&DOWNLINK_DATA_NOTIFICATION_ACKNOWLEDGE)
        .build()
}

/// The GTPv2-C registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| match build_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("invalid GTPv2-C tables: {e}"),
    })
}

impl Protocol for Gtp2 {
    const NAME: &'static str = "GTPv2-C";
    const MIN_HEADER_LEN: usize = GTPV2C_HEADER_LEN_NO_TEID;
    const TYPE_OFFSET: usize = GTP2_TYPE_OFFSET;

    fn header_layout() -> &'static Layout {
        &GTP2_HEADER
    }

    fn registry() -> &'static Registry {
        registry()
    }
}

/// Decode a GTPv2-C message.
pub fn decode_message(buf: &[u8]) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message::<Gtp2>(buf)
}

pub fn decode_message_with(buf: &[u8], config: &CodecConfig) -> (Option<Message>, FaultCode) {
    ogs_tlv::decode_message_with::<Gtp2>(buf, config)
}

pub fn encode_message(msg: &Message) -> GtpResult<Bytes> {
    Ok(ogs_tlv::encode_message::<Gtp2>(msg)?)
}

/// Empty message; the T flag follows whether a TEID is given.
pub fn new_message(
    message_type: Gtp2MessageType,
    teid: Option<u32>,
    sequence_number: u32,
) -> GtpResult<Message> {
    let code = message_type as u8;
    let spec = registry()
        .message(code)
        .ok_or(GtpError::InvalidMessageType(code))?;
    let mut msg = Message::new::<Gtp2>(spec)?;
    if let Some(teid) = teid {
        msg.header.set("t", 1)?;
        msg.header.set("teid", teid as u64)?;
    }
    msg.header.set("sequence_number", sequence_number as u64)?;
    Ok(msg)
}

pub fn echo_request(sequence_number: u32, restart_counter: u8) -> GtpResult<Message> {
    let mut msg = new_message(Gtp2MessageType::EchoRequest, None, sequence_number)?;
    msg.body.push(recovery_ie(restart_counter)?);
    Ok(msg)
}

pub fn echo_response(sequence_number: u32, restart_counter: u8) -> GtpResult<Message> {
    let mut msg = new_message(Gtp2MessageType::EchoResponse, None, sequence_number)?;
    msg.body.push(recovery_ie(restart_counter)?);
    Ok(msg)
}

/// Cause value of a message, if present and well formed
pub fn cause(msg: &Message) -> Option<u8> {
    msg.body
        .get(Gtp2IeType::Cause.tag(), 0)
        .and_then(|ie| ie.record())
        .and_then(|r| r.get("cause"))
        .map(|c| c as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v2::types::{Gtp2Cause, Gtp2FTeidInterfaceType, Gtp2RatType};
    use ogs_tlv::{DecodeMode, Group, Ie};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn bearer_to_be_created() -> Group {
        Group::new()
            .with(ebi_ie(5).unwrap())
            .with(bearer_qos_ie(9, 15, (0, 0), (0, 0)).unwrap())
            .with(
                f_teid_ipv4_ie(
                    2,
                    Gtp2FTeidInterfaceType::S5S8SgwGtpU,
                    0x100,
                    [10, 0, 0, 1],
                )
                .unwrap(),
            )
    }

    fn create_session_request(with_apn: bool, bearer: Group) -> Message {
        let mut msg = new_message(Gtp2MessageType::CreateSessionRequest, Some(0), 1).unwrap();
        msg.body.push(imsi_ie(vec![0x21, 0x43, 0x65, 0x87, 0x09, 0x21, 0x43, 0xF5]).unwrap());
        msg.body.push(rat_type_ie(Gtp2RatType::Eutran).unwrap());
        msg.body.push(
            f_teid_ipv4_ie(0, Gtp2FTeidInterfaceType::S11MmeGtpC, 0x1234, [10, 0, 0, 2]).unwrap(),
        );
        if with_apn {
            msg.body.push(apn_ie(b"\x08internet".to_vec()).unwrap());
        }
        msg.body.push(bearer_context_ie(0, bearer).unwrap());
        msg
    }

    #[test]
    fn test_registry_builds() {
        let registry = build_registry().unwrap();
        assert_eq!(registry.message_count(), 17);
        assert!(registry.alternate(32).is_none());
    }

    #[test]
    fn test_echo_request_encoding() {
        let msg = echo_request(0x0A0B0C, 5).unwrap();
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0x40, 1, 0, 9, 0x0A, 0x0B, 0x0C, 0, 3, 0, 1, 0, 5]
        );
        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        assert_eq!(decoded.unwrap().header.get("teid"), None);
    }

    #[test]
    fn test_short_buffer() {
        let buf = [0x48, 32, 0, 8, 0, 0, 0];
        assert_eq!(decode_message(&buf), (None, FaultCode::BufferTooShort));
    }

    #[test]
    fn test_create_session_request_round_trip() {
        let msg = create_session_request(true, bearer_to_be_created());
        let bytes = encode_message(&msg).unwrap();

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.name(), "Create Session Request");
        assert_eq!(decoded.header.get("teid"), Some(0));

        let bearer = decoded.body.get(93, 0).unwrap().group().unwrap();
        assert_eq!(bearer.len(), 3);
        let s5 = bearer.get(87, 2).unwrap().record().unwrap();
        assert_eq!(s5.get("interface_type"), Some(4));
        assert_eq!(s5.get("teid_gre_key"), Some(0x100));
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_create_session_request_without_apn() {
        init();
        let bytes = encode_message(&create_session_request(false, bearer_to_be_created())).unwrap();
        let (msg, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.missing.len(), 1);
        assert_eq!(msg.missing[0].name, "Access Point Name");
        assert_eq!(msg.missing[0].key, IeKey::new(71, 0));
    }

    #[test]
    fn test_scoped_bearer_context_checked() {
        init();
        // Bearer Level QoS is mandatory only in Bearer Context to be created
        let bearer = Group::new().with(ebi_ie(5).unwrap());
        let bytes = encode_message(&create_session_request(true, bearer.clone())).unwrap();

        let strict = Message::decode::<Gtp2>(&CREATE_SESSION_REQUEST, &bytes, DecodeMode::Strict);
        assert!(matches!(
            strict,
            Err(ogs_tlv::CodecError::MandatoryIeMissing(_))
        ));

        let (msg, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.missing[0].container, "Bearer Context to be created");
        assert_eq!(msg.missing[0].name, "Bearer Level QoS");

        let mut modify = new_message(Gtp2MessageType::ModifyBearerRequest, Some(7), 2).unwrap();
        modify.body.push(bearer_context_ie(0, bearer).unwrap());
        let (msg, fault) = decode_message(&encode_message(&modify).unwrap());
        assert_eq!(fault, FaultCode::Ok);
        assert!(msg.unwrap().body.get(93, 0).unwrap().group().is_some());
    }

    #[test]
    fn test_instances_are_distinct() {
        let mut msg = new_message(Gtp2MessageType::DeleteBearerRequest, Some(1), 3).unwrap();
        msg.body.push(ebi_ie(5).unwrap());
        msg.body.push(ebi_ie(6).unwrap().with_instance(1));
        msg.body.push(ebi_ie(7).unwrap().with_instance(1));
        let (decoded, fault) = decode_message(&encode_message(&msg).unwrap());
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        let ebi = |ie: &Ie| ie.record().unwrap().get("ebi");
        assert_eq!(ebi(decoded.body.get(73, 0).unwrap()), Some(5));
        assert_eq!(
            decoded.body.get_all(73).filter(|ie| ie.instance == 1).count(),
            2
        );
    }

    #[test]
    fn test_out_of_range_pdn_type_kept_raw() {
        let mut msg = create_session_request(true, bearer_to_be_created());
        msg.body.push(Ie::raw(99, vec![0x07]));
        let bytes = encode_message(&msg).unwrap();
        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert!(decoded.body.get(99, 0).unwrap().is_raw());
        assert_eq!(encode_message(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_extended_type_ie() {
        let mut msg = echo_request(1, 1).unwrap();
        msg.body.push(Ie::raw(254, vec![1, 2]).with_ext(300));
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(&bytes[13..], &[254, 0, 4, 0, 0x01, 0x2C, 1, 2]);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let ie = decoded.unwrap().body.get(300, 0).cloned().unwrap();
        assert_eq!(ie.ext, Some(300));
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[1, 2]);
    }

    #[test]
    fn test_message_priority() {
        let mut msg = new_message(Gtp2MessageType::DeleteSessionResponse, Some(9), 4).unwrap();
        msg.header.set("mp", 1).unwrap();
        msg.header.set("message_priority", 3).unwrap();
        msg.body.push(cause_ie(Gtp2Cause::RequestAccepted).unwrap());
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(bytes[0], 0x4C);
        assert_eq!(bytes[11], 0x30);

        let (decoded, fault) = decode_message(&bytes);
        assert_eq!(fault, FaultCode::Ok);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.header.get("message_priority"), Some(3));
        assert_eq!(cause(&decoded), Some(16));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let buf = [0x30, 1, 0, 4, 0, 0, 0, 0];
        assert_eq!(decode_message(&buf), (None, FaultCode::BufferInvalid));
    }
}

//! Property-Based Tests for PFCP Protocol Messages
//!
//! These tests verify that PFCP messages survive an encode/decode cycle,
//! that the header length and SEID flag follow the content, and that
//! arbitrary input never panics the decoder.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::header::{PfcpMessageType, PFCP_HEADER_LEN};
    use crate::ie::*;
    use crate::message::*;
    use crate::FaultCode;

    // ========================================================================
    // PFCP Message Property Tests
    // ========================================================================

    mod pfcp_props {
        use super::*;
        use ogs_tlv::{Group, Ie};

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_pfcp_heartbeat_request_round_trip(
                recovery_time_stamp in any::<u32>(),
                sequence_number in 0u32..=0xFF_FFFF,
            ) {
                let msg = heartbeat_request(sequence_number, recovery_time_stamp).unwrap();
                let encoded = encode_message(&msg).unwrap();
                prop_assert_eq!(encoded.len(), PFCP_HEADER_LEN + 8);

                let (decoded, fault) = decode_message(&encoded);
                prop_assert_eq!(fault, FaultCode::Ok);
                let decoded = decoded.unwrap();
                prop_assert_eq!(decoded.header.get("sequence_number"), Some(sequence_number as u64));
                prop_assert_eq!(decoded.header.get("s"), Some(0));
                let rts = decoded.body.get(96, 0).unwrap().record().unwrap().get("timestamp");
                prop_assert_eq!(rts, Some(recovery_time_stamp as u64));
            }

            #[test]
            fn prop_pfcp_session_seid_round_trip(
                session_id in any::<u64>(),
                cp_seid in any::<u64>(),
                addr in any::<[u8; 4]>(),
            ) {
                let mut msg = new_message(PfcpMessageType::SessionModificationRequest, Some(session_id), 1).unwrap();
                msg.body.push(f_seid_ipv4_ie(cp_seid, addr).unwrap());
                let encoded = encode_message(&msg).unwrap();
                prop_assert_eq!(encoded[0] & 0x01, 0x01);

                let (decoded, fault) = decode_message(&encoded);
                prop_assert_eq!(fault, FaultCode::Ok);
                let decoded = decoded.unwrap();
                prop_assert_eq!(seid(&decoded), Some(session_id));
                let f_seid = decoded.body.get(57, 0).unwrap().record().unwrap().clone();
                prop_assert_eq!(f_seid.get("seid"), Some(cp_seid));
                prop_assert_eq!(f_seid.get_bytes("ipv4_address").unwrap().as_ref(), &addr[..]);
            }

            #[test]
            fn prop_pfcp_length_follows_rules(
                rules in prop::collection::vec((any::<u16>(), any::<u32>()), 1..8),
            ) {
                let mut msg = new_message(PfcpMessageType::SessionModificationRequest, Some(1), 2).unwrap();
                for (pdr_id, far_id) in &rules {
                    let pdr = Group::new()
                        .with(pdr_id_ie(*pdr_id).unwrap())
                        .with(far_id_ie(*far_id).unwrap());
                    msg.body.push(grouped_ie(IeType::UpdatePdr, pdr));
                }
                let encoded = encode_message(&msg).unwrap();
                let declared = u16::from_be_bytes([encoded[2], encoded[3]]) as usize;
                prop_assert_eq!(declared, encoded.len() - 4);

                let (decoded, fault) = decode_message(&encoded);
                prop_assert_eq!(fault, FaultCode::Ok);
                let decoded = decoded.unwrap();
                prop_assert_eq!(decoded.body.get_all(9).count(), rules.len());
                prop_assert_eq!(encode_message(&decoded).unwrap(), encoded);
            }

            #[test]
            fn prop_pfcp_unknown_ie_preserved(
                tag in 0x0400u16..0x7FFF,
                value in prop::collection::vec(any::<u8>(), 0..32),
            ) {
                let mut msg = heartbeat_response(3, 1).unwrap();
                msg.body.push(Ie::raw(tag, value.clone()));
                let encoded = encode_message(&msg).unwrap();

                let (decoded, fault) = decode_message(&encoded);
                prop_assert_eq!(fault, FaultCode::Ok);
                let decoded = decoded.unwrap();
                prop_assert_eq!(decoded.body.get(tag, 0).unwrap().raw_value().unwrap().as_ref(), &value[..]);
                prop_assert_eq!(encode_message(&decoded).unwrap(), encoded);
            }

            #[test]
            fn prop_pfcp_truncation_detected(
                recovery_time_stamp in any::<u32>(),
                cut in 1usize..16,
            ) {
                let encoded = encode_message(&heartbeat_request(1, recovery_time_stamp).unwrap()).unwrap();
                let (msg, fault) = decode_message(&encoded[..encoded.len() - cut]);
                prop_assert!(msg.is_none());
                prop_assert_eq!(fault, FaultCode::BufferTooShort);
            }
        }
    }

    // ========================================================================
    // Robustness
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_arbitrary_input_classified(data in prop::collection::vec(any::<u8>(), 0..128)) {
            let (msg, fault) = decode_message(&data);
            match fault {
                FaultCode::Ok | FaultCode::MandatoryIeMissing => prop_assert!(msg.is_some()),
                _ => prop_assert!(msg.is_none()),
            }
        }
    }
}

//! GTP Message Fuzzer
//!
//! Feeds arbitrary datagrams to the GTPv0, GTPv1-C and GTPv2-C decoders.
//! Every decoded message must re-encode, and the fault code must agree
//! with whether a message came back.
//!
//! Run with: cargo +nightly fuzz run fuzz_gtp_message

#![no_main]

use libfuzzer_sys::fuzz_target;
use ogs_gtp::{v0, v1, v2, FaultCode, Message};

fuzz_target!(|data: &[u8]| {
    check(v0::decode_message(data), |m| v0::encode_message(m).is_ok());
    check(v1::decode_message(data), |m| v1::encode_message(m).is_ok());
    check(v2::decode_message(data), |m| v2::encode_message(m).is_ok());
});

fn check((msg, fault): (Option<Message>, FaultCode), encodes: impl Fn(&Message) -> bool) {
    match (msg, fault) {
        (Some(msg), FaultCode::Ok | FaultCode::MandatoryIeMissing) => {
            assert!(encodes(&msg), "{} failed to re-encode", msg.name());
        }
        (None, FaultCode::Ok | FaultCode::MandatoryIeMissing) => {
            panic!("fault {fault:?} without a message")
        }
        (Some(_), _) => panic!("message returned with fault {fault:?}"),
        (None, _) => {}
    }
}

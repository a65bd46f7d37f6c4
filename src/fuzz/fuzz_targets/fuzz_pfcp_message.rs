//! PFCP Message Fuzzer
//!
//! Feeds arbitrary datagrams to the PFCP decoder. A decoded message must
//! re-encode, and a complete one must re-encode to the bytes it covered.
//!
//! Run with: cargo +nightly fuzz run fuzz_pfcp_message

#![no_main]

use libfuzzer_sys::fuzz_target;
use ogs_pfcp::{decode_message, encode_message, FaultCode};

fuzz_target!(|data: &[u8]| {
    let (msg, fault) = decode_message(data);
    match (msg, fault) {
        (Some(msg), FaultCode::Ok | FaultCode::MandatoryIeMissing) => {
            let encoded = match encode_message(&msg) {
                Ok(encoded) => encoded,
                Err(e) => panic!("{} failed to re-encode: {e}", msg.name()),
            };
            let (again, _) = decode_message(&encoded);
            assert!(again.is_some(), "{} did not decode after re-encoding", msg.name());
        }
        (None, FaultCode::Ok | FaultCode::MandatoryIeMissing) => {
            panic!("fault {fault:?} without a message")
        }
        (Some(_), _) => panic!("message returned with fault {fault:?}"),
        (None, _) => {}
    }
});

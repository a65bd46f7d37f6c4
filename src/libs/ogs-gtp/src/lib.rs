//! NextGCore GTP Protocol Library
//!
//! This crate provides GTPv0, GTPv1-C and GTPv2-C message building and
//! parsing on top of the `ogs-tlv` codec engine. It implements the GPRS
//! Tunneling Protocol signalling planes as specified in GSM 09.60 (GTPv0),
//! 3GPP TS 29.060 (GTPv1) and 3GPP TS 29.274 (GTPv2).
//!
//! Each version module exposes `decode_message`, which never panics on
//! untrusted input and reports a [`ogs_tlv::FaultCode`] with the decoded
//! message, and `encode_message`, which recomputes lengths and flags.

pub mod error;
pub mod v0;
pub mod v1;
pub mod v2;


pub use error::{GtpError, GtpResult};
pub use ogs_tlv::{FaultCode, Message};

/// GTPv0 UDP port (3386)
pub const GTPV0_UDP_PORT: u16 = 3386;

/// GTPv1-C UDP port (2123)
pub const GTPV1_C_UDP_PORT: u16 = 2123;

/// GTPv2-C UDP port (2123)
pub const GTPV2_C_UDP_PORT: u16 = 2123;

/// GTP version announced in the first octet of a datagram.
pub fn version_of(buf: &[u8]) -> GtpResult<u8> {
    let first = buf.first().ok_or(GtpError::BufferTooShort {
        needed: 1,
        available: 0,
    })?;
    match first >> 5 {
        v @ 0..=2 => Ok(v),
        v => {
            log::debug!("unsupported GTP version {v}");
            Err(GtpError::InvalidVersion(v))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_of() {
        assert_eq!(version_of(&[0x1E]), Ok(0));
        assert_eq!(version_of(&[0x32, 1]), Ok(1));
        assert_eq!(version_of(&[0x48]), Ok(2));
        assert_eq!(version_of(&[0x60]), Err(GtpError::InvalidVersion(3)));
        assert!(matches!(
            version_of(&[]),
            Err(GtpError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_versions_dispatch_independently() {
        let v1 = v1::encode_message(&v1::echo_request(1).unwrap()).unwrap();
        let v2 = v2::encode_message(&v2::echo_request(1, 1).unwrap()).unwrap();
        assert_eq!(v1::decode_message(&v1).1, FaultCode::Ok);
        assert_eq!(v2::decode_message(&v2).1, FaultCode::Ok);
        assert_eq!(v2::decode_message(&v1).0.map(|m| m.name()), None);
    }
}

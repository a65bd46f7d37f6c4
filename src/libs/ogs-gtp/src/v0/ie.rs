//! GTPv0 Information Elements
//!
//! GTPv0 uses the same TV/TLV split as GTPv1 (type below 128 is TV) with
//! its own TV length table and no extended types. Payloads shared with
//! GTPv1 reuse the GTPv1 layouts.

use bytes::{BufMut, BytesMut};
use ogs_tlv::{CodecError, CodecResult, Cursor, FieldDef, Ie, IeFormat, IeHeader, Layout, Record};

use crate::error::GtpResult;
use crate::v1::ie::is_tv_ie;

/// GTPv0 IE codec marker
#[derive(Debug, Clone, Copy)]
pub struct Gtp0;

/// GTPv0 IE Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp0IeType {
    // TV
    Cause = 1,
    Imsi = 2,
    Rai = 3,
    Tlli = 4,
    PTmsi = 5,
    QualityOfServiceProfile = 6,
    ReorderingRequired = 8,
    AuthenticationTriplet = 9,
    MapCause = 11,
    PTmsiSignature = 12,
    MsValidated = 13,
    Recovery = 14,
    SelectionMode = 15,
    FlowLabelDataI = 16,
    FlowLabelSignalling = 17,
    FlowLabelDataII = 18,
    MsNotReachableReason = 19,
    ChargingId = 127,
    // TLV
    EndUserAddress = 128,
    MmContext = 129,
    PdpContext = 130,
    AccessPointName = 131,
    ProtocolConfigurationOptions = 132,
    GsnAddress = 133,
    Msisdn = 134,
    ChargingGatewayAddress = 251,
    PrivateExtension = 255,
}

impl Gtp0IeType {
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

/// Get TV IE length based on type
pub fn get_tv_ie_length(ie_type: u8) -> Option<usize> {
    match ie_type {
        1 => Some(1),   // Cause
        2 => Some(8),   // IMSI
        3 => Some(6),   // RAI
        4 => Some(4),   // TLLI
        5 => Some(4),   // P-TMSI
        6 => Some(3),   // Quality of Service Profile
        8 => Some(1),   // Reordering Required
        9 => Some(28),  // Authentication Triplet
        11 => Some(1),  // MAP Cause
        12 => Some(3),  // P-TMSI Signature
        13 => Some(1),  // MS Validated
        14 => Some(1),  // Recovery
        15 => Some(1),  // Selection Mode
        16 => Some(2),  // Flow Label Data I
        17 => Some(2),  // Flow Label Signalling
        18 => Some(3),  // Flow Label Data II
        19 => Some(1),  // MS Not Reachable Reason
        127 => Some(4), // Charging ID
        _ => None,
    }
}

impl IeFormat for Gtp0 {
    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
        let tag = cur.read_u8()?;
        let length = if is_tv_ie(tag) {
            None
        } else {
            Some(cur.read_u16()? as usize)
        };
        Ok(IeHeader {
            tag: tag as u16,
            length,
            ..Default::default()
        })
    }

    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
        let tag = u8::try_from(ie.tag)
            .map_err(|_| CodecError::EncodingError(format!("GTPv0 IE type {} exceeds 255", ie.tag)))?;
        if length.is_some() == is_tv_ie(tag) {
            return Err(CodecError::EncodingError(format!(
                "GTPv0 IE type {tag}: framing does not match type"
            )));
        }
        buf.put_u8(tag);
        if let Some(len) = length {
            buf.put_u16(len as u16);
        }
        Ok(())
    }

    fn tv_len(tag: u16) -> Option<usize> {
        u8::try_from(tag).ok().and_then(get_tv_ie_length)
    }
}

pub static QOS_PROFILE: Layout = Layout::new(
    "Quality of Service Profile",
    &[
        FieldDef::uint("spare", 2),
        FieldDef::uint("delay_class", 3),
        FieldDef::uint("reliability_class", 3),
        FieldDef::uint("peak_throughput", 4),
        FieldDef::uint("spare2", 1),
        FieldDef::uint("precedence_class", 3),
        FieldDef::uint("spare3", 3),
        FieldDef::uint("mean_throughput", 5),
    ],
);

pub static FLOW_LABEL: Layout = Layout::new("Flow Label", &[FieldDef::uint("flow_label", 16)]);

pub static FLOW_LABEL_DATA_II: Layout = Layout::new(
    "Flow Label Data II",
    &[
        FieldDef::uint("spare", 4),
        FieldDef::uint("nsapi", 4),
        FieldDef::uint("flow_label", 16),
    ],
);

pub static MS_NOT_REACHABLE_REASON: Layout = Layout::new(
    "MS Not Reachable Reason",
    &[FieldDef::uint("reason_for_absence", 8)],
);

pub fn qos_profile_ie(
    delay_class: u8,
    reliability_class: u8,
    peak_throughput: u8,
    precedence_class: u8,
    mean_throughput: u8,
) -> GtpResult<Ie> {
    let rec = Record::with(
        &QOS_PROFILE,
        &[
            ("delay_class", delay_class as u64),
            ("reliability_class", reliability_class as u64),
            ("peak_throughput", peak_throughput as u64),
            ("precedence_class", precedence_class as u64),
            ("mean_throughput", mean_throughput as u64),
        ],
    )?;
    Ok(Ie::fields(Gtp0IeType::QualityOfServiceProfile.tag(), rec))
}

pub fn flow_label_ie(ie_type: Gtp0IeType, flow_label: u16) -> GtpResult<Ie> {
    let rec = Record::with(&FLOW_LABEL, &[("flow_label", flow_label as u64)])?;
    Ok(Ie::fields(ie_type.tag(), rec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tv_lengths_differ_from_gtpv1() {
        assert_eq!(Gtp0::tv_len(6), Some(3));
        assert_eq!(Gtp0::tv_len(16), Some(2));
        assert_eq!(Gtp0::tv_len(20), None);
    }

    #[test]
    fn test_qos_profile_packing() {
        let ie = qos_profile_ie(3, 3, 4, 2, 31).unwrap();
        let mut buf = BytesMut::new();
        ie.encode::<Gtp0>(&mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[6, 0x1B, 0x42, 0x1F]);
    }

    #[test]
    fn test_qos_profile_range() {
        assert!(qos_profile_ie(8, 0, 0, 0, 0).is_err());
    }
}

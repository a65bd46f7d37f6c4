//! PFCP Types
//!
//! Value enumerations and constants for PFCP as specified in 3GPP TS 29.244.

use crate::error::PfcpError;

/// PFCP Version
pub const PFCP_VERSION: u64 = 1;

/// PFCP UDP port (8805)
pub const PFCP_UDP_PORT: u16 = 8805;

/// PFCP Cause Values (TS 29.244 Section 8.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PfcpCause {
    RequestAccepted = 1,
    MoreUsageReportToSend = 2,
    RequestRejected = 64,
    SessionContextNotFound = 65,
    MandatoryIeMissing = 66,
    ConditionalIeMissing = 67,
    InvalidLength = 68,
    MandatoryIeIncorrect = 69,
    InvalidForwardingPolicy = 70,
    InvalidFTeidAllocationOption = 71,
    NoEstablishedPfcpAssociation = 72,
    RuleCreationModificationFailure = 73,
    PfcpEntityInCongestion = 74,
    NoResourcesAvailable = 75,
    ServiceNotSupported = 76,
    SystemFailure = 77,
}

impl TryFrom<u8> for PfcpCause {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::RequestAccepted),
            2 => Ok(Self::MoreUsageReportToSend),
            64 => Ok(Self::RequestRejected),
            65 => Ok(Self::SessionContextNotFound),
            66 => Ok(Self::MandatoryIeMissing),
            67 => Ok(Self::ConditionalIeMissing),
            68 => Ok(Self::InvalidLength),
            69 => Ok(Self::MandatoryIeIncorrect),
            70 => Ok(Self::InvalidForwardingPolicy),
            71 => Ok(Self::InvalidFTeidAllocationOption),
            72 => Ok(Self::NoEstablishedPfcpAssociation),
            73 => Ok(Self::RuleCreationModificationFailure),
            74 => Ok(Self::PfcpEntityInCongestion),
            75 => Ok(Self::NoResourcesAvailable),
            76 => Ok(Self::ServiceNotSupported),
            77 => Ok(Self::SystemFailure),
            _ => Err(PfcpError::InvalidCause(value)),
        }
    }
}

impl PfcpCause {
    /// Get the name of the cause
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestAccepted => "Request Accepted",
            Self::MoreUsageReportToSend => "More Usage Report To Send",
            Self::RequestRejected => "Request Rejected",
            Self::SessionContextNotFound => "Session Context Not Found",
            Self::MandatoryIeMissing => "Mandatory IE Missing",
            Self::ConditionalIeMissing => "Conditional IE Missing",
            Self::InvalidLength => "Invalid Length",
            Self::MandatoryIeIncorrect => "Mandatory IE Incorrect",
            Self::InvalidForwardingPolicy => "Invalid Forwarding Policy",
            Self::InvalidFTeidAllocationOption => "Invalid F-TEID Allocation Option",
            Self::NoEstablishedPfcpAssociation => "No Established PFCP Association",
            Self::RuleCreationModificationFailure => "Rule Creation/Modification Failure",
            Self::PfcpEntityInCongestion => "PFCP Entity in Congestion",
            Self::NoResourcesAvailable => "No Resources Available",
            Self::ServiceNotSupported => "Service Not Supported",
            Self::SystemFailure => "System Failure",
        }
    }

    /// Check if cause indicates success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::RequestAccepted | Self::MoreUsageReportToSend)
    }
}

/// Source Interface values (TS 29.244 Section 8.2.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SourceInterface {
    #[default]
    Access = 0,
    Core = 1,
    SgiLanN6Lan = 2,
    CpFunction = 3,
    FiveGVnInternal = 4,
}

impl TryFrom<u8> for SourceInterface {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Access),
            1 => Ok(Self::Core),
            2 => Ok(Self::SgiLanN6Lan),
            3 => Ok(Self::CpFunction),
            4 => Ok(Self::FiveGVnInternal),
            _ => Err(PfcpError::InvalidInterfaceType(value)),
        }
    }
}

/// Destination Interface values (TS 29.244 Section 8.2.24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DestinationInterface {
    #[default]
    Access = 0,
    Core = 1,
    SgiLanN6Lan = 2,
    CpFunction = 3,
    LiFunction = 4,
    FiveGVnInternal = 5,
}

impl TryFrom<u8> for DestinationInterface {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Access),
            1 => Ok(Self::Core),
            2 => Ok(Self::SgiLanN6Lan),
            3 => Ok(Self::CpFunction),
            4 => Ok(Self::LiFunction),
            5 => Ok(Self::FiveGVnInternal),
            _ => Err(PfcpError::InvalidInterfaceType(value)),
        }
    }
}

/// Node ID Type values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeIdType {
    Ipv4 = 0,
    Ipv6 = 1,
    Fqdn = 2,
}

impl TryFrom<u8> for NodeIdType {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Ipv4),
            1 => Ok(Self::Ipv6),
            2 => Ok(Self::Fqdn),
            _ => Err(PfcpError::InvalidNodeIdType(value)),
        }
    }
}

/// Outer Header Removal description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OuterHeaderRemovalDescription {
    #[default]
    GtpUUdpIpv4 = 0,
    GtpUUdpIpv6 = 1,
    UdpIpv4 = 2,
    UdpIpv6 = 3,
    Ipv4 = 4,
    Ipv6 = 5,
    GtpUUdpIp = 6,
    VlanSTag = 7,
    STagAndCTag = 8,
}

// Apply Action flags (TS 29.244 Section 8.2.26)
pub const APPLY_ACTION_DROP: u64 = 0x01;
pub const APPLY_ACTION_FORW: u64 = 0x02;
pub const APPLY_ACTION_BUFF: u64 = 0x04;
pub const APPLY_ACTION_NOCP: u64 = 0x08;
pub const APPLY_ACTION_DUPL: u64 = 0x10;

// F-TEID flags (TS 29.244 Section 8.2.3)
pub const F_TEID_V4: u64 = 0x01;
pub const F_TEID_V6: u64 = 0x02;
pub const F_TEID_CH: u64 = 0x04;
pub const F_TEID_CHID: u64 = 0x08;

// Outer Header Creation description bits (TS 29.244 Section 8.2.56)
pub const OHC_GTPU_UDP_IPV4: u64 = 0x0100;
pub const OHC_GTPU_UDP_IPV6: u64 = 0x0200;
pub const OHC_UDP_IPV4: u64 = 0x0400;
pub const OHC_UDP_IPV6: u64 = 0x0800;
pub const OHC_IPV4: u64 = 0x1000;
pub const OHC_IPV6: u64 = 0x2000;
pub const OHC_C_TAG: u64 = 0x4000;
pub const OHC_S_TAG: u64 = 0x8000;
pub const OHC_N19: u64 = 0x0001;
pub const OHC_N6: u64 = 0x0002;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_conversion() {
        let cause = PfcpCause::try_from(1).unwrap();
        assert!(cause.is_success());
        assert_eq!(cause.name(), "Request Accepted");
        assert!(!PfcpCause::MandatoryIeMissing.is_success());
        assert!(matches!(
            PfcpCause::try_from(3),
            Err(PfcpError::InvalidCause(3))
        ));
    }

    #[test]
    fn test_interface_conversion() {
        assert_eq!(SourceInterface::try_from(1).unwrap(), SourceInterface::Core);
        assert_eq!(
            DestinationInterface::try_from(4).unwrap(),
            DestinationInterface::LiFunction
        );
        assert!(SourceInterface::try_from(5).is_err());
        assert!(NodeIdType::try_from(3).is_err());
    }
}

//! GTPv2 Types
//!
//! Value enumerations carried inside GTPv2-C IEs (3GPP TS 29.274 section 8).

use crate::error::GtpError;

/// Cause values (TS 29.274 Section 8.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2Cause {
    LocalDetach = 2,
    CompleteDetach = 3,
    ReactivationRequested = 8,
    PdnConnectionInactivityTimerExpires = 11,
    RequestAccepted = 16,
    RequestAcceptedPartially = 17,
    NewPdnTypeDueToNetworkPreference = 18,
    NewPdnTypeDueToSingleAddressBearerOnly = 19,
    ContextNotFound = 64,
    InvalidMessageFormat = 65,
    VersionNotSupportedByNextPeer = 66,
    InvalidLength = 67,
    ServiceNotSupported = 68,
    MandatoryIeIncorrect = 69,
    MandatoryIeMissing = 70,
    SystemFailure = 72,
    NoResourcesAvailable = 73,
    MissingOrUnknownApn = 78,
    PreferredPdnTypeNotSupported = 83,
    AllDynamicAddressesAreOccupied = 84,
    UeNotResponding = 87,
    RequestRejectedReasonNotSpecified = 94,
    RemotePeerNotResponding = 100,
    ConditionalIeMissing = 103,
}

impl TryFrom<u8> for Gtp2Cause {
    type Error = GtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::LocalDetach),
            3 => Ok(Self::CompleteDetach),
            8 => Ok(Self::ReactivationRequested),
            11 => Ok(Self::PdnConnectionInactivityTimerExpires),
            16 => Ok(Self::RequestAccepted),
            17 => Ok(Self::RequestAcceptedPartially),
            18 => Ok(Self::NewPdnTypeDueToNetworkPreference),
            19 => Ok(Self::NewPdnTypeDueToSingleAddressBearerOnly),
            64 => Ok(Self::ContextNotFound),
            65 => Ok(Self::InvalidMessageFormat),
            66 => Ok(Self::VersionNotSupportedByNextPeer),
            67 => Ok(Self::InvalidLength),
            68 => Ok(Self::ServiceNotSupported),
            69 => Ok(Self::MandatoryIeIncorrect),
            70 => Ok(Self::MandatoryIeMissing),
            72 => Ok(Self::SystemFailure),
            73 => Ok(Self::NoResourcesAvailable),
            78 => Ok(Self::MissingOrUnknownApn),
            83 => Ok(Self::PreferredPdnTypeNotSupported),
            84 => Ok(Self::AllDynamicAddressesAreOccupied),
            87 => Ok(Self::UeNotResponding),
            94 => Ok(Self::RequestRejectedReasonNotSpecified),
            100 => Ok(Self::RemotePeerNotResponding),
            103 => Ok(Self::ConditionalIeMissing),
            _ => Err(GtpError::InvalidCause(value)),
        }
    }
}

impl Gtp2Cause {
    /// Check if cause indicates success
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Gtp2Cause::RequestAccepted
                | Gtp2Cause::RequestAcceptedPartially
                | Gtp2Cause::NewPdnTypeDueToNetworkPreference
                | Gtp2Cause::NewPdnTypeDueToSingleAddressBearerOnly
        )
    }
}

/// RAT Type values (TS 29.274 Section 8.17)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2RatType {
    Utran = 1,
    Geran = 2,
    Wlan = 3,
    Gan = 4,
    HspaEvolution = 5,
    Eutran = 6,
    Virtual = 7,
    EutranNbIot = 8,
}

/// PDN Type values (TS 29.274 Section 8.34)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2PdnType {
    Ipv4 = 1,
    Ipv6 = 2,
    Ipv4v6 = 3,
    NonIp = 4,
    Ethernet = 5,
}

/// F-TEID interface types (TS 29.274 Section 8.22)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gtp2FTeidInterfaceType {
    S1uEnodebGtpU = 0,
    S1uSgwGtpU = 1,
    S12RncGtpU = 2,
    S12SgwGtpU = 3,
    S5S8SgwGtpU = 4,
    S5S8PgwGtpU = 5,
    S5S8SgwGtpC = 6,
    S5S8PgwGtpC = 7,
    S11MmeGtpC = 10,
    S11S4SgwGtpC = 11,
    S4SgsnGtpU = 15,
    S4SgwGtpU = 16,
    S2bUEpdgGtpU = 31,
}

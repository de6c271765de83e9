//! The DHCP message type option (code 53).

use std::fmt;

/// The DHCP message type from RFC 2131. BSDP traffic uses `DhcpInform`
/// for requests and `DhcpAck` for replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Undefined = 0,
    DhcpDiscover = 1,
    DhcpOffer = 2,
    DhcpRequest = 3,
    DhcpDecline = 4,
    DhcpAck = 5,
    DhcpNak = 6,
    DhcpRelease = 7,
    DhcpInform = 8,
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        use self::MessageType::*;
        match value {
            1 => DhcpDiscover,
            2 => DhcpOffer,
            3 => DhcpRequest,
            4 => DhcpDecline,
            5 => DhcpAck,
            6 => DhcpNak,
            7 => DhcpRelease,
            8 => DhcpInform,
            _ => Undefined,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::MessageType::*;
        match self {
            Undefined => write!(f, "UNDEFINED"),
            DhcpDiscover => write!(f, "DHCPDISCOVER"),
            DhcpOffer => write!(f, "DHCPOFFER"),
            DhcpRequest => write!(f, "DHCPREQUEST"),
            DhcpDecline => write!(f, "DHCPDECLINE"),
            DhcpAck => write!(f, "DHCPACK"),
            DhcpNak => write!(f, "DHCPNAK"),
            DhcpRelease => write!(f, "DHCPRELEASE"),
            DhcpInform => write!(f, "DHCPINFORM"),
        }
    }
}

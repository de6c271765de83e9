//! The outer option codes the server reads and writes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionTag {
    RootPath = 17,
    VendorSpecific = 43,
    DhcpMessageType = 53,
    DhcpServerId = 54,
    ClassId = 60,
    TftpServerName = 66,
    End = 255,
}

impl fmt::Display for OptionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::OptionTag::*;
        match self {
            RootPath => write!(f, "Root Path"),
            VendorSpecific => write!(f, "Vendor Specific Information"),
            DhcpMessageType => write!(f, "DHCP Message Type"),
            DhcpServerId => write!(f, "DHCP Server Identifier"),
            ClassId => write!(f, "Class Identifier"),
            TftpServerName => write!(f, "TFTP Server Name"),
            End => write!(f, "End"),
        }
    }
}

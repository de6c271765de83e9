//! The BOOTP hardware type.

use std::fmt;

/// Only MAC-48 is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareType {
    Undefined = 0,
    Ethernet,
}

impl From<u8> for HardwareType {
    fn from(value: u8) -> Self {
        use self::HardwareType::*;
        match value {
            1 => Ethernet,

            _ => Undefined,
        }
    }
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::HardwareType::*;
        match self {
            Ethernet => write!(f, "Ethernet"),

            Undefined => write!(f, "UNDEFINED"),
        }
    }
}

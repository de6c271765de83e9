//! The BSDP (Boot Service Discovery Protocol) wire library.
//!
//! BSDP rides on top of BOOTP/DHCP: a fixed-layout header, an option area
//! behind the magic cookie, and the vendor-specific option 43 carrying a
//! second code/length/value table with the boot service payload.

pub mod constants;
pub mod image;
pub mod message;
pub mod options;
pub mod vendor;

mod error;

pub use self::{
    error::Error,
    image::{ImageFilter, ImageKind, ImageRef},
    message::{HardwareType, Message, OperationCode},
    options::{DhcpOption, DhcpOptionRegistry, MessageType, OptionTable, OptionTag},
    vendor::{BootImageListEntry, BsdpMessageType, BsdpOption, BsdpOptionTag, OptionRegistry},
};

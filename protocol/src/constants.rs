//! The message format constants.

/// The size of the fixed part of the message, the magic cookie included.
pub const SIZE_MESSAGE_MINIMAL: usize = OFFSET_OPTIONS;

pub const SIZE_HARDWARE_ADDRESS: usize = 16;
pub const SIZE_SERVER_NAME: usize = 64;
pub const SIZE_BOOT_FILENAME: usize = 128;

/// The size of an option code byte with its length byte.
pub const SIZE_OPTION_PREFIX: usize = 2;
/// The biggest payload a single length byte can describe.
pub const SIZE_OPTION_PAYLOAD_MAX: usize = 255;

/// The wire budget of the encapsulated vendor option table.
pub const SIZE_VENDOR_OPTIONS: usize = 255;
/// The wire budget of the outer option area, the magic cookie included.
pub const SIZE_OPTION_AREA: usize = 311;
pub const SIZE_MAGIC_COOKIE: usize = 4;

pub const OFFSET_MAGIC_COOKIE: usize = 236;
pub const OFFSET_OPTIONS: usize = 240;

pub const MAGIC_COOKIE: u32 = 0x6382_5363;
pub const END_OPTION: u8 = 255;

pub const PORT_SERVER: u16 = 67;
pub const PORT_CLIENT: u16 = 68;

/// The vendor class magic every BSDP message carries in option 60.
pub const VENDOR_CLASS_BSDP: &str = "AAPLBSDPC";

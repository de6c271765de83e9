//! The boot image identifier and its wire packing.

use std::fmt;

/// The size of a packed boot image identifier.
pub const SIZE_IMAGE_REF: usize = 4;
/// The size of a packed image attribute filter entry.
pub const SIZE_IMAGE_FILTER: usize = 2;

const FLAG_INSTALL: u8 = 0x80;
const MASK_KIND: u8 = 0x7f;

/// The boot image kind, carried in the low seven bits of the attribute byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    MacOs9 = 0x00,
    MacOsX = 0x01,
    MacOsXServer = 0x02,
    HardwareDiagnostics = 0x03,
    EfiProgram = 0x0d,
}

impl ImageKind {
    pub fn from_code(value: u8) -> Option<Self> {
        use self::ImageKind::*;
        match value {
            0x00 => Some(MacOs9),
            0x01 => Some(MacOsX),
            0x02 => Some(MacOsXServer),
            0x03 => Some(HardwareDiagnostics),
            0x0d => Some(EfiProgram),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ImageKind::*;
        match self {
            MacOs9 => write!(f, "Mac OS 9"),
            MacOsX => write!(f, "Mac OS X"),
            MacOsXServer => write!(f, "Mac OS X Server"),
            HardwareDiagnostics => write!(f, "hardware diagnostics"),
            EfiProgram => write!(f, "EFI program"),
        }
    }
}

/// A boot image identifier.
///
/// Packs to four bytes: the attribute byte (install flag and kind), a zero
/// byte, and the big-endian image index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef {
    pub install: bool,
    pub kind: ImageKind,
    pub index: u16,
}

impl ImageRef {
    pub fn to_bytes(&self) -> [u8; SIZE_IMAGE_REF] {
        let [high, low] = self.index.to_be_bytes();
        [attribute_byte(self.install, self.kind), 0x00, high, low]
    }

    /// Unpacks an identifier. `None` for an unknown image kind.
    pub fn from_bytes(src: &[u8; SIZE_IMAGE_REF]) -> Option<Self> {
        let (install, kind) = split_attribute_byte(src[0])?;
        Some(ImageRef {
            install,
            kind,
            index: u16::from_be_bytes([src[2], src[3]]),
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} #{}",
            if self.install { "install" } else { "netboot" },
            self.kind,
            self.index,
        )
    }
}

/// An image attribute filter entry: the attribute byte and a zero byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFilter {
    pub install: bool,
    pub kind: ImageKind,
}

impl ImageFilter {
    pub fn to_bytes(&self) -> [u8; SIZE_IMAGE_FILTER] {
        [attribute_byte(self.install, self.kind), 0x00]
    }

    pub fn from_bytes(src: &[u8; SIZE_IMAGE_FILTER]) -> Option<Self> {
        let (install, kind) = split_attribute_byte(src[0])?;
        Some(ImageFilter { install, kind })
    }
}

fn attribute_byte(install: bool, kind: ImageKind) -> u8 {
    (if install { FLAG_INSTALL } else { 0x00 }) | kind as u8
}

fn split_attribute_byte(value: u8) -> Option<(bool, ImageKind)> {
    let install = value & FLAG_INSTALL != 0;
    let kind = ImageKind::from_code(value & MASK_KIND)?;
    Some((install, kind))
}

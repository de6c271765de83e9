//! The message deserialization module.

use std::{io, net::Ipv4Addr};

use bytes::Buf;
use eui48::{MacAddress, EUI48LEN};

use super::Message;
use crate::{
    constants::*,
    options::{OptionTable, OptionTag},
    Error,
};

impl Message {
    /// Parses a message from a datagram.
    ///
    /// The fixed header is read by offsets, then the outer option table,
    /// then the vendor table from option 43. Option 43 is removed from
    /// the outer table after unwrapping so a message never carries the
    /// vendor payload twice.
    pub fn from_bytes(src: &[u8]) -> Result<Self, Error> {
        if src.len() < SIZE_MESSAGE_MINIMAL {
            return Err(Error::PacketTooSmall {
                len: src.len(),
                min: SIZE_MESSAGE_MINIMAL,
            });
        }

        let mut cursor = io::Cursor::new(src);
        let operation_code = cursor.get_u8().into();
        let hardware_type = cursor.get_u8().into();
        let hardware_address_length = cursor.get_u8();
        let hops = cursor.get_u8();
        let transaction_id = cursor.get_u32();
        let seconds = cursor.get_u16();
        let flags = cursor.get_u16();
        let client_ip_address = Ipv4Addr::from(cursor.get_u32());
        let your_ip_address = Ipv4Addr::from(cursor.get_u32());
        let server_ip_address = Ipv4Addr::from(cursor.get_u32());
        let gateway_ip_address = Ipv4Addr::from(cursor.get_u32());

        let mut hardware_address = [0u8; SIZE_HARDWARE_ADDRESS];
        cursor.copy_to_slice(&mut hardware_address);
        let mut eui = [0u8; EUI48LEN];
        eui.copy_from_slice(&hardware_address[..EUI48LEN]);
        let client_hardware_address = MacAddress::new(eui);

        let mut server_name_bytes = [0u8; SIZE_SERVER_NAME];
        cursor.copy_to_slice(&mut server_name_bytes);
        let server_name = fixed_field_to_string("sname", &server_name_bytes)?;

        let mut boot_filename_bytes = [0u8; SIZE_BOOT_FILENAME];
        cursor.copy_to_slice(&mut boot_filename_bytes);
        let boot_filename = fixed_field_to_string("file", &boot_filename_bytes)?;

        let magic_cookie = cursor.get_u32();
        if magic_cookie != MAGIC_COOKIE {
            return Err(Error::InvalidMagicCookie {
                value: magic_cookie,
            });
        }

        let mut options = OptionTable::from_bytes(&src[OFFSET_OPTIONS..])?;
        let vendor_options = match options.remove(OptionTag::VendorSpecific as u8) {
            Some(payload) => OptionTable::from_bytes(&payload)?,
            None => OptionTable::new(),
        };

        Ok(Message {
            operation_code,
            hardware_type,
            hardware_address_length,
            hops,
            transaction_id,
            seconds,
            flags,
            client_ip_address,
            your_ip_address,
            server_ip_address,
            gateway_ip_address,
            client_hardware_address,
            server_name,
            boot_filename,
            options,
            vendor_options,
        })
    }
}

/// Interprets a zero or space padded fixed field as ASCII text.
fn fixed_field_to_string(field: &'static str, bytes: &[u8]) -> Result<String, Error> {
    let end = bytes
        .iter()
        .rposition(|&byte| byte != 0x00 && byte != b' ')
        .map_or(0, |position| position + 1);
    let bytes = &bytes[..end];
    if !bytes.is_ascii() {
        return Err(Error::NotAscii { field });
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

//! The message serialization module.

use bytes::BufMut;

use super::Message;
use crate::{
    constants::*,
    options::OptionTag,
    Error,
};

impl Message {
    /// Serializes the message into a fresh buffer.
    ///
    /// The vendor table is encoded first, with its own end option, and
    /// installed under option 43. The outer option area is checked
    /// against its wire budget, the magic cookie included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let vendor = self.vendor_options.to_bytes(SIZE_VENDOR_OPTIONS)?;
        let mut options = self.options.clone();
        options.insert(OptionTag::VendorSpecific as u8, vendor);
        let options_bytes = options.to_bytes(SIZE_OPTION_AREA - SIZE_MAGIC_COOKIE)?;

        let mut buffer = Vec::with_capacity(SIZE_MESSAGE_MINIMAL + options_bytes.len());
        buffer.put_u8(self.operation_code as u8);
        buffer.put_u8(self.hardware_type as u8);
        buffer.put_u8(self.hardware_address_length);
        buffer.put_u8(self.hops);
        buffer.put_u32(self.transaction_id);
        buffer.put_u16(self.seconds);
        buffer.put_u16(self.flags);
        buffer.put_u32(u32::from(self.client_ip_address));
        buffer.put_u32(u32::from(self.your_ip_address));
        buffer.put_u32(u32::from(self.server_ip_address));
        buffer.put_u32(u32::from(self.gateway_ip_address));

        let hardware_address = self.client_hardware_address.as_bytes();
        buffer.put_slice(hardware_address);
        buffer.put_bytes(0x00, SIZE_HARDWARE_ADDRESS - hardware_address.len());

        buffer.put_slice(self.server_name().as_bytes());
        buffer.put_bytes(0x00, SIZE_SERVER_NAME - self.server_name().len());
        buffer.put_slice(self.boot_filename().as_bytes());
        buffer.put_bytes(0x00, SIZE_BOOT_FILENAME - self.boot_filename().len());

        buffer.put_u32(MAGIC_COOKIE);
        buffer.put_slice(&options_bytes);

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use eui48::MacAddress;

    use crate::{
        image::{ImageKind, ImageRef},
        message::{HardwareType, Message, OperationCode},
        options::{MessageType, OptionTable},
        vendor::{BsdpMessageType, BsdpOption},
        Error,
    };

    use super::*;

    fn sample_message() -> Message {
        let mut message = Message::new();
        message.operation_code = OperationCode::BootRequest;
        message.hardware_type = HardwareType::Ethernet;
        message.transaction_id = 0xdead_beef;
        message.seconds = 7;
        message.flags = 0x8000;
        message.client_ip_address = Ipv4Addr::new(10, 0, 0, 42);
        message.gateway_ip_address = Ipv4Addr::new(10, 0, 0, 254);
        message.client_hardware_address =
            MacAddress::new([0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9b]);
        message.set_server_name("netboot").unwrap();
        message.set_boot_filename("apple/image.nbi/i386/booter").unwrap();
        message.set_dhcp_message_type(MessageType::DhcpInform);
        message.set_vendor_class("AAPLBSDPC/i386/iMac8,1");
        message
            .set_bsdp_option(&BsdpOption::MessageType(BsdpMessageType::Select))
            .unwrap();
        message
            .set_bsdp_option(&BsdpOption::Version { major: 1, minor: 1 })
            .unwrap();
        message
            .set_bsdp_option(&BsdpOption::SelectedBootImageId(ImageRef {
                install: false,
                kind: ImageKind::MacOsX,
                index: 3,
            }))
            .unwrap();
        message
    }

    #[test]
    fn round_trip() {
        let message = sample_message();
        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn fixed_header_layout() {
        let message = sample_message();
        let bytes = message.to_bytes().unwrap();
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[1], 0x01);
        assert_eq!(bytes[2], 6);
        assert_eq!(&bytes[4..8], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&bytes[10..12], &[0x80, 0x00]);
        assert_eq!(&bytes[28..34], &[0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9b]);
        assert_eq!(&bytes[44..51], b"netboot");
        assert_eq!(bytes[51], 0x00);
        assert_eq!(
            &bytes[OFFSET_MAGIC_COOKIE..OFFSET_OPTIONS],
            &[0x63, 0x82, 0x53, 0x63],
        );
    }

    #[test]
    fn vendor_table_travels_in_option_43() {
        let message = sample_message();
        let bytes = message.to_bytes().unwrap();
        let raw = OptionTable::from_bytes(&bytes[OFFSET_OPTIONS..]).unwrap();
        let vendor = raw.get(OptionTag::VendorSpecific as u8).unwrap();
        let vendor_table = OptionTable::from_bytes(vendor).unwrap();
        assert_eq!(vendor_table, message.vendor_options);
    }

    #[test]
    fn too_small_packets_are_rejected() {
        match Message::from_bytes(&[0u8; 100]) {
            Err(Error::PacketTooSmall { len: 100, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wrong_magic_cookie_is_rejected() {
        let mut bytes = sample_message().to_bytes().unwrap();
        bytes[OFFSET_MAGIC_COOKIE] = 0x00;
        match Message::from_bytes(&bytes) {
            Err(Error::InvalidMagicCookie { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn oversized_option_area_is_rejected() {
        let mut message = sample_message();
        message.options.insert(6, vec![0u8; 200]);
        message.options.insert(12, vec![0u8; 110]);
        match message.to_bytes() {
            Err(Error::OptionTooLarge { budget, .. }) => {
                assert_eq!(budget, SIZE_OPTION_AREA - SIZE_MAGIC_COOKIE)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

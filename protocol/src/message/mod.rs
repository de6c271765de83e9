//! The main BSDP message module.

pub mod hardware_type;
pub mod operation_code;

mod deserializer;
mod serializer;

use std::{fmt, net::Ipv4Addr};

use eui48::MacAddress;

use crate::{
    constants::*,
    options::{DhcpOption, MessageType, OptionTable, OptionTag},
    vendor::{BsdpOption, BsdpOptionTag, OptionRegistry},
    Error,
};

pub use self::{hardware_type::HardwareType, operation_code::OperationCode};

/// A BSDP message.
///
/// The fixed BOOTP header, the outer option table and the vendor option
/// table from option 43. The two fixed-size name fields are kept private
/// so their length limits hold by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub operation_code: OperationCode,
    pub hardware_type: HardwareType,
    pub hardware_address_length: u8,
    pub hops: u8,
    pub transaction_id: u32,
    pub seconds: u16,
    pub flags: u16,
    pub client_ip_address: Ipv4Addr,
    pub your_ip_address: Ipv4Addr,
    pub server_ip_address: Ipv4Addr,
    pub gateway_ip_address: Ipv4Addr,
    pub client_hardware_address: MacAddress,
    server_name: String,
    boot_filename: String,
    pub options: OptionTable,
    pub vendor_options: OptionTable,
}

impl Message {
    /// An empty message carrying the BSDP vendor class in option 60.
    pub fn new() -> Self {
        let mut options = OptionTable::new();
        options.insert(
            OptionTag::ClassId as u8,
            VENDOR_CLASS_BSDP.as_bytes().to_vec(),
        );
        Message {
            operation_code: OperationCode::BootRequest,
            hardware_type: HardwareType::Ethernet,
            hardware_address_length: eui48::EUI48LEN as u8,
            hops: 0,
            transaction_id: 0,
            seconds: 0,
            flags: 0,
            client_ip_address: Ipv4Addr::UNSPECIFIED,
            your_ip_address: Ipv4Addr::UNSPECIFIED,
            server_ip_address: Ipv4Addr::UNSPECIFIED,
            gateway_ip_address: Ipv4Addr::UNSPECIFIED,
            client_hardware_address: MacAddress::nil(),
            server_name: String::new(),
            boot_filename: String::new(),
            options,
            vendor_options: OptionTable::new(),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Sets the `sname` field. ASCII, at most 64 bytes.
    pub fn set_server_name(&mut self, server_name: &str) -> Result<(), Error> {
        self.server_name = check_fixed_field("sname", server_name, SIZE_SERVER_NAME)?;
        Ok(())
    }

    pub fn boot_filename(&self) -> &str {
        &self.boot_filename
    }

    /// Sets the `file` field. ASCII, at most 128 bytes.
    pub fn set_boot_filename(&mut self, boot_filename: &str) -> Result<(), Error> {
        self.boot_filename = check_fixed_field("file", boot_filename, SIZE_BOOT_FILENAME)?;
        Ok(())
    }

    pub fn dhcp_message_type(&self) -> Option<MessageType> {
        let payload = self.options.get(OptionTag::DhcpMessageType as u8)?;
        if payload.len() != 1 {
            return None;
        }
        Some(MessageType::from(payload[0]))
    }

    pub fn set_dhcp_message_type(&mut self, message_type: MessageType) {
        self.options
            .insert(OptionTag::DhcpMessageType as u8, vec![message_type as u8]);
    }

    pub fn set_dhcp_server_id(&mut self, address: Ipv4Addr) {
        self.options
            .insert(OptionTag::DhcpServerId as u8, address.octets().to_vec());
    }

    /// The raw vendor class from option 60.
    pub fn vendor_class(&self) -> Option<&str> {
        let payload = self.options.get(OptionTag::ClassId as u8)?;
        std::str::from_utf8(payload).ok()
    }

    pub fn set_vendor_class(&mut self, class: &str) {
        self.options
            .insert(OptionTag::ClassId as u8, class.as_bytes().to_vec());
    }

    pub fn set_dhcp_option(&mut self, option: &DhcpOption) {
        self.options
            .insert(option.tag() as u8, option.to_payload());
    }

    pub fn has_bsdp_option(&self, tag: BsdpOptionTag) -> bool {
        self.vendor_options.contains(tag as u8)
    }

    /// Decodes a vendor option through the registry.
    pub fn bsdp_option(
        &self,
        registry: &OptionRegistry,
        tag: BsdpOptionTag,
    ) -> Result<Option<BsdpOption>, Error> {
        match self.vendor_options.get(tag as u8) {
            Some(payload) => registry.decode(tag as u8, payload),
            None => Ok(None),
        }
    }

    pub fn set_bsdp_option(&mut self, option: &BsdpOption) -> Result<(), Error> {
        self.vendor_options
            .insert(option.tag() as u8, option.to_payload()?);
        Ok(())
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

fn check_fixed_field(field: &'static str, value: &str, max: usize) -> Result<String, Error> {
    if !value.is_ascii() {
        return Err(Error::NotAscii { field });
    }
    if value.len() > max {
        return Err(Error::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(value.to_owned())
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} xid={:#010x} chaddr={} ciaddr={}",
            self.operation_code,
            self.transaction_id,
            self.client_hardware_address.to_hex_string(),
            self.client_ip_address,
        )?;
        if let Some(message_type) = self.dhcp_message_type() {
            write!(f, " {}", message_type)?;
        }
        let vendor_codes: Vec<u8> = self.vendor_options.iter().map(|(code, _)| code).collect();
        if !vendor_codes.is_empty() {
            write!(f, " vendor options {:?}", vendor_codes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::BsdpMessageType;

    #[test]
    fn new_message_carries_the_vendor_class() {
        assert_eq!(Message::new().vendor_class(), Some(VENDOR_CLASS_BSDP));
    }

    #[test]
    fn fixed_fields_enforce_their_limits() {
        let mut message = Message::new();
        message.set_server_name("netboot-server").unwrap();
        assert_eq!(message.server_name(), "netboot-server");

        let overlong = "x".repeat(SIZE_SERVER_NAME + 1);
        assert_eq!(
            message.set_server_name(&overlong),
            Err(Error::FieldTooLong {
                field: "sname",
                len: SIZE_SERVER_NAME + 1,
                max: SIZE_SERVER_NAME,
            }),
        );

        let overlong = "x".repeat(SIZE_BOOT_FILENAME + 1);
        assert_eq!(
            message.set_boot_filename(&overlong),
            Err(Error::FieldTooLong {
                field: "file",
                len: SIZE_BOOT_FILENAME + 1,
                max: SIZE_BOOT_FILENAME,
            }),
        );

        assert_eq!(
            message.set_server_name("sérveur"),
            Err(Error::NotAscii { field: "sname" }),
        );
    }

    #[test]
    fn typed_accessors() {
        let mut message = Message::new();
        assert_eq!(message.dhcp_message_type(), None);

        message.set_dhcp_message_type(MessageType::DhcpInform);
        assert_eq!(message.dhcp_message_type(), Some(MessageType::DhcpInform));

        message
            .set_bsdp_option(&BsdpOption::MessageType(BsdpMessageType::List))
            .unwrap();
        assert!(message.has_bsdp_option(BsdpOptionTag::MessageType));

        let registry = OptionRegistry::bsdp().unwrap();
        assert_eq!(
            message
                .bsdp_option(&registry, BsdpOptionTag::MessageType)
                .unwrap(),
            Some(BsdpOption::MessageType(BsdpMessageType::List)),
        );
        assert_eq!(
            message
                .bsdp_option(&registry, BsdpOptionTag::ReplyPort)
                .unwrap(),
            None,
        );
    }
}

//! A builder for common BSDP server replies.

use std::net::Ipv4Addr;

use bsdp_protocol::{
    BsdpMessageType, BsdpOption, Message, MessageType, OperationCode,
};

/// The priority this server advertises in LIST replies.
pub const SERVER_PRIORITY: u16 = 500;

/// Builds the reply skeletons all flows share.
pub struct MessageBuilder {
    /// Sent to clients as `siaddr` and in both server identifier options.
    server_ip_address: Ipv4Addr,
}

impl MessageBuilder {
    pub fn new(server_ip_address: Ipv4Addr) -> Self {
        MessageBuilder { server_ip_address }
    }

    /// The shared reply shape: a `DHCPACK` echoing the request header.
    fn bootp_reply(&self, request: &Message) -> Message {
        let mut reply = Message::new();
        reply.operation_code = OperationCode::BootReply;
        reply.hardware_type = request.hardware_type;
        reply.hardware_address_length = request.hardware_address_length;
        reply.hops = request.hops;
        reply.transaction_id = request.transaction_id;
        reply.seconds = request.seconds;
        reply.flags = request.flags;
        reply.client_ip_address = request.client_ip_address;
        reply.your_ip_address = Ipv4Addr::UNSPECIFIED;
        reply.server_ip_address = self.server_ip_address;
        reply.gateway_ip_address = request.gateway_ip_address;
        reply.client_hardware_address = request.client_hardware_address;
        reply.set_dhcp_message_type(MessageType::DhcpAck);
        reply.set_dhcp_server_id(self.server_ip_address);
        reply
    }

    /// A LIST reply. The first packet of a round also announces the
    /// server priority.
    pub fn list_reply(
        &self,
        request: &Message,
        with_priority: bool,
    ) -> Result<Message, bsdp_protocol::Error> {
        let mut reply = self.bootp_reply(request);
        reply.set_bsdp_option(&BsdpOption::MessageType(BsdpMessageType::List))?;
        if with_priority {
            reply.set_bsdp_option(&BsdpOption::ServerPriority(SERVER_PRIORITY))?;
        }
        reply.set_bsdp_option(&BsdpOption::ServerId(self.server_ip_address))?;
        Ok(reply)
    }

    /// A SELECT acknowledgement skeleton.
    pub fn select_ack(&self, request: &Message) -> Result<Message, bsdp_protocol::Error> {
        let mut reply = self.bootp_reply(request);
        reply.set_bsdp_option(&BsdpOption::MessageType(BsdpMessageType::Select))?;
        Ok(reply)
    }

    /// A SELECT failure reply.
    pub fn select_failed(&self, request: &Message) -> Result<Message, bsdp_protocol::Error> {
        let mut reply = self.bootp_reply(request);
        reply.set_bsdp_option(&BsdpOption::MessageType(BsdpMessageType::Failed))?;
        Ok(reply)
    }
}

//! The LIST/SELECT response engine.

use std::net::{IpAddr, SocketAddr};

use bsdp_protocol::{
    constants::PORT_CLIENT, BootImageListEntry, BsdpMessageType, BsdpOption, BsdpOptionTag,
    DhcpOption, DhcpOptionRegistry, Message, MessageType, OptionRegistry,
};

use crate::{
    builder::MessageBuilder,
    catalog::{Arch, BootImage, ImageCatalog},
    settings::ServerConfig,
    Error,
};

/// Boot images announced in the first LIST packet besides the default.
const LIST_HEAD_EXTRA: usize = 1;
/// Boot images announced per follow-up LIST packet.
const LIST_CHUNK: usize = 2;

/// The parsed BSDP vendor class: `vendor/architecture/system-id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientClass {
    pub vendor: String,
    pub arch: Arch,
    pub system_id: String,
}

impl ClientClass {
    pub fn parse(class: &str) -> Result<Self, Error> {
        let unresolved = || Error::UnresolvedClientClass {
            class: class.to_owned(),
        };
        let mut fields = class.split('/');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(vendor), Some(arch), Some(system_id), None) => Ok(ClientClass {
                vendor: vendor.to_owned(),
                arch: Arch::from_class(arch).ok_or_else(unresolved)?,
                system_id: system_id.to_owned(),
            }),
            _ => Err(unresolved()),
        }
    }
}

/// Turns one request into the replies it deserves. Stateless between
/// datagrams apart from the selection storage behind the catalog.
pub struct ResponseEngine {
    settings: ServerConfig,
    catalog: ImageCatalog,
    registry: OptionRegistry,
    builder: MessageBuilder,
}

impl ResponseEngine {
    /// Builds the engine and its option registries. A registration
    /// conflict is reported here, before any traffic is served.
    pub fn new(settings: ServerConfig, catalog: ImageCatalog) -> Result<Self, Error> {
        let registry = OptionRegistry::bsdp()?;
        // Built for the same startup check; the decoders are looked up
        // per datagram through the vendor registry only.
        DhcpOptionRegistry::standard()?;
        let builder = MessageBuilder::new(settings.server_ip_address);
        Ok(ResponseEngine {
            settings,
            catalog,
            registry,
            builder,
        })
    }

    /// Dispatches a request.
    ///
    /// Only a `DHCPINFORM` carrying the BSDP version option is
    /// interesting; everything else produces no replies. An unresolvable
    /// vendor class is an error the caller logs and drops.
    pub fn handle(&self, request: &Message) -> Result<Vec<(SocketAddr, Message)>, Error> {
        if !request.has_bsdp_option(BsdpOptionTag::Version) {
            return Ok(Vec::new());
        }
        let message_type = match self.bsdp_message_type(request)? {
            Some(message_type) => message_type,
            None => return Ok(Vec::new()),
        };
        match (request.dhcp_message_type(), message_type) {
            (Some(MessageType::DhcpInform), BsdpMessageType::List) => self.handle_list(request),
            (Some(MessageType::DhcpInform), BsdpMessageType::Select) => self.handle_select(request),
            _ => Ok(Vec::new()),
        }
    }

    /// The LIST flow.
    ///
    /// The first packet announces the priority, the default image and at
    /// most one further candidate; the remaining candidates follow two
    /// per packet.
    fn handle_list(&self, request: &Message) -> Result<Vec<(SocketAddr, Message)>, Error> {
        let class = self.client_class(request)?;
        let destination = self.reply_destination(request)?;

        let mut candidates = match self.attribute_filters(request)? {
            Some(filters) => {
                self.catalog
                    .find_bootable_filtered(class.arch, &class.system_id, &filters)
            }
            None => self.catalog.find_bootable(class.arch, &class.system_id),
        };
        let default = self.catalog.last_selected(
            &request.client_hardware_address,
            class.arch,
            &class.system_id,
        );
        debug!(
            "LIST from {}: {} candidate(s), default {:?}",
            request.client_hardware_address.to_hex_string(),
            candidates.len(),
            default.map(|image| image.name.as_str()),
        );

        let mut replies = Vec::new();

        let mut head = self.builder.list_reply(request, true)?;
        let mut entries = Vec::new();
        if let Some(default) = default {
            head.set_bsdp_option(&BsdpOption::DefaultBootImageId(default.image_ref()))?;
            entries.push(list_entry(default));
            let default_ref = default.image_ref();
            candidates.retain(|image| image.image_ref() != default_ref);
        }
        let mut rest = candidates.into_iter();
        entries.extend(rest.by_ref().take(LIST_HEAD_EXTRA).map(list_entry));
        if !entries.is_empty() {
            head.set_bsdp_option(&BsdpOption::BootImageList(entries))?;
        }
        replies.push((destination, head));

        let rest: Vec<&BootImage> = rest.collect();
        for chunk in rest.chunks(LIST_CHUNK) {
            let mut reply = self.builder.list_reply(request, false)?;
            let entries = chunk.iter().copied().map(list_entry).collect();
            reply.set_bsdp_option(&BsdpOption::BootImageList(entries))?;
            replies.push((destination, reply));
        }
        Ok(replies)
    }

    /// The SELECT flow: acknowledge a bootable index, fail anything else.
    fn handle_select(&self, request: &Message) -> Result<Vec<(SocketAddr, Message)>, Error> {
        let class = self.client_class(request)?;
        let destination = self.reply_destination(request)?;
        let selected = match request.bsdp_option(&self.registry, BsdpOptionTag::SelectedBootImageId)?
        {
            Some(BsdpOption::SelectedBootImageId(id)) => id,
            _ => return Err(Error::MissingOption("Selected Boot Image ID")),
        };

        let bootable = self.catalog.find_bootable(class.arch, &class.system_id);
        match bootable
            .iter()
            .find(|image| image.index == selected.index)
        {
            Some(image) => self.select_ack(request, destination, image, class.arch),
            None => {
                info!(
                    "SELECT from {}: image #{} is not bootable, failing",
                    request.client_hardware_address.to_hex_string(),
                    selected.index,
                );
                let reply = self.builder.select_failed(request)?;
                Ok(vec![(destination, reply)])
            }
        }
    }

    fn select_ack(
        &self,
        request: &Message,
        destination: SocketAddr,
        image: &BootImage,
        arch: Arch,
    ) -> Result<Vec<(SocketAddr, Message)>, Error> {
        let client = &request.client_hardware_address;
        self.catalog.record_selection(client, image);

        let mut reply = self.builder.select_ack(request)?;
        reply.set_server_name(&self.settings.boot_server_name)?;
        reply.set_boot_filename(&self.settings.boot_file(image, arch))?;
        reply.set_bsdp_option(&BsdpOption::SelectedBootImageId(image.image_ref()))?;
        if let Some(root_path) = self.settings.root_path(image) {
            reply.set_dhcp_option(&DhcpOption::RootPath(root_path));
        }
        if image.supports_diskless {
            reply.set_bsdp_option(&BsdpOption::ShadowFilePath(
                self.settings.shadow_file_path(client),
            ))?;
            reply.set_bsdp_option(&BsdpOption::ShadowMountPath(
                self.settings.shadow_mount_path.clone(),
            ))?;
            reply.set_bsdp_option(&BsdpOption::MachineName(
                self.settings.machine_name(client),
            ))?;
        }
        info!(
            "SELECT from {}: booting {} ({})",
            client.to_hex_string(),
            image.name,
            image.image_ref(),
        );
        Ok(vec![(destination, reply)])
    }

    fn client_class(&self, request: &Message) -> Result<ClientClass, Error> {
        let class = request
            .vendor_class()
            .ok_or_else(|| Error::UnresolvedClientClass {
                class: String::new(),
            })?;
        ClientClass::parse(class)
    }

    fn bsdp_message_type(&self, request: &Message) -> Result<Option<BsdpMessageType>, Error> {
        match request.bsdp_option(&self.registry, BsdpOptionTag::MessageType)? {
            Some(BsdpOption::MessageType(message_type)) => Ok(Some(message_type)),
            _ => Ok(None),
        }
    }

    fn attribute_filters(
        &self,
        request: &Message,
    ) -> Result<Option<Vec<bsdp_protocol::ImageFilter>>, Error> {
        match request.bsdp_option(&self.registry, BsdpOptionTag::AttributeFilterList)? {
            Some(BsdpOption::AttributeFilterList(filters)) => Ok(Some(filters)),
            _ => Ok(None),
        }
    }

    /// Replies go to `ciaddr`, on the requested privileged port or the
    /// well-known client port.
    fn reply_destination(&self, request: &Message) -> Result<SocketAddr, Error> {
        let port = match request.bsdp_option(&self.registry, BsdpOptionTag::ReplyPort)? {
            Some(BsdpOption::ReplyPort(port)) => port,
            _ => PORT_CLIENT,
        };
        Ok(SocketAddr::new(
            IpAddr::V4(request.client_ip_address),
            port,
        ))
    }
}

fn list_entry(image: &BootImage) -> BootImageListEntry {
    BootImageListEntry {
        id: image.image_ref(),
        description: image.description().to_owned(),
    }
}

//! The server configuration and the path synthesis derived from it.

use std::net::Ipv4Addr;

use eui48::MacAddress;

use crate::catalog::{Arch, BootImage, TransportType};

/// The image bundle suffix on every share.
const IMAGE_BUNDLE_SUFFIX: &str = ".nbi";

/// The static configuration of a running server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address advertised as the BSDP and DHCP server identifier
    /// and placed into `siaddr` of every reply.
    pub server_ip_address: Ipv4Addr,
    /// Advertised in the `sname` field of SELECT acknowledgements.
    pub boot_server_name: String,
    /// The TFTP path prefix of the boot file tree.
    pub boot_server_path: String,
    pub http_url: String,
    pub afp_url: String,
    pub nfs_url: String,
    /// The share diskless clients mount for their shadow files.
    pub shadow_mount_path: String,
}

impl ServerConfig {
    /// A configuration with the share layout the Apple tools produce,
    /// the boot server name defaulting to the local hostname.
    pub fn new(server_ip_address: Ipv4Addr) -> Self {
        let boot_server_name = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| server_ip_address.to_string());
        ServerConfig {
            server_ip_address,
            boot_server_name,
            boot_server_path: "apple".to_owned(),
            http_url: format!("http://{}/NetBootSP0", server_ip_address),
            afp_url: format!("afp://{}/NetBootSP0", server_ip_address),
            nfs_url: format!("nfs:{}:/srv/netboot/NetBootSP0", server_ip_address),
            shadow_mount_path: format!("afp://{}/NetBootClients0", server_ip_address),
        }
    }

    /// The TFTP boot file path of an image for one architecture.
    pub fn boot_file(&self, image: &BootImage, arch: Arch) -> String {
        format!(
            "{}/{}{}/{}/{}",
            self.boot_server_path, image.name, IMAGE_BUNDLE_SUFFIX, arch, image.boot_file,
        )
    }

    /// The root path URL of an image, `None` when the image is boot-file
    /// only or carries no root path. NFS URLs separate the share from
    /// the path with a colon, the others with a slash.
    pub fn root_path(&self, image: &BootImage) -> Option<String> {
        let (share, separator) = match image.transport {
            TransportType::ClassicAfp => (&self.afp_url, '/'),
            TransportType::Http => (&self.http_url, '/'),
            TransportType::Nfs => (&self.nfs_url, ':'),
            TransportType::BootFileOnly => return None,
        };
        let root_path = image.root_path.as_ref()?;
        Some(format!(
            "{}{}{}{}/{}",
            share, separator, image.name, IMAGE_BUNDLE_SUFFIX, root_path,
        ))
    }

    /// The per-client machine name, derived from the MAC address.
    pub fn machine_name(&self, client: &MacAddress) -> String {
        format!("mac-{}", client.to_hex_string().replace(':', "-"))
    }

    /// The shadow file path inside the shadow mount share.
    pub fn shadow_file_path(&self, client: &MacAddress) -> String {
        format!("{}/ShadowFile", self.machine_name(client))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bsdp_protocol::ImageKind;

    use super::*;

    fn config() -> ServerConfig {
        let mut config = ServerConfig::new(Ipv4Addr::new(10, 0, 0, 1));
        config.boot_server_name = "netboot".to_owned();
        config
    }

    fn image(transport: TransportType) -> BootImage {
        BootImage {
            name: "Leopard".to_owned(),
            description: String::new(),
            boot_file: "booter".to_owned(),
            root_path: Some("NetBoot.dmg".to_owned()),
            architectures: vec![Arch::I386],
            enabled_system_ids: HashSet::new(),
            disabled_system_ids: HashSet::new(),
            index: 1,
            kind: ImageKind::MacOsX,
            install: false,
            default: false,
            enabled: true,
            supports_diskless: false,
            transport,
            language: "Default".to_owned(),
            os_version: "10.5".to_owned(),
        }
    }

    #[test]
    fn boot_file_path() {
        assert_eq!(
            config().boot_file(&image(TransportType::Http), Arch::I386),
            "apple/Leopard.nbi/i386/booter",
        );
    }

    #[test]
    fn root_path_per_transport() {
        let config = config();
        assert_eq!(
            config.root_path(&image(TransportType::Http)).unwrap(),
            "http://10.0.0.1/NetBootSP0/Leopard.nbi/NetBoot.dmg",
        );
        assert_eq!(
            config.root_path(&image(TransportType::ClassicAfp)).unwrap(),
            "afp://10.0.0.1/NetBootSP0/Leopard.nbi/NetBoot.dmg",
        );
        assert_eq!(
            config.root_path(&image(TransportType::Nfs)).unwrap(),
            "nfs:10.0.0.1:/srv/netboot/NetBootSP0:Leopard.nbi/NetBoot.dmg",
        );
        assert_eq!(config.root_path(&image(TransportType::BootFileOnly)), None);
    }

    #[test]
    fn shadow_paths() {
        let config = config();
        let client = MacAddress::new([0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9b]);
        assert_eq!(config.machine_name(&client), "mac-00-17-f2-2a-05-9b");
        assert_eq!(
            config.shadow_file_path(&client),
            "mac-00-17-f2-2a-05-9b/ShadowFile",
        );
    }
}

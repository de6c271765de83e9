use std::{collections::HashSet, net::Ipv4Addr, sync::Arc, thread};

use bsdp_protocol::ImageKind;
use bsdp_server::{
    Arch, BootImage, ImageCatalog, RamSelectionStore, Server, ServerConfig, TransportType,
};

fn main() {
    env_logger::init();

    let mut enabled_system_ids = HashSet::new();
    enabled_system_ids.insert("iMac8,1".to_owned());
    enabled_system_ids.insert("MacBookPro5,1".to_owned());

    let leopard = BootImage {
        name: "Leopard".to_owned(),
        description: "Mac OS X 10.5 NetBoot".to_owned(),
        boot_file: "booter".to_owned(),
        root_path: Some("NetBoot.dmg".to_owned()),
        architectures: vec![Arch::I386],
        enabled_system_ids,
        disabled_system_ids: HashSet::new(),
        index: 1,
        kind: ImageKind::MacOsX,
        install: false,
        default: true,
        enabled: true,
        supports_diskless: true,
        transport: TransportType::Http,
        language: "Default".to_owned(),
        os_version: "10.5".to_owned(),
    };

    let catalog = ImageCatalog::new(vec![leopard], Arc::new(RamSelectionStore::new()));
    let settings = ServerConfig::new(Ipv4Addr::new(192, 168, 0, 12));

    let _handle = Server::new(settings, catalog).unwrap().spawn().unwrap();

    loop {
        thread::park();
    }
}

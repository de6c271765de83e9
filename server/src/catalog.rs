//! The boot image catalog.

use std::{collections::HashSet, fmt, sync::Arc};

use bsdp_protocol::{ImageFilter, ImageKind, ImageRef};
use eui48::MacAddress;

use crate::storage::SelectionStore;

/// The client CPU architecture as spelled in the BSDP vendor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    I386,
    Ppc,
    X86_64,
    Ia64,
}

impl Arch {
    /// The wire spelling, also used in boot file paths.
    pub fn as_str(&self) -> &'static str {
        use self::Arch::*;
        match self {
            I386 => "i386",
            Ppc => "ppc",
            X86_64 => "x86_64",
            Ia64 => "ia64",
        }
    }

    pub fn from_class(value: &str) -> Option<Self> {
        use self::Arch::*;
        match value {
            "i386" => Some(I386),
            "ppc" => Some(Ppc),
            "x86_64" => Some(X86_64),
            "ia64" => Some(Ia64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the client reaches the image root once booted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    Nfs,
    ClassicAfp,
    Http,
    /// The image has a boot file and nothing else.
    BootFileOnly,
}

/// One entry of the boot image catalog.
#[derive(Debug, Clone)]
pub struct BootImage {
    pub name: String,
    /// Shown in the client boot picker. Empty falls back to `name`.
    pub description: String,
    pub boot_file: String,
    pub root_path: Option<String>,
    pub architectures: Vec<Arch>,
    pub enabled_system_ids: HashSet<String>,
    pub disabled_system_ids: HashSet<String>,
    pub index: u16,
    pub kind: ImageKind,
    pub install: bool,
    pub default: bool,
    pub enabled: bool,
    pub supports_diskless: bool,
    pub transport: TransportType,
    pub language: String,
    pub os_version: String,
}

impl BootImage {
    /// The wire identity of the image.
    pub fn image_ref(&self) -> ImageRef {
        ImageRef {
            install: self.install,
            kind: self.kind,
            index: self.index,
        }
    }

    pub fn description(&self) -> &str {
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    /// Allows a system identifier, dropping it from the disabled set.
    pub fn allow_system_id(&mut self, system_id: &str) {
        self.disabled_system_ids.remove(system_id);
        self.enabled_system_ids.insert(system_id.to_owned());
    }

    /// Disables a system identifier, dropping it from the enabled set.
    pub fn deny_system_id(&mut self, system_id: &str) {
        self.enabled_system_ids.remove(system_id);
        self.disabled_system_ids.insert(system_id.to_owned());
    }

    fn is_bootable_for(&self, arch: Arch, system_id: &str) -> bool {
        self.enabled
            && self.architectures.contains(&arch)
            && self.enabled_system_ids.contains(system_id)
    }
}

/// The catalog of boot images with the per-client selection storage.
pub struct ImageCatalog {
    images: Vec<BootImage>,
    storage: Arc<dyn SelectionStore>,
}

impl ImageCatalog {
    pub fn new(images: Vec<BootImage>, storage: Arc<dyn SelectionStore>) -> Self {
        ImageCatalog { images, storage }
    }

    pub fn images(&self) -> &[BootImage] {
        &self.images
    }

    /// The enabled images a client with this architecture and system
    /// identifier may boot.
    pub fn find_bootable(&self, arch: Arch, system_id: &str) -> Vec<&BootImage> {
        self.images
            .iter()
            .filter(|image| image.is_bootable_for(arch, system_id))
            .collect()
    }

    /// The union of the bootable images matching each filter, in filter
    /// order. No deduplication happens here.
    pub fn find_bootable_filtered(
        &self,
        arch: Arch,
        system_id: &str,
        filters: &[ImageFilter],
    ) -> Vec<&BootImage> {
        let mut found = Vec::new();
        for filter in filters {
            found.extend(self.images.iter().filter(|image| {
                image.is_bootable_for(arch, system_id)
                    && image.install == filter.install
                    && image.kind == filter.kind
            }));
        }
        found
    }

    /// The first bootable image flagged as the default.
    pub fn find_default(&self, arch: Arch, system_id: &str) -> Option<&BootImage> {
        self.images
            .iter()
            .find(|image| image.is_bootable_for(arch, system_id) && image.default)
    }

    /// The image the client selected last, when it still resolves to a
    /// bootable image, otherwise the catalog default.
    pub fn last_selected(
        &self,
        client: &MacAddress,
        arch: Arch,
        system_id: &str,
    ) -> Option<&BootImage> {
        let default = self.find_default(arch, system_id);
        let index = match self.storage.last_selection(client) {
            Some(index) => index,
            None => return default,
        };
        self.images
            .iter()
            .find(|image| image.is_bootable_for(arch, system_id) && image.index == index)
            .or(default)
    }

    /// Persists the selection for the next LIST round.
    pub fn record_selection(&self, client: &MacAddress, image: &BootImage) {
        self.storage.set_last_selection(client, image.index);
    }

    /// Full wire-identity lookup. `None` means the caller should fall
    /// back to the bare identifier it already has.
    pub fn find_by_ref(&self, id: &ImageRef) -> Option<&BootImage> {
        self.images.iter().find(|image| {
            image.index == id.index && image.kind == id.kind && image.install == id.install
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_ram::RamSelectionStore;

    fn image(index: u16, name: &str) -> BootImage {
        let mut enabled_system_ids = HashSet::new();
        enabled_system_ids.insert("iMac8,1".to_owned());
        BootImage {
            name: name.to_owned(),
            description: String::new(),
            boot_file: "booter".to_owned(),
            root_path: Some("NetBoot.dmg".to_owned()),
            architectures: vec![Arch::I386],
            enabled_system_ids,
            disabled_system_ids: HashSet::new(),
            index,
            kind: ImageKind::MacOsX,
            install: false,
            default: false,
            enabled: true,
            supports_diskless: false,
            transport: TransportType::Http,
            language: "Default".to_owned(),
            os_version: "10.5".to_owned(),
        }
    }

    fn catalog(images: Vec<BootImage>) -> ImageCatalog {
        ImageCatalog::new(images, Arc::new(RamSelectionStore::new()))
    }

    #[test]
    fn find_bootable_is_exact() {
        let mut disabled = image(2, "Disabled");
        disabled.enabled = false;
        let mut ppc_only = image(3, "Ppc");
        ppc_only.architectures = vec![Arch::Ppc];
        let mut other_client = image(4, "Other");
        other_client.enabled_system_ids.clear();
        other_client.enabled_system_ids.insert("MacPro3,1".to_owned());

        let catalog = catalog(vec![image(1, "Ok"), disabled, ppc_only, other_client]);
        let bootable = catalog.find_bootable(Arch::I386, "iMac8,1");
        assert_eq!(bootable.len(), 1);
        assert_eq!(bootable[0].name, "Ok");
    }

    #[test]
    fn filters_union_in_order() {
        let mut install = image(2, "Install");
        install.install = true;
        let mut diagnostics = image(3, "Diagnostics");
        diagnostics.kind = ImageKind::HardwareDiagnostics;

        let catalog = catalog(vec![image(1, "NetBoot"), install, diagnostics]);
        let filters = [
            ImageFilter {
                install: false,
                kind: ImageKind::HardwareDiagnostics,
            },
            ImageFilter {
                install: true,
                kind: ImageKind::MacOsX,
            },
        ];
        let found = catalog.find_bootable_filtered(Arch::I386, "iMac8,1", &filters);
        let names: Vec<&str> = found.iter().map(|image| image.name.as_str()).collect();
        assert_eq!(names, vec!["Diagnostics", "Install"]);
    }

    #[test]
    fn last_selected_falls_back_to_the_default() {
        let mut default = image(1, "Default");
        default.default = true;
        let selected = image(2, "Selected");
        let storage = Arc::new(RamSelectionStore::new());
        let catalog = ImageCatalog::new(vec![default, selected], storage);

        let client = MacAddress::new([0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9b]);
        assert_eq!(
            catalog.last_selected(&client, Arch::I386, "iMac8,1").unwrap().name,
            "Default",
        );

        let selected = catalog.images()[1].clone();
        catalog.record_selection(&client, &selected);
        assert_eq!(
            catalog.last_selected(&client, Arch::I386, "iMac8,1").unwrap().name,
            "Selected",
        );

        // A stale index resolves back to the default.
        catalog.storage.set_last_selection(&client, 99);
        assert_eq!(
            catalog.last_selected(&client, Arch::I386, "iMac8,1").unwrap().name,
            "Default",
        );
    }

    #[test]
    fn system_id_sets_stay_disjoint() {
        let mut image = image(1, "NetBoot");
        image.deny_system_id("iMac8,1");
        assert!(!image.enabled_system_ids.contains("iMac8,1"));
        assert!(image.disabled_system_ids.contains("iMac8,1"));

        image.allow_system_id("iMac8,1");
        assert!(image.enabled_system_ids.contains("iMac8,1"));
        assert!(!image.disabled_system_ids.contains("iMac8,1"));
    }

    #[test]
    fn find_by_ref_matches_the_full_identity() {
        let mut install = image(1, "Install");
        install.install = true;
        let catalog = catalog(vec![image(1, "NetBoot"), install]);

        let id = ImageRef {
            install: true,
            kind: ImageKind::MacOsX,
            index: 1,
        };
        assert_eq!(catalog.find_by_ref(&id).unwrap().name, "Install");
        let missing = ImageRef {
            install: true,
            kind: ImageKind::MacOs9,
            index: 1,
        };
        assert!(catalog.find_by_ref(&missing).is_none());
    }
}

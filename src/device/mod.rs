//! Device enumeration sources and the uniform record they are parsed into.
//!
//! Every source speaks its own loosely structured text format. The parsers in
//! this module turn each one into [`DeviceRecord`]s whose `component_id` has
//! the same `<prefix>-<vendor>:<product>` shape, so a bug database can be
//! keyed without caring where a device was enumerated from.

pub mod input;
pub mod pci;
pub mod pnp;
pub mod usb;

/// A normalized, parsed device entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// e.g. `pci-10de:1180`, `usb-1d6b:0002`, `pnp-PNP0303`
    pub component_id: String,
    pub revision: Option<String>,
    /// `Subsystem-<vendor>:<product>`, only meaningful for audio lookups
    pub subsystem_id: Option<String>,
}

impl DeviceRecord {
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            revision: None,
            subsystem_id: None,
        }
    }

    pub fn revision(mut self, value: Option<String>) -> Self {
        self.revision = value;
        self
    }

    pub fn subsystem(mut self, value: Option<String>) -> Self {
        self.subsystem_id = value;
        self
    }
}

/// Where a device listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Input,
    Usb,
    Pci,
    Pnp,
}

impl Source {
    /// All sources, in the order their records are matched.
    pub const ALL: [Source; 4] = [Source::Input, Source::Usb, Source::Pci, Source::Pnp];

    /// Marker prepended to every component id from this source.
    pub fn prefix(self) -> &'static str {
        match self {
            Source::Input => "input",
            Source::Usb => "usb",
            Source::Pci => "pci",
            Source::Pnp => "pnp",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Input => write!(f, "input device"),
            Source::Usb => write!(f, "USB device"),
            Source::Pci => write!(f, "PCI device"),
            Source::Pnp => write!(f, "PnP device"),
        }
    }
}

/// Build `<prefix>-<vendor>:<product>`.
pub fn component_id(source: Source, vendor: &str, product: &str) -> String {
    format!("{}-{}:{}", source.prefix(), vendor, product)
}

/// Build the canonical `Subsystem-<vendor>:<product>` form.
pub fn subsystem_id(vendor: &str, product: &str) -> String {
    format!("Subsystem-{}:{}", vendor, product)
}

/// PnP ids have no vendor/product split; the raw id is kept whole.
pub fn pnp_component_id(raw: &str) -> String {
    format!("{}-{}", Source::Pnp.prefix(), raw)
}

/// Raw text captured from each source. Sources that could not be read are `None`.
#[derive(Debug, Clone, Default)]
pub struct DeviceListings {
    pub input: Option<String>,
    pub usb: Option<String>,
    pub pci: Option<String>,
    pub pnp: Option<String>,
}

impl DeviceListings {
    pub fn set(&mut self, source: Source, raw: String) {
        let slot = match source {
            Source::Input => &mut self.input,
            Source::Usb => &mut self.usb,
            Source::Pci => &mut self.pci,
            Source::Pnp => &mut self.pnp,
        };
        *slot = Some(raw);
    }

    /// Lazily parse every available listing into one stream:
    /// input, then USB, then PCI, then PnP.
    pub fn records(&self) -> impl Iterator<Item = DeviceRecord> + '_ {
        let from_input = self.input.as_deref().into_iter().flat_map(|raw| input::parse(raw));
        let from_usb = self.usb.as_deref().into_iter().flat_map(|raw| usb::parse(raw));
        let from_pci = self.pci.as_deref().into_iter().flat_map(|raw| pci::parse(raw));
        let from_pnp = self.pnp.as_deref().into_iter().flat_map(|raw| pnp::parse(raw));
        from_input.chain(from_usb).chain(from_pci).chain(from_pnp)
    }
}

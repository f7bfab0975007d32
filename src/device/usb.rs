//! `usb-devices` parser.
//!
//! The `P:` line of every device block carries the ids, followed by one more
//! `key=value` field whose value is kept verbatim as the revision:
//!
//! ```text
//! P:  Vendor=1d6b ProdID=0002 Rev=03.13
//! ```

use super::{DeviceRecord, Source, component_id};
use regex::Regex;
use std::sync::LazyLock;

static ID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bVendor=(?P<vendor>\w+) ProdID=(?P<product>\w+) \w+=(?P<rest>.+)")
        .expect("static regex must compile")
});

static SUBSYSTEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bSubsystem-(?P<vendor>\w+):(?P<product>\w+)").expect("static regex must compile")
});

/// Parse USB device records.
pub fn parse(raw: &str) -> impl Iterator<Item = DeviceRecord> + '_ {
    raw.lines().filter_map(|line| {
        let caps = ID_LINE.captures(line)?;
        let rest = caps["rest"].trim();
        let subsystem = SUBSYSTEM
            .captures(rest)
            .map(|sub| super::subsystem_id(&sub["vendor"], &sub["product"]));
        Some(
            DeviceRecord::new(component_id(Source::Usb, &caps["vendor"], &caps["product"]))
                .revision(Some(rest.to_string()))
                .subsystem(subsystem),
        )
    })
}

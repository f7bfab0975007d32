//! `/proc/bus/input/devices` parser.
//!
//! Each device is a block of `X: ...` lines; only the `I:` line carries ids:
//!
//! ```text
//! I: Bus=0003 Vendor=046d Product=c52b Version=0111
//! N: Name="Logitech USB Receiver"
//! ```

use super::{DeviceRecord, Source, component_id};
use regex::Regex;
use std::sync::LazyLock;

static ID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^I:\s.*\bVendor=(?P<vendor>\w+) Product=(?P<product>\w+) Version=(?P<version>\w{4})")
        .expect("static regex must compile")
});

/// Parse input device records. Input devices never carry a subsystem id.
pub fn parse(raw: &str) -> impl Iterator<Item = DeviceRecord> + '_ {
    raw.lines().filter_map(|line| {
        let caps = ID_LINE.captures(line)?;
        Some(
            DeviceRecord::new(component_id(Source::Input, &caps["vendor"], &caps["product"]))
                .revision(Some(caps["version"].to_string())),
        )
    })
}

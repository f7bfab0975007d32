//! Plug-and-Play id parser. Input is the concatenation of every
//! `/sys/devices/pnp0/*/id` file, one raw id per line.

use super::{DeviceRecord, pnp_component_id};

/// Parse PnP device records. PnP ids carry no revision or subsystem.
pub fn parse(raw: &str) -> impl Iterator<Item = DeviceRecord> + '_ {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|id| DeviceRecord::new(pnp_component_id(id)))
}

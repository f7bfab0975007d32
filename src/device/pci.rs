//! `lspci -nv` parser.
//!
//! A device is an unindented header line followed by indented detail lines:
//!
//! ```text
//! 00:1b.0 0403: 8086:2668 (rev 04)
//! 	Subsystem: 8086:2668
//! 	Flags: bus master, fast devsel, latency 0, IRQ 16
//! ```
//!
//! The revision is optional on the header. The `Subsystem:` detail line is
//! folded into the record as `Subsystem-<vendor>:<product>`.

use super::{DeviceRecord, Source, component_id, subsystem_id};
use regex::Regex;
use std::iter::Peekable;
use std::str::Lines;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\S+ (?P<class>\w+): (?P<vendor>\w+):(?P<product>\w+)(?: \(rev (?P<rev>\w+)\))?",
    )
    .expect("static regex must compile")
});

static SUBSYSTEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+Subsystem: (?P<vendor>\w+):(?P<product>\w+)")
        .expect("static regex must compile")
});

/// Parse PCI device records.
pub fn parse(raw: &str) -> impl Iterator<Item = DeviceRecord> + '_ {
    PciRecords {
        lines: raw.lines().peekable(),
    }
}

struct PciRecords<'a> {
    lines: Peekable<Lines<'a>>,
}

/// Detail lines are indented; blank lines separate devices.
fn is_detail(line: &str) -> bool {
    line.is_empty() || line.starts_with(char::is_whitespace)
}

impl Iterator for PciRecords<'_> {
    type Item = DeviceRecord;

    fn next(&mut self) -> Option<DeviceRecord> {
        loop {
            let line = self.lines.next()?;
            let Some(caps) = HEADER.captures(line) else {
                continue;
            };

            let mut subsystem = None;
            while let Some(detail) = self.lines.next_if(|l| is_detail(l)) {
                if subsystem.is_none()
                    && let Some(sub) = SUBSYSTEM_LINE.captures(detail)
                {
                    subsystem = Some(subsystem_id(&sub["vendor"], &sub["product"]));
                }
            }

            return Some(
                DeviceRecord::new(component_id(Source::Pci, &caps["vendor"], &caps["product"]))
                    .revision(caps.name("rev").map(|m| m.as_str().to_string()))
                    .subsystem(subsystem),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSPCI: &str = "\
00:00.0 0600: 8086:0154 (rev 09)
\tSubsystem: 17aa:21f3
\tFlags: bus master, fast devsel, latency 0
\tCapabilities: <access denied>

00:1b.0 0403: 8086:1e20 (rev 04)
\tSubsystem: 17aa:21f3
\tFlags: bus master, fast devsel, latency 0, IRQ 49
\tMemory at f0530000 (64-bit, non-prefetchable) [size=16K]
\tKernel driver in use: snd_hda_intel

00:1f.0 0601: 8086:1e55 (rev 04)
\tFlags: bus master, medium devsel, latency 0

01:00.0 0300: 10de:1180 (prog-if 00 [VGA controller])
\tSubsystem: 1043:83f8
\tKernel driver in use: nouveau
";

    #[test]
    fn test_parse_lspci() {
        let records: Vec<DeviceRecord> = parse(LSPCI).collect();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].component_id, "pci-8086:0154");
        assert_eq!(records[0].revision.as_deref(), Some("09"));
        assert_eq!(records[0].subsystem_id.as_deref(), Some("Subsystem-17aa:21f3"));

        // No Subsystem line for this device
        assert_eq!(records[2].component_id, "pci-8086:1e55");
        assert_eq!(records[2].subsystem_id, None);

        // No revision on the header
        assert_eq!(records[3].component_id, "pci-10de:1180");
        assert_eq!(records[3].revision, None);
        assert_eq!(records[3].subsystem_id.as_deref(), Some("Subsystem-1043:83f8"));
    }

    #[test]
    fn test_header_revision_is_optional() {
        for (vendor, product, rev) in [("8086", "2668", "04"), ("10ec", "8168", "0c"), ("1002", "15bf", "c4")] {
            let with_rev = format!("00:1b.0 0403: {}:{} (rev {})", vendor, product, rev);
            let record = parse(&with_rev).next().unwrap();
            assert_eq!(record.component_id, format!("pci-{}:{}", vendor, product));
            assert_eq!(record.revision.as_deref(), Some(rev));

            let without_rev = format!("00:1b.0 0403: {}:{}", vendor, product);
            let record = parse(&without_rev).next().unwrap();
            assert_eq!(record.component_id, format!("pci-{}:{}", vendor, product));
            assert_eq!(record.revision, None);
        }
    }

    #[test]
    fn test_domain_prefixed_address() {
        let record = parse("0000:c1:00.4 0c03: 1022:15ba\n").next().unwrap();
        assert_eq!(record.component_id, "pci-1022:15ba");
    }

    #[test]
    fn test_subsystem_does_not_leak_into_next_device() {
        let raw = "00:02.0 0300: 8086:0166 (rev 09)\n\tFlags: fast devsel\n00:1b.0 0403: 8086:1e20 (rev 04)\n\tSubsystem: 17aa:21f3\n";
        let records: Vec<DeviceRecord> = parse(raw).collect();
        assert_eq!(records[0].subsystem_id, None);
        assert_eq!(records[1].subsystem_id.as_deref(), Some("Subsystem-17aa:21f3"));
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert_eq!(parse("pcilib: Cannot open /proc/bus/pci\n").count(), 0);
        assert_eq!(parse("").count(), 0);
    }
}

//! Access to the running system: device listings, the Bluetooth controller
//! check and the X input tools used by the touchpad check.

use crate::device::{DeviceListings, Source};
use crate::error::{Error, Result};
use crate::sysfs::SysfsRoot;
use std::process::Command;
use tracing::{debug, info};

/// Everything the scan needs to ask the system.
pub trait SystemProbe {
    /// Raw text of one device listing, or [`Error::SourceUnavailable`].
    fn listing(&self, source: Source) -> Result<String>;

    /// Whether a Bluetooth controller is present.
    fn bluetooth_present(&self) -> bool;

    /// Whether the machine has a lid switch (i.e. is a laptop).
    fn has_lid(&self) -> bool;

    /// `xinput list --name-only` on `display`, or [`Error::Command`].
    fn pointer_devices(&self, display: &str) -> Result<String>;

    /// `xinput list-props <device>` on `display`.
    fn pointer_properties(&self, display: &str, device: &str) -> Result<String>;
}

/// Gather every listing. Unavailable sources are logged and left out.
pub fn collect(probe: &impl SystemProbe) -> DeviceListings {
    let mut listings = DeviceListings::default();
    for source in Source::ALL {
        match probe.listing(source) {
            Ok(raw) => {
                debug!(%source, bytes = raw.len(), "listing collected");
                listings.set(source, raw);
            }
            Err(e) => info!("skipping {}: {}", source, e),
        }
    }
    listings
}

/// The real system, rooted at a [`SysfsRoot`].
#[derive(Debug, Clone, Default)]
pub struct HostProbe {
    sysfs: SysfsRoot,
}

impl HostProbe {
    pub fn new(sysfs: SysfsRoot) -> Self {
        Self { sysfs }
    }

    fn file_listing(&self, source: Source, relative: &str) -> Result<String> {
        self.sysfs
            .read_raw(relative)
            .map_err(|e| unavailable(source, e.to_string()))
    }
}

impl SystemProbe for HostProbe {
    fn listing(&self, source: Source) -> Result<String> {
        match source {
            Source::Input => self.file_listing(source, "proc/bus/input/devices"),
            Source::Usb => command_listing(source, "usb-devices", &[]),
            Source::Pci => command_listing(source, "lspci", &["-nv"]),
            Source::Pnp => self
                .sysfs
                .read_children("sys/devices/pnp0", "id")
                .map_err(|e| unavailable(source, e.to_string())),
        }
    }

    fn bluetooth_present(&self) -> bool {
        if self
            .sysfs
            .list_dir("sys/class/bluetooth")
            .is_ok_and(|entries| !entries.is_empty())
        {
            return true;
        }
        Command::new("hciconfig")
            .output()
            .is_ok_and(|o| o.status.success() && !o.stdout.trim_ascii().is_empty())
    }

    fn has_lid(&self) -> bool {
        self.sysfs.exists("proc/acpi/button/lid")
    }

    fn pointer_devices(&self, display: &str) -> Result<String> {
        run("xinput", &["list", "--name-only"], Some(display))
    }

    fn pointer_properties(&self, display: &str, device: &str) -> Result<String> {
        run("xinput", &["list-props", device], Some(display))
    }
}

fn unavailable(source: Source, detail: impl Into<String>) -> Error {
    Error::SourceUnavailable {
        source_kind: source,
        detail: detail.into(),
    }
}

fn command_listing(source: Source, program: &str, args: &[&str]) -> Result<String> {
    run(program, args, None).map_err(|e| unavailable(source, e.to_string()))
}

/// Run `program`, failing on a missing binary or non-zero exit.
fn run(program: &str, args: &[&str], display: Option<&str>) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(display) = display {
        cmd.env("DISPLAY", display);
    }

    let output = cmd.output().map_err(|e| Error::Command {
        program: program.to_string(),
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Command {
            program: program.to_string(),
            detail: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_host_probe_reads_files_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("proc/bus/input")).unwrap();
        fs::write(
            root.join("proc/bus/input/devices"),
            "I: Bus=0003 Vendor=046d Product=c52b Version=0111\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("sys/devices/pnp0/00:05")).unwrap();
        fs::write(root.join("sys/devices/pnp0/00:05/id"), "PNP0303\n").unwrap();
        fs::create_dir_all(root.join("proc/acpi/button/lid/LID0")).unwrap();

        let probe = HostProbe::new(SysfsRoot::new(root));
        assert!(probe.listing(Source::Input).unwrap().contains("Vendor=046d"));
        assert_eq!(probe.listing(Source::Pnp).unwrap(), "PNP0303\n");
        assert!(probe.has_lid());
    }

    #[test]
    fn test_missing_files_are_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = HostProbe::new(SysfsRoot::new(tmp.path()));

        for source in [Source::Input, Source::Pnp] {
            let err = probe.listing(source).unwrap_err();
            assert!(matches!(err, Error::SourceUnavailable { source_kind, .. } if source_kind == source));
        }
        assert!(!probe.has_lid());
    }

    #[test]
    fn test_missing_listing_command_is_unavailable() {
        let err = command_listing(Source::Usb, "tcell-no-such-command", &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::SourceUnavailable {
                source_kind: Source::Usb,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_command_is_a_command_error() {
        let err = run("tcell-no-such-command", &[], Some(":0")).unwrap_err();
        assert!(matches!(err, Error::Command { ref program, .. } if program == "tcell-no-such-command"));
        assert!(err.to_string().starts_with("tcell-no-such-command failed"));

        let err = run("false", &[], None).unwrap_err();
        assert!(matches!(err, Error::Command { ref detail, .. } if detail.starts_with("exited with")));
    }

    #[test]
    fn test_sysfs_bluetooth_controller() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("sys/class/bluetooth/hci0")).unwrap();
        let probe = HostProbe::new(SysfsRoot::new(tmp.path()));
        assert!(probe.bluetooth_present());
    }

    #[test]
    fn test_collect_drops_unavailable_sources() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("sys/devices/pnp0/00:05")).unwrap();
        fs::write(tmp.path().join("sys/devices/pnp0/00:05/id"), "PNP0303\n").unwrap();

        fn no_x() -> Error {
            Error::Command {
                program: "xinput".to_string(),
                detail: "no X".to_string(),
            }
        }

        struct PnpOnly(HostProbe);
        impl SystemProbe for PnpOnly {
            fn listing(&self, source: Source) -> Result<String> {
                match source {
                    Source::Pnp => self.0.listing(source),
                    _ => Err(unavailable(source, "not here")),
                }
            }
            fn bluetooth_present(&self) -> bool {
                false
            }
            fn has_lid(&self) -> bool {
                false
            }
            fn pointer_devices(&self, _: &str) -> Result<String> {
                Err(no_x())
            }
            fn pointer_properties(&self, _: &str, _: &str) -> Result<String> {
                Err(no_x())
            }
        }

        let listings = collect(&PnpOnly(HostProbe::new(SysfsRoot::new(tmp.path()))));
        assert!(listings.input.is_none() && listings.usb.is_none() && listings.pci.is_none());
        let ids: Vec<String> = listings.records().map(|r| r.component_id).collect();
        assert_eq!(ids, vec!["pnp-PNP0303"]);
    }
}

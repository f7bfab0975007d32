//! Touchpad/mouse check for laptops running X.

use crate::matcher::Report;
use crate::output;
use crate::probe::SystemProbe;
use std::io::{self, Write};
use tracing::info;

const GENERIC_MOUSE: &str = "PS/2 Generic Mouse";
const SYNAPTICS_TOUCHPAD: &str = "SynPS/2 Synaptics TouchPad";
/// Touchpads reporting three-finger detection.
const SYNAPTICS_THREE_FINGER_BUG: &str = "1384042";

/// Inspect the X pointer devices on `display`.
///
/// Prints a notice for a generic PS/2 mouse (usually a touchpad the driver
/// did not recognize) and returns a report for Synaptics touchpads that
/// advertise three-finger detection. Any xinput failure skips the check.
pub fn check(
    probe: &impl SystemProbe,
    display: &str,
    out: &mut impl Write,
) -> io::Result<Vec<Report>> {
    let devices = match probe.pointer_devices(display) {
        Ok(devices) => devices,
        Err(e) => {
            info!("touchpad check skipped: {}", e);
            return Ok(Vec::new());
        }
    };

    if devices.contains(GENERIC_MOUSE) {
        let found = format!("\"{}\" found in xinput", GENERIC_MOUSE);
        output::print_notice(
            out,
            &[found.as_str(), "Please check scrolling ability of your touchpad."],
        )?;
    }

    if !devices.contains(SYNAPTICS_TOUCHPAD) {
        return Ok(Vec::new());
    }

    let props = match probe.pointer_properties(display, SYNAPTICS_TOUCHPAD) {
        Ok(props) => props,
        Err(e) => {
            info!("touchpad capabilities unavailable: {}", e);
            return Ok(Vec::new());
        }
    };

    if supports_three_finger(&props) {
        Ok(vec![Report::new(
            "Synaptics Touchpad",
            SYNAPTICS_THREE_FINGER_BUG,
            "Input",
        )])
    } else {
        Ok(Vec::new())
    }
}

/// Fifth field of `Synaptics Capabilities (NNN):\t1, 0, 1, 1, 1, 1, 1`.
fn supports_three_finger(props: &str) -> bool {
    props
        .lines()
        .find(|line| line.contains("Capabilities"))
        .and_then(|line| line.rsplit_once(':'))
        .and_then(|(_, values)| values.split(',').nth(4).map(str::trim))
        .is_some_and(|flag| flag == "1")
}

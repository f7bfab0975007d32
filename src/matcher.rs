//! Joins the device stream against the bug databases.

use crate::database::{AUDIO_CATEGORY, BLUETOOTH_CATEGORY, BugDatabase};
use crate::device::DeviceRecord;
use std::collections::BTreeSet;
use tracing::debug;

/// One known issue found on this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Component id, subsystem id or distro name that matched
    pub id: String,
    pub bug: String,
    pub category: String,
}

impl Report {
    pub fn new(id: impl Into<String>, bug: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bug: bug.into(),
            category: category.into(),
        }
    }
}

/// Everything reported during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Database matches, in report order.
    pub reports: Vec<Report>,
    /// Findings of the laptop touchpad check. Not database matches.
    pub touchpad: Vec<Report>,
}

impl ScanReport {
    /// True when no database lists a known issue for this system.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn extend(&mut self, reports: impl IntoIterator<Item = Report>) {
        self.reports.extend(reports);
    }
}

fn reports_for<'a>(
    db: &'a BugDatabase,
    category: &'a str,
    key: &'a str,
) -> impl Iterator<Item = Report> + 'a {
    db.bugs(category, key)
        .into_iter()
        .flatten()
        .map(move |bug| Report::new(key, bug.as_str(), category))
}

/// Match every record against every category of `db`.
///
/// Component ids report immediately, once per category they appear in.
/// Subsystem ids known to the `Audio` category are collected and reported
/// once each after the whole stream is consumed, since the same audio
/// subsystem shows up on several device functions.
pub fn match_components(
    records: impl IntoIterator<Item = DeviceRecord>,
    db: &BugDatabase,
) -> Vec<Report> {
    let mut reports = Vec::new();
    let mut subsystems = BTreeSet::new();
    let mut seen = 0usize;

    for record in records {
        seen += 1;

        if let Some(sub) = record.subsystem_id
            && db.bugs(AUDIO_CATEGORY, &sub).is_some()
        {
            subsystems.insert(sub);
        }

        for category in db.categories() {
            reports.extend(reports_for(db, category, &record.component_id));
        }
    }

    debug!(
        devices = seen,
        audio_subsystems = subsystems.len(),
        "component check done"
    );

    for sub in &subsystems {
        reports.extend(reports_for(db, AUDIO_CATEGORY, sub));
    }

    reports
}

/// Match the distro name against the common database.
///
/// The `Bluetooth` category only applies when a controller is present;
/// `bluetooth_present` is consulted at most once, and only if that
/// category exists.
pub fn match_common(
    distro: &str,
    db: &BugDatabase,
    bluetooth_present: impl FnOnce() -> bool,
) -> Vec<Report> {
    let mut probe = Some(bluetooth_present);
    let mut has_bluetooth = None;
    let mut reports = Vec::new();

    for category in db.categories() {
        if category == BLUETOOTH_CATEGORY {
            let present = *has_bluetooth.get_or_insert_with(|| probe.take().is_some_and(|f| f()));
            if !present {
                debug!("no bluetooth controller, skipping {} issues", BLUETOOTH_CATEGORY);
                continue;
            }
        }
        reports.extend(reports_for(db, category, distro));
    }

    reports
}

use crate::database::{self, BugDatabase, Fallback, Selection};
use crate::error::{Error, Result};
use crate::identity::SystemIdentity;
use crate::matcher::{self, ScanReport};
use crate::output;
use crate::probe::{self, SystemProbe};
use crate::touchpad;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Settings for a single run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub database_dir: PathBuf,
    pub common_database: String,
    pub touchpad: bool,
    pub display: String,
}

/// Check this system for known buggy components, writing progress and
/// findings to `out`.
///
/// Fails before scanning when no per-release database can be selected. A
/// missing common database fails only the final phase; component findings
/// have already been written by then.
pub fn run(
    probe: &impl SystemProbe,
    identity: &SystemIdentity,
    opts: &ScanOptions,
    out: &mut impl Write,
) -> Result<ScanReport> {
    writeln!(out, "Your distro: {}", identity.distro)?;
    writeln!(out, "Your kernel version: {}.X", identity.kernel_major_minor)?;

    let selection = select_database(identity, opts, out)?;
    let mut report = ScanReport::default();

    if opts.touchpad && probe.has_lid() {
        output::print_status(out, "Checking touchpad/mouse")?;
        let found = touchpad::check(probe, &opts.display, out)?;
        output::print_reports(out, &found)?;
        report.touchpad = found;
    }

    output::print_status(out, "Scanning components...")?;
    let listings = probe::collect(probe);

    output::print_status(out, "Loading database...")?;
    let db = BugDatabase::load(&selection.path)?;

    output::print_status(out, "Running component check...")?;
    let found = matcher::match_components(listings.records(), &db);
    output::print_reports(out, &found)?;
    report.extend(found);

    output::print_status(out, "Checking common issues...")?;
    let common = BugDatabase::load_common(&opts.database_dir.join(&opts.common_database))?;
    let found = matcher::match_common(&identity.distro, &common, || probe.bluetooth_present());
    output::print_reports(out, &found)?;
    report.extend(found);

    if report.is_empty() {
        output::print_status(out, "No other known issue found on your system")?;
    }

    info!(
        issues = report.reports.len(),
        touchpad = report.touchpad.len(),
        "scan complete"
    );
    Ok(report)
}

/// Pick the per-release database, explaining any fallback to the user.
fn select_database(
    identity: &SystemIdentity,
    opts: &ScanOptions,
    out: &mut impl Write,
) -> Result<Selection> {
    let distro = &identity.distro;
    let kernel = &identity.kernel_major_minor;

    match database::select(&opts.database_dir, identity) {
        Ok(selection) => {
            if let Some(fallback) = selection.fallback {
                output::print_warning(
                    out,
                    &format!("Sorry we don't have a database for {}-{}", distro, kernel),
                )?;
                if fallback == Fallback::SameDistro {
                    output::print_warning(
                        out,
                        &format!("And we don't have any database for kernel {}", kernel),
                    )?;
                }
                output::print_warning(
                    out,
                    &format!("We will use {} as an alternative", selection.file_name()),
                )?;
                output::print_warning(out, "* It might cause some false alarms")?;
                info!(?fallback, database = %selection.path.display(), "using approximate database");
            }
            Ok(selection)
        }
        Err(e @ Error::MissingDatabase { .. }) => {
            output::print_warning(
                out,
                &format!("Sorry we don't have a database for {}-{}", distro, kernel),
            )?;
            output::print_warning(
                out,
                &format!("And we don't have any database for kernel {}", kernel),
            )?;
            output::print_warning(out, &format!("And we don't have any database for {}", distro))?;
            output::print_status(out, "Program terminates now :(")?;
            Err(e)
        }
        Err(e) => Err(e),
    }
}

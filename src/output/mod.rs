use crate::matcher::Report;
use colored::Colorize;
use std::fmt;
use std::io::{self, Write};

const BUG_TRACKER: &str = "http://pad.lv";

/// `Known issue for <id>: http://pad.lv/<bug> (<category>)`
pub fn render(id: &str, bug: &str, category: &str) -> String {
    format!("Known issue for {}: {}/{} ({})", id, BUG_TRACKER, bug, category)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.id, &self.bug, &self.category))
    }
}

pub fn print_report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    writeln!(out, "{}", report)
}

pub fn print_reports(out: &mut impl Write, reports: &[Report]) -> io::Result<()> {
    for report in reports {
        print_report(out, report)?;
    }
    Ok(())
}

/// A status line such as `Scanning components...`.
pub fn print_status(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message)
}

/// Approximate-result warnings, highlighted.
pub fn print_warning(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow())
}

/// A notice framed by rules so it stands out of the scan log.
pub fn print_notice(out: &mut impl Write, lines: &[&str]) -> io::Result<()> {
    let rule = "=".repeat(48);
    writeln!(out, "{}", rule)?;
    for line in lines {
        writeln!(out, "{}", line.bold())?;
    }
    writeln!(out, "{}", rule)
}

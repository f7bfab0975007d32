//! T-Cell, the component issue lookup tool.
//!
//! Enumerates the input, USB, PCI and PnP devices of a Linux system and
//! cross-references them against curated per-release bug databases.

pub mod cli;
pub mod config;
pub mod database;
pub mod device;
pub mod error;
pub mod identity;
pub mod matcher;
pub mod output;
pub mod probe;
pub mod scan;
pub mod sysfs;
pub mod touchpad;

//! Bug databases and how the right one is picked for this system.
//!
//! A database is a JSON object of `category -> lookup key -> [bug id]`.
//! Per-release files are named `<distro>-<kernel>-bug.json` and keyed by
//! component id (plus `Audio`, keyed by subsystem id). The common file is
//! keyed by distro name.

use crate::error::{Error, Result};
use crate::identity::SystemIdentity;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Category whose keys are subsystem ids rather than component ids.
pub const AUDIO_CATEGORY: &str = "Audio";
/// Common-database category only checked when a controller is present.
pub const BLUETOOTH_CATEGORY: &str = "Bluetooth";
pub const COMMON_DATABASE: &str = "common-bug.json";

const SUFFIX: &str = "-bug.json";

/// Read-only `category -> key -> bug ids` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugDatabase {
    categories: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl BugDatabase {
    /// Load and validate a database file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::DatabaseRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(path, &content)
    }

    /// Load the common database. Any read failure is reported as
    /// [`Error::CommonDatabaseMissing`].
    pub fn load_common(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::CommonDatabaseMissing {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Self> {
        let categories: BTreeMap<String, BTreeMap<String, Vec<String>>> =
            serde_json::from_str(content).map_err(|e| Error::DatabaseParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        for (category, entries) in &categories {
            if entries.is_empty() {
                return Err(Error::InvalidDatabase {
                    path: path.to_path_buf(),
                    detail: format!("category '{}' is empty", category),
                });
            }
            if let Some((key, _)) = entries.iter().find(|(_, bugs)| bugs.is_empty()) {
                return Err(Error::InvalidDatabase {
                    path: path.to_path_buf(),
                    detail: format!("'{}' in category '{}' lists no bugs", key, category),
                });
            }
        }

        Ok(Self { categories })
    }

    /// Categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Bug ids recorded for `key` under `category`, in file order.
    pub fn bugs(&self, category: &str, key: &str) -> Option<&[String]> {
        self.categories
            .get(category)
            .and_then(|entries| entries.get(key))
            .map(Vec::as_slice)
    }
}

/// Build fixtures from `(category, key, bugs)` triples.
#[cfg(test)]
impl FromIterator<(String, String, Vec<String>)> for BugDatabase {
    fn from_iter<I: IntoIterator<Item = (String, String, Vec<String>)>>(iter: I) -> Self {
        let mut categories: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for (category, key, bugs) in iter {
            assert!(!bugs.is_empty(), "fixture '{}' in '{}' lists no bugs", key, category);
            categories.entry(category).or_default().insert(key, bugs);
        }
        Self { categories }
    }
}

/// How far the selected database is from this system's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Same kernel series, different distro.
    SameKernel,
    /// Same distro, different kernel series.
    SameDistro,
}

/// The per-release database chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub fallback: Option<Fallback>,
}

impl Selection {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// `<distro>-<kernel>-bug.json`
pub fn database_file_name(identity: &SystemIdentity) -> String {
    format!("{}-{}{}", identity.distro, identity.kernel_major_minor, SUFFIX)
}

/// Pick the per-release database for `identity` from `dir`.
///
/// Exact name first, then any distro on the same kernel, then any kernel for
/// the same distro. Among several candidates the lexicographically last name
/// wins, on the convention that newer releases sort later.
pub fn select(dir: &Path, identity: &SystemIdentity) -> Result<Selection> {
    let exact = dir.join(database_file_name(identity));
    if exact.is_file() {
        return Ok(Selection {
            path: exact,
            fallback: None,
        });
    }

    let candidates = list_databases(dir)?;

    let kernel_suffix = format!("-{}{}", identity.kernel_major_minor, SUFFIX);
    if let Some(name) = candidates.iter().rev().find(|n| n.ends_with(&kernel_suffix)) {
        return Ok(Selection {
            path: dir.join(name),
            fallback: Some(Fallback::SameKernel),
        });
    }

    let distro_prefix = format!("{}-", identity.distro);
    if let Some(name) = candidates
        .iter()
        .rev()
        .find(|n| n.starts_with(&distro_prefix) && n.len() >= distro_prefix.len() + SUFFIX.len())
    {
        return Ok(Selection {
            path: dir.join(name),
            fallback: Some(Fallback::SameDistro),
        });
    }

    Err(Error::MissingDatabase {
        distro: identity.distro.clone(),
        kernel: identity.kernel_major_minor.clone(),
        dir: dir.to_path_buf(),
    })
}

/// Per-release database file names in `dir`, sorted. The common database is excluded.
fn list_databases(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(Error::DatabaseRead {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str()
            && name.ends_with(SUFFIX)
            && name != COMMON_DATABASE
            && entry.path().is_file()
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

use crate::error::{Error, Result};
use crate::sysfs::SysfsRoot;

/// Which release this system runs. Selects the bug database and is itself
/// the lookup key in the common database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemIdentity {
    pub distro: String,
    pub kernel_major_minor: String,
}

impl SystemIdentity {
    pub fn new(distro: impl Into<String>, kernel_major_minor: impl Into<String>) -> Self {
        Self {
            distro: distro.into(),
            kernel_major_minor: kernel_major_minor.into(),
        }
    }

    /// Detect the running distro codename and kernel series.
    /// Either value can be pinned by the caller; detection is skipped for it.
    pub fn detect(
        sysfs: &SysfsRoot,
        distro_override: Option<&str>,
        kernel_override: Option<&str>,
    ) -> Result<Self> {
        let distro = match distro_override {
            Some(d) => d.to_string(),
            None => detect_distro(sysfs)?,
        };
        let kernel_major_minor = match kernel_override {
            Some(k) => k.to_string(),
            None => {
                let release = sysfs.read("proc/sys/kernel/osrelease")?;
                kernel_major_minor(&release).ok_or_else(|| {
                    Error::Identity(format!("unrecognized kernel release '{}'", release))
                })?
            }
        };
        Ok(Self {
            distro,
            kernel_major_minor,
        })
    }
}

/// `3.13.0-24-generic` -> `3.13`
pub fn kernel_major_minor(release: &str) -> Option<String> {
    let mut parts = release.trim().split('.');
    let major = parts.next().filter(|s| !s.is_empty())?;
    let minor = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("{}.{}", major, minor))
}

/// Release codename, e.g. `trusty`.
fn detect_distro(sysfs: &SysfsRoot) -> Result<String> {
    if let Some(os_release) = sysfs.read_optional("etc/os-release")? {
        for key in ["VERSION_CODENAME", "UBUNTU_CODENAME"] {
            if let Some(value) = shell_var(&os_release, key) {
                return Ok(value);
            }
        }
    }
    if let Some(lsb) = sysfs.read_optional("etc/lsb-release")?
        && let Some(value) = shell_var(&lsb, "DISTRIB_CODENAME")
    {
        return Ok(value);
    }
    Err(Error::Identity(
        "no release codename in /etc/os-release or /etc/lsb-release".to_string(),
    ))
}

/// Value of `KEY=value` in an os-release style file, quotes stripped.
fn shell_var(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|v| !v.is_empty())
}

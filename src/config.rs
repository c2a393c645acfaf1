//! Context configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the driver's sysfs tree.
pub const DEFAULT_SYSFS_BASE: &str = "/sys/pisound-micro";

/// Configuration for a [`Context`](crate::Context).
///
/// [`Config::default()`] targets the real driver. Tests and tools that work
/// against a copy of the tree only need to change `sysfs_base`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the driver's sysfs tree. Must be absolute.
    /// Default: `/sys/pisound-micro`.
    pub sysfs_base: PathBuf,

    // ── Attribute access ─────────────────────────────────────────────
    /// How long to keep retrying an element attribute that is missing or
    /// not yet accessible. udev applies permissions shortly after an element
    /// appears. Default: 2 s.
    pub attr_timeout: Duration,
    /// Delay between attempts. Default: 1 ms.
    pub retry_interval: Duration,

    /// Fixed seed for generated element names. `None` seeds from the OS
    /// entropy source when the context opens.
    pub name_seed: Option<[u32; 4]>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_base: PathBuf::from(DEFAULT_SYSFS_BASE),
            attr_timeout: Duration::from_millis(2000),
            retry_interval: Duration::from_millis(1),
            name_seed: None,
        }
    }
}

impl Config {
    /// Default settings rooted at `sysfs_base`.
    pub fn with_base(sysfs_base: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_base: sysfs_base.into(),
            ..Self::default()
        }
    }
}

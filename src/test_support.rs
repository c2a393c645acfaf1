//! Throwaway sysfs-like tree for filesystem tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::Config;

static NEXT: AtomicUsize = AtomicUsize::new(0);

/// A directory shaped like the driver's sysfs tree, removed on drop.
///
/// Control files start empty and record everything written to them.
/// Elements do not appear by themselves; tests add the attributes they
/// need with [`add_element`](Self::add_element).
pub(crate) struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!(
            "pisound-micro-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("elements")).unwrap();
        for file in ["setup", "unsetup", "adc_offset", "adc_gain"] {
            fs::write(root.join(file), "").unwrap();
        }
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Settings for this tree with a short attribute timeout and a fixed
    /// name seed.
    pub fn config(&self) -> Config {
        Config {
            sysfs_base: self.root.clone(),
            attr_timeout: Duration::from_millis(30),
            retry_interval: Duration::from_millis(1),
            name_seed: Some([1, 2, 3, 4]),
        }
    }

    pub fn add_element(&self, name: &str, attrs: &[(&str, &str)]) {
        let dir = self.root.join("elements").join(name);
        fs::create_dir_all(&dir).unwrap();
        for (attr, value) in attrs {
            fs::write(dir.join(attr), value).unwrap();
        }
    }

    pub fn set_attr(&self, name: &str, attr: &str, value: &str) {
        fs::write(self.root.join("elements").join(name).join(attr), value).unwrap();
    }

    pub fn attr(&self, name: &str, attr: &str) -> String {
        fs::read_to_string(self.root.join("elements").join(name).join(attr)).unwrap()
    }

    pub fn remove_control(&self, file: &str) {
        fs::remove_file(self.root.join(file)).unwrap();
    }

    /// Everything written to `setup` so far.
    pub fn setup_log(&self) -> String {
        fs::read_to_string(self.root.join("setup")).unwrap()
    }

    /// Everything written to `unsetup` so far.
    pub fn unsetup_log(&self) -> String {
        fs::read_to_string(self.root.join("unsetup")).unwrap()
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

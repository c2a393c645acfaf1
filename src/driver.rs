//! Low-level sysfs driver.
//!
//! Knows the layout of the kernel driver's sysfs tree and how to talk to it:
//! control files under the base path, one directory per element, one file
//! per attribute. Everything here works on element names as plain strings;
//! lifetime tracking lives in [`Context`](crate::Context).
//!
//! This module is crate-private.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{ArgumentError, Error, Result};
use crate::value_fd::Access;

/// Longest attribute string that is read back.
const MAX_ATTR_LEN: usize = 63;

/// Longest integer value that is read back, sign included.
const MAX_VALUE_LEN: usize = 15;

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Per-element attribute file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attr {
    Type,
    Direction,
    Pin,
    PinName,
    PinPull,
    PinB,
    PinBName,
    PinBPull,
    InputMin,
    InputMax,
    ValueLow,
    ValueHigh,
    ValueMode,
    Value,
    ActivityType,
}

impl Attr {
    pub const fn file_name(self) -> &'static str {
        match self {
            Attr::Type => "type",
            Attr::Direction => "direction",
            Attr::Pin => "pin",
            Attr::PinName => "pin_name",
            Attr::PinPull => "pin_pull",
            Attr::PinB => "pin_b",
            Attr::PinBName => "pin_b_name",
            Attr::PinBPull => "pin_b_pull",
            Attr::InputMin => "input_min",
            Attr::InputMax => "input_max",
            Attr::ValueLow => "value_low",
            Attr::ValueHigh => "value_high",
            Attr::ValueMode => "value_mode",
            Attr::Value => "value",
            Attr::ActivityType => "activity_type",
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Sysfs access rooted at one base directory.
#[derive(Debug)]
pub(crate) struct SysfsDriver {
    base: PathBuf,
    attr_timeout: Duration,
    retry_interval: Duration,
}

impl SysfsDriver {
    /// # Errors
    /// * [`ArgumentError::InvalidBasePath`] if the base path is relative
    pub fn new(config: &Config) -> core::result::Result<Self, ArgumentError> {
        if !config.sysfs_base.is_absolute() {
            return Err(ArgumentError::InvalidBasePath);
        }
        Ok(Self {
            base: config.sysfs_base.clone(),
            attr_timeout: config.attr_timeout,
            retry_interval: config.retry_interval,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn element_dir(&self, name: &str) -> PathBuf {
        self.base.join("elements").join(name)
    }

    fn attr_path(&self, name: &str, attr: Attr) -> PathBuf {
        self.element_dir(name).join(attr.file_name())
    }

    // -----------------------------------------------------------------------
    // Control files
    // -----------------------------------------------------------------------

    /// Send one request line to `setup`.
    ///
    /// The driver rejects requests it cannot satisfy (pin busy, conflicting
    /// configuration) by failing the write.
    pub fn write_setup(&self, request: &str) -> io::Result<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("setup: {=str}", request);
        self.write_control("setup", request.as_bytes())
    }

    pub fn write_unsetup(&self, name: &str) -> io::Result<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("unsetup: {=str}", name);
        self.write_control("unsetup", name.as_bytes())
    }

    /// Each write to a control file is one command; the file offset is
    /// irrelevant, so the file is opened for appending.
    fn write_control(&self, file: &str, data: &[u8]) -> io::Result<()> {
        let mut f = OpenOptions::new().append(true).open(self.base.join(file))?;
        f.write_all(data)?;
        f.sync_data()
    }

    pub fn element_exists(&self, name: &str) -> bool {
        self.element_dir(name).is_dir()
    }

    // -----------------------------------------------------------------------
    // Attribute files
    // -----------------------------------------------------------------------

    /// Open an element attribute, waiting for it to appear and become
    /// accessible.
    ///
    /// # Errors
    /// * The last open error once `attr_timeout` has elapsed
    /// * Any error other than not-found or permission-denied, immediately
    pub fn open_attr(&self, name: &str, attr: Attr, access: Access) -> io::Result<File> {
        self.open_attr_with(name, attr, &access.options())
    }

    /// Attribute writes replace the whole content.
    fn open_attr_truncated(&self, name: &str, attr: Attr) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).truncate(true);
        self.open_attr_with(name, attr, &options)
    }

    fn open_attr_with(&self, name: &str, attr: Attr, options: &OpenOptions) -> io::Result<File> {
        let path = self.attr_path(name, attr);
        let started = Instant::now();
        loop {
            match options.open(&path) {
                Ok(f) => return Ok(f),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                    ) && started.elapsed() < self.attr_timeout =>
                {
                    thread::sleep(self.retry_interval);
                }
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("opening {=str} failed", attr.file_name());
                    return Err(e);
                }
            }
        }
    }

    /// Read a string attribute, cut at the first whitespace.
    pub fn read_str(&self, name: &str, attr: Attr) -> Result<heapless::String<MAX_ATTR_LEN>> {
        let mut f = self.open_attr(name, attr, Access::ReadOnly)?;
        let mut buf = [0u8; MAX_ATTR_LEN];
        let n = read_some(&mut f, &mut buf)?;

        let unexpected = || Error::UnexpectedValue { attr: attr.file_name() };
        let text = core::str::from_utf8(&buf[..n]).map_err(|_| unexpected())?;
        let word = text.split_ascii_whitespace().next().unwrap_or("");

        let mut out = heapless::String::new();
        out.push_str(word).map_err(|_| unexpected())?;
        Ok(out)
    }

    /// Read and parse a string attribute.
    pub fn read_parsed<T: FromStr>(&self, name: &str, attr: Attr) -> Result<T> {
        self.read_str(name, attr)?
            .parse()
            .map_err(|_| Error::UnexpectedValue { attr: attr.file_name() })
    }

    pub fn read_int(&self, name: &str, attr: Attr) -> Result<i32> {
        let mut f = self.open_attr(name, attr, Access::ReadOnly)?;
        read_value(&mut f, attr.file_name())
    }

    pub fn write_str(&self, name: &str, attr: Attr, value: &str) -> Result<()> {
        let mut f = self.open_attr_truncated(name, attr)?;
        f.write_all(value.as_bytes())?;
        f.sync_data()?;
        Ok(())
    }

    pub fn write_int(&self, name: &str, attr: Attr, value: i32) -> Result<()> {
        let mut f = self.open_attr_truncated(name, attr)?;
        write_value(&mut f, value)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // ADC calibration
    // -----------------------------------------------------------------------

    pub fn adc_offset(&self) -> Result<i16> {
        self.read_base_int("adc_offset")
    }

    pub fn set_adc_offset(&self, offset: i16) -> Result<()> {
        self.write_base_int("adc_offset", offset.into())
    }

    pub fn adc_gain(&self) -> Result<u16> {
        self.read_base_int("adc_gain")
    }

    pub fn set_adc_gain(&self, gain: u16) -> Result<()> {
        self.write_base_int("adc_gain", gain.into())
    }

    fn read_base_int<T: TryFrom<i32>>(&self, file: &'static str) -> Result<T> {
        let mut f = File::open(self.base.join(file))?;
        let raw = read_value(&mut f, file)?;
        T::try_from(raw).map_err(|_| Error::UnexpectedValue { attr: file })
    }

    fn write_base_int(&self, file: &'static str, value: i32) -> Result<()> {
        let mut f = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.base.join(file))?;
        write_value(&mut f, value)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Integer values
// ---------------------------------------------------------------------------

/// Read a decimal value from the start of `f`.
///
/// Shared by attribute reads and [`ValueFd`](crate::ValueFd), which keeps its
/// file open and reads it repeatedly.
pub(crate) fn read_value<F: Read + Seek>(f: &mut F, attr: &'static str) -> Result<i32> {
    f.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; MAX_VALUE_LEN];
    let n = read_some(f, &mut buf)?;

    core::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or(Error::UnexpectedValue { attr })
}

/// Write `value` in decimal at the start of `f` and flush it to the driver.
pub(crate) fn write_value(f: &mut File, value: i32) -> io::Result<()> {
    f.seek(SeekFrom::Start(0))?;
    f.write_all(value.to_string().as_bytes())?;
    f.sync_data()
}

/// Fill as much of `buf` as the file provides. Sysfs returns a whole
/// attribute per read, regular files may need several.
fn read_some<F: Read>(f: &mut F, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match f.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSysfs;

    fn driver(fake: &FakeSysfs) -> SysfsDriver {
        SysfsDriver::new(&fake.config()).unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────────────

    #[test]
    fn relative_base_is_rejected() {
        let config = Config::with_base("sys/pisound-micro");
        assert_eq!(
            SysfsDriver::new(&config).unwrap_err(),
            ArgumentError::InvalidBasePath
        );
    }

    #[test]
    fn attribute_paths() {
        let config = Config::default();
        let d = SysfsDriver::new(&config).unwrap();
        assert_eq!(
            d.attr_path("enc", Attr::PinBPull),
            Path::new("/sys/pisound-micro/elements/enc/pin_b_pull")
        );
    }

    // ── Control files ────────────────────────────────────────────────────────

    #[test]
    fn control_writes_are_recorded() {
        let fake = FakeSysfs::new();
        let d = driver(&fake);
        d.write_setup("a analog_in B23").unwrap();
        d.write_unsetup("a").unwrap();
        assert_eq!(fake.setup_log(), "a analog_in B23");
        assert_eq!(fake.unsetup_log(), "a");
    }

    #[test]
    fn element_exists_checks_directory() {
        let fake = FakeSysfs::new();
        let d = driver(&fake);
        assert!(!d.element_exists("x"));
        fake.add_element("x", &[]);
        assert!(d.element_exists("x"));
    }

    // ── Attributes ───────────────────────────────────────────────────────────

    #[test]
    fn string_attributes_stop_at_whitespace() {
        let fake = FakeSysfs::new();
        fake.add_element("g", &[("direction", "out\n"), ("type", "gpio extra")]);
        let d = driver(&fake);
        assert_eq!(d.read_str("g", Attr::Direction).unwrap().as_str(), "out");
        assert_eq!(d.read_str("g", Attr::Type).unwrap().as_str(), "gpio");
    }

    #[test]
    fn parsed_attribute_reports_attr_name() {
        let fake = FakeSysfs::new();
        fake.add_element("g", &[("direction", "sideways\n")]);
        let d = driver(&fake);
        let err = d
            .read_parsed::<crate::PinDirection>("g", Attr::Direction)
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue { attr: "direction" }));
    }

    #[test]
    fn integer_attributes_round_trip() {
        let fake = FakeSysfs::new();
        fake.add_element("e", &[("input_min", "0\n"), ("value_high", "-12\n")]);
        let d = driver(&fake);
        assert_eq!(d.read_int("e", Attr::ValueHigh).unwrap(), -12);

        d.write_int("e", Attr::InputMin, -100).unwrap();
        assert_eq!(d.read_int("e", Attr::InputMin).unwrap(), -100);
    }

    #[test]
    fn missing_attribute_times_out() {
        let fake = FakeSysfs::new();
        fake.add_element("e", &[]);
        let d = driver(&fake);
        let started = Instant::now();
        let err = d.read_int("e", Attr::Value).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(started.elapsed() >= fake.config().attr_timeout);
    }

    #[test]
    fn late_attribute_is_picked_up() {
        let fake = FakeSysfs::new();
        fake.add_element("late", &[]);
        let mut config = fake.config();
        config.attr_timeout = Duration::from_secs(2);
        let d = SysfsDriver::new(&config).unwrap();

        let path = fake.path().join("elements/late/value");
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            std::fs::write(path, "7\n").unwrap();
        });

        assert_eq!(d.read_int("late", Attr::Value).unwrap(), 7);
        writer.join().unwrap();
    }

    // ── ADC calibration ──────────────────────────────────────────────────────

    #[test]
    fn adc_calibration_round_trips() {
        let fake = FakeSysfs::new();
        let d = driver(&fake);
        d.set_adc_offset(-42).unwrap();
        d.set_adc_gain(4096).unwrap();
        assert_eq!(d.adc_offset().unwrap(), -42);
        assert_eq!(d.adc_gain().unwrap(), 4096);
    }

    #[test]
    fn adc_gain_out_of_range_is_unexpected() {
        let fake = FakeSysfs::new();
        std::fs::write(fake.path().join("adc_gain"), "-1\n").unwrap();
        let d = driver(&fake);
        assert!(matches!(
            d.adc_gain(),
            Err(Error::UnexpectedValue { attr: "adc_gain" })
        ));
    }
}

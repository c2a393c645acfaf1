//! Library context: owns the sysfs driver and tracks live elements.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rand_core::{OsRng, SeedableRng};

use crate::config::Config;
use crate::driver::SysfsDriver;
use crate::element::{Element, ElementInner, ElementKind, Kind};
use crate::error::{ArgumentError, Error, Result};
use crate::name::ElementName;
use crate::opts::{AnalogInputOpts, EncoderOpts};
use crate::pin::Pin;
use crate::random::{self, Xoshiro128StarStar};
use crate::request::format_request;
use crate::setup::Setup;
use crate::types::{ActivityType, PinPull};
use crate::{Activity, AnalogInput, Encoder, Gpio};

/// Registry slot for a tracked element.
struct Entry {
    id: u64,
    element: Weak<ElementInner>,
}

/// State shared between a [`Context`] and its elements.
pub(crate) struct Shared {
    pub(crate) driver: SysfsDriver,
    config: Config,
    registry: Mutex<HashMap<ElementName, Entry>>,
    rng: Mutex<Xoshiro128StarStar>,
    closed: AtomicBool,
    next_id: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    /// Called when the last handle to an element goes away.
    ///
    /// The registry may already hold a newer element under the same name, or
    /// none at all after [`Context::unsetup`] or [`Context::close`]; only the
    /// matching entry is removed and unsetup. Closing drains the registry, so
    /// handles that outlive the context find nothing here.
    pub(crate) fn release(&self, name: &ElementName, id: u64) {
        let mut registry = lock(&self.registry);
        if registry.get(name).map(|e| e.id) != Some(id) {
            return;
        }
        registry.remove(name);

        if let Err(_e) = self.driver.write_unsetup(name) {
            #[cfg(feature = "defmt")]
            defmt::warn!("unsetup of {} failed", name);
        }
    }
}

/// An open session with the Pisound Micro driver.
///
/// Elements set up through a context stay alive while any handle to them
/// exists. Closing or dropping the context unsetups every element it still
/// tracks; handles that outlive it remain valid Rust values but their sysfs
/// attributes are gone.
///
/// # Example
///
/// ```no_run
/// use pisound_micro::{Context, Pin, PinPull};
///
/// let ctx = Context::open()?;
/// let button = ctx.setup_gpio_input("button", Pin::B03, PinPull::Up)?;
/// let led = ctx.setup_gpio_output("led", Pin::B04, false)?;
///
/// led.set_value(button.value()?)?;
/// # Ok::<(), pisound_micro::Error>(())
/// ```
pub struct Context {
    shared: Arc<Shared>,
}

impl Context {
    /// Open a context on the default sysfs tree.
    pub fn open() -> Result<Self> {
        Self::open_with(Config::default())
    }

    /// Open a context with explicit settings.
    ///
    /// # Errors
    /// * [`ArgumentError::InvalidBasePath`] if `config.sysfs_base` is relative
    /// * [`Error::Io`](crate::Error::Io) if no seed is configured and the
    ///   OS entropy source fails
    pub fn open_with(config: Config) -> Result<Self> {
        let driver = SysfsDriver::new(&config)?;
        let rng = match config.name_seed {
            Some(seed) => random::seeded(seed),
            None => Xoshiro128StarStar::from_rng(OsRng).map_err(io::Error::from)?,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                driver,
                config,
                registry: Mutex::new(HashMap::new()),
                rng: Mutex::new(rng),
                closed: AtomicBool::new(false),
                next_id: AtomicU64::new(0),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Unsetup every tracked element and close the context.
    ///
    /// All elements are attempted; the first failure is returned.
    pub fn close(self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&self) -> Result<()> {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut registry = lock(&self.shared.registry);
        let mut result = Ok(());
        for (name, _) in registry.drain() {
            if let Err(e) = self.shared.driver.write_unsetup(&name) {
                #[cfg(feature = "defmt")]
                defmt::warn!("unsetup of {} failed", name);
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }
        result
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Generate a random element name, optionally prefixed with
    /// `<prefix>-`.
    ///
    /// # Errors
    /// * [`ArgumentError::InvalidName`] if the prefix is longer than
    ///   [`MAX_PREFIX_LEN`](crate::MAX_PREFIX_LEN) or contains `/`
    pub fn random_name(&self, prefix: &str) -> core::result::Result<ElementName, ArgumentError> {
        ElementName::randomized(prefix, &mut *lock(&self.shared.rng))
    }

    // -----------------------------------------------------------------------
    // Element setup
    // -----------------------------------------------------------------------

    /// Create an element, or get another handle to an element of the same
    /// name.
    ///
    /// The request is sent to the driver even when the name is already
    /// tracked: an identical configuration is accepted, anything else is
    /// refused. An element left over in sysfs from an earlier process is
    /// adopted if the driver accepts the request.
    ///
    /// # Errors
    /// * [`ArgumentError`] for an invalid name or an incomplete setup
    /// * [`ArgumentError::NameInUse`] if the name is tracked as a different
    ///   kind of element
    /// * [`Error::Io`](crate::Error::Io) if the driver refuses the request
    pub fn setup(&self, name: &str, setup: Setup) -> Result<ElementKind> {
        let name = ElementName::new(name)?;
        let request = format_request(&name, setup)?;
        let kind = Kind::of(setup.element_type()).ok_or(ArgumentError::InvalidElementType)?;

        let mut registry = lock(&self.shared.registry);

        if let Some(entry) = registry.get(&name) {
            if let Some(inner) = entry.element.upgrade() {
                let sent = if inner.kind != kind {
                    Err(ArgumentError::NameInUse.into())
                } else {
                    self.shared.driver.write_setup(&request).map_err(Error::from)
                };
                // `inner` may turn out to be the last handle, and its drop
                // takes the registry lock.
                drop(registry);
                sent?;
                return Ok(Element::from_inner(inner).into_kind());
            }

            // The last handle is being dropped on another thread. Its release
            // finds a different id once the new entry is in and does nothing,
            // so the old element is removed here.
            self.shared.driver.write_unsetup(&name)?;
            registry.remove(&name);
        }

        #[cfg(feature = "defmt")]
        if self.shared.driver.element_exists(&name) {
            defmt::debug!("adopting existing element {}", name);
        }
        self.shared.driver.write_setup(&request)?;

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::new(ElementInner {
            id,
            name: name.clone(),
            setup,
            kind,
            ctx: Arc::clone(&self.shared),
        });
        registry.insert(
            name,
            Entry {
                id,
                element: Arc::downgrade(&inner),
            },
        );

        Ok(Element::from_inner(inner).into_kind())
    }

    pub fn setup_gpio_input(&self, name: &str, pin: Pin, pull: PinPull) -> Result<Gpio> {
        let setup = Setup::for_gpio_input(pin, pull)?;
        self.setup(name, setup)?
            .into_gpio()
            .ok_or_else(|| ArgumentError::NameInUse.into())
    }

    pub fn setup_gpio_output(&self, name: &str, pin: Pin, high: bool) -> Result<Gpio> {
        let setup = Setup::for_gpio_output(pin, high)?;
        self.setup(name, setup)?
            .into_gpio()
            .ok_or_else(|| ArgumentError::NameInUse.into())
    }

    /// Set up an analog input and apply `opts` if given.
    pub fn setup_analog_input(
        &self,
        name: &str,
        pin: Pin,
        opts: Option<&AnalogInputOpts>,
    ) -> Result<AnalogInput> {
        let setup = Setup::for_analog_input(pin)?;
        let input = self
            .setup(name, setup)?
            .into_analog_input()
            .ok_or(ArgumentError::NameInUse)?;
        if let Some(opts) = opts {
            input.set_opts(opts)?;
        }
        Ok(input)
    }

    /// Set up an encoder and apply `opts` if given.
    pub fn setup_encoder(
        &self,
        name: &str,
        pin_a: Pin,
        pull_a: PinPull,
        pin_b: Pin,
        pull_b: PinPull,
        opts: Option<&EncoderOpts>,
    ) -> Result<Encoder> {
        let setup = Setup::for_encoder(pin_a, pull_a, pin_b, pull_b)?;
        let encoder = self
            .setup(name, setup)?
            .into_encoder()
            .ok_or(ArgumentError::NameInUse)?;
        if let Some(opts) = opts {
            encoder.set_opts(opts)?;
        }
        Ok(encoder)
    }

    pub fn setup_activity(&self, name: &str, pin: Pin, activity: ActivityType) -> Result<Activity> {
        let setup = Setup::for_activity(pin, activity)?;
        self.setup(name, setup)?
            .into_activity()
            .ok_or_else(|| ArgumentError::NameInUse.into())
    }

    // -----------------------------------------------------------------------
    // Lookup and removal
    // -----------------------------------------------------------------------

    /// Another handle to a tracked element, if `name` is alive.
    pub fn element(&self, name: &str) -> Option<Element> {
        let name = ElementName::new(name).ok()?;
        let registry = lock(&self.shared.registry);
        registry
            .get(&name)
            .and_then(|e| e.element.upgrade())
            .map(Element::from_inner)
    }

    /// Remove an element by name, whether or not this context tracks it.
    ///
    /// Meant for cleaning up after a process that exited without unsetting
    /// its elements. Handles to a tracked element stay usable as values but
    /// no longer unsetup anything when dropped.
    pub fn unsetup(&self, name: &str) -> Result<()> {
        let name = ElementName::new(name)?;
        let mut registry = lock(&self.shared.registry);
        registry.remove(&name);
        self.shared.driver.write_unsetup(&name)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // ADC calibration
    // -----------------------------------------------------------------------

    pub fn adc_offset(&self) -> Result<i16> {
        self.shared.driver.adc_offset()
    }

    pub fn set_adc_offset(&self, offset: i16) -> Result<()> {
        self.shared.driver.set_adc_offset(offset)
    }

    pub fn adc_gain(&self) -> Result<u16> {
        self.shared.driver.adc_gain()
    }

    pub fn set_adc_gain(&self, gain: u16) -> Result<()> {
        self.shared.driver.set_adc_gain(gain)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(_e) = self.shutdown() {
            #[cfg(feature = "defmt")]
            defmt::warn!("closing context failed: {}", _e);
        }
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("sysfs_base", &self.shared.driver.base())
            .field("elements", &lock(&self.shared.registry).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSysfs;
    use crate::types::ElementType;

    fn open(fake: &FakeSysfs) -> Context {
        Context::open_with(fake.config()).unwrap()
    }

    // ── Opening ──────────────────────────────────────────────────────────────

    #[test]
    fn relative_base_is_rejected() {
        let err = Context::open_with(Config::with_base("relative")).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(ArgumentError::InvalidBasePath)
        ));
    }

    // ── Setup and release ────────────────────────────────────────────────────

    #[test]
    fn setup_writes_request() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let enc = ctx
            .setup_encoder("enc", Pin::B03, PinPull::Up, Pin::B04, PinPull::Up, None)
            .unwrap();
        assert_eq!(fake.setup_log(), "enc encoder B03 pull_up B04 pull_up");
        assert_eq!(enc.name().as_str(), "enc");
        assert_eq!(enc.setup_type(), ElementType::Encoder);
    }

    #[test]
    fn dropping_last_handle_unsetups() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let gpio = ctx.setup_gpio_output("led", Pin::B05, true).unwrap();
        let copy = gpio.clone();

        drop(gpio);
        assert_eq!(fake.unsetup_log(), "");
        assert!(ctx.element("led").is_some());

        drop(copy);
        assert_eq!(fake.unsetup_log(), "led");
        assert!(ctx.element("led").is_none());
    }

    #[test]
    fn same_name_shares_element() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let a = ctx.setup_analog_input("pot", Pin::B23, None).unwrap();
        let b = ctx.setup_analog_input("pot", Pin::B23, None).unwrap();
        assert_eq!(fake.setup_log(), "pot analog_in B23pot analog_in B23");

        drop(a);
        assert_eq!(fake.unsetup_log(), "");
        drop(b);
        assert_eq!(fake.unsetup_log(), "pot");
    }

    #[test]
    fn same_name_different_kind_is_refused() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let _pot = ctx.setup_analog_input("x", Pin::B23, None).unwrap();
        let err = ctx.setup_gpio_input("x", Pin::B03, PinPull::None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ArgumentError::NameInUse)));
        assert_eq!(fake.setup_log(), "x analog_in B23");
    }

    #[test]
    fn invalid_setups_never_reach_the_driver() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        assert!(ctx.setup("bad/name", Setup::for_analog_input(Pin::B23).unwrap()).is_err());
        assert!(ctx.setup("none", Setup::default()).is_err());
        assert!(ctx
            .setup_encoder("e", Pin::B03, PinPull::Up, Pin::B03, PinPull::Up, None)
            .is_err());
        assert_eq!(fake.setup_log(), "");
    }

    #[test]
    fn refused_request_is_not_tracked() {
        let fake = FakeSysfs::new();
        fake.remove_control("setup");
        let ctx = open(&fake);
        let err = ctx.setup_gpio_input("b", Pin::B03, PinPull::Up).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(ctx.element("b").is_none());
    }

    #[test]
    fn setup_dispatches_on_element_type() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let kind = ctx
            .setup("act", Setup::for_activity(Pin::B09, ActivityType::MidiOutput).unwrap())
            .unwrap();
        assert!(matches!(kind, ElementKind::Activity(_)));
        assert_eq!(fake.setup_log(), "act activity_midi_out B09");
    }

    // ── Threads ──────────────────────────────────────────────────────────────

    #[test]
    fn handles_are_thread_safe() {
        fn send_sync<T: Send + Sync>() {}
        fn send<T: Send>() {}
        send_sync::<Context>();
        send_sync::<Element>();
        send_sync::<ElementKind>();
        send_sync::<Gpio>();
        send_sync::<Encoder>();
        send_sync::<AnalogInput>();
        send_sync::<Activity>();
        send::<crate::ValueFd>();
    }

    #[test]
    fn concurrent_setup_and_drop_of_one_name() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let g = ctx.setup_gpio_input("g", Pin::B03, PinPull::Up).unwrap();
                        assert_eq!(g.name().as_str(), "g");
                        drop(g);
                    }
                });
            }
        });

        assert!(ctx.element("g").is_none());
        assert!(fake.unsetup_log().starts_with('g'));
    }

    // ── Close ────────────────────────────────────────────────────────────────

    #[test]
    fn close_unsetups_every_live_element() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let a = ctx.setup_gpio_input("a", Pin::B03, PinPull::Up).unwrap();
        let b = ctx.setup_gpio_input("bb", Pin::B04, PinPull::Up).unwrap();

        ctx.close().unwrap();
        let log = fake.unsetup_log();
        assert_eq!(log.len(), 3);
        assert!(log.contains('a'));
        assert!(log.contains("bb"));

        // Handles outliving the context do not unsetup again.
        drop(a);
        drop(b);
        assert_eq!(fake.unsetup_log().len(), 3);
    }

    #[test]
    fn dropping_context_closes_it() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let _keep = ctx.setup_analog_input("k", Pin::B23, None).unwrap();
        drop(ctx);
        assert_eq!(fake.unsetup_log(), "k");
    }

    // ── Unsetup by name ──────────────────────────────────────────────────────

    #[test]
    fn unsetup_untracked_name() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        ctx.unsetup("stale").unwrap();
        assert_eq!(fake.unsetup_log(), "stale");
    }

    #[test]
    fn unsetup_tracked_name_detaches_handles() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        let g = ctx.setup_gpio_input("g", Pin::B03, PinPull::Up).unwrap();
        ctx.unsetup("g").unwrap();
        drop(g);
        assert_eq!(fake.unsetup_log(), "g");
    }

    // ── Names ────────────────────────────────────────────────────────────────

    #[test]
    fn random_names_follow_seed() {
        let fake = FakeSysfs::new();
        let a = open(&fake);
        let b = open(&fake);
        let name = a.random_name("").unwrap();
        assert_eq!(name, b.random_name("").unwrap());
        assert_eq!(name.len(), 22);

        let prefixed = a.random_name("enc").unwrap();
        assert!(prefixed.starts_with("enc-"));
        assert_eq!(prefixed.len(), 4 + 22);
        assert_ne!(&prefixed[4..], name.as_str());
    }

    #[test]
    fn unseeded_contexts_draw_from_os_entropy() {
        let fake = FakeSysfs::new();
        let mut config = fake.config();
        config.name_seed = None;
        let a = Context::open_with(config.clone()).unwrap();
        let b = Context::open_with(config).unwrap();
        assert_ne!(a.random_name("").unwrap(), b.random_name("").unwrap());
    }

    // ── ADC calibration ──────────────────────────────────────────────────────

    #[test]
    fn adc_calibration_passes_through() {
        let fake = FakeSysfs::new();
        let ctx = open(&fake);
        ctx.set_adc_offset(12).unwrap();
        ctx.set_adc_gain(2048).unwrap();
        assert_eq!(ctx.adc_offset().unwrap(), 12);
        assert_eq!(ctx.adc_gain().unwrap(), 2048);
    }
}

//! Element handles.

use core::fmt;
use std::sync::Arc;

use crate::context::Shared;
use crate::driver::{Attr, SysfsDriver};
use crate::error::Result;
use crate::name::ElementName;
use crate::pin::Pin;
use crate::setup::Setup;
use crate::types::ElementType;
use crate::value_fd::{Access, ValueFd};
use crate::{Activity, AnalogInput, Encoder, Gpio};

/// Element kinds that can exist in the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Encoder,
    AnalogInput,
    Gpio,
    Activity,
}

impl Kind {
    pub(crate) fn of(element_type: ElementType) -> Option<Kind> {
        match element_type {
            ElementType::Encoder => Some(Kind::Encoder),
            ElementType::AnalogInput => Some(Kind::AnalogInput),
            ElementType::Gpio => Some(Kind::Gpio),
            ElementType::Activity => Some(Kind::Activity),
            ElementType::None | ElementType::Invalid => None,
        }
    }
}

pub(crate) struct ElementInner {
    pub(crate) id: u64,
    pub(crate) name: ElementName,
    pub(crate) setup: Setup,
    pub(crate) kind: Kind,
    pub(crate) ctx: Arc<Shared>,
}

impl Drop for ElementInner {
    fn drop(&mut self) {
        self.ctx.release(&self.name, self.id);
    }
}

/// Handle to an element set up through a [`Context`](crate::Context).
///
/// Cloning is cheap and yields another handle to the same element. When the
/// last handle is dropped the element is unsetup.
#[derive(Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

impl Element {
    pub(crate) fn from_inner(inner: Arc<ElementInner>) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &ElementName {
        &self.inner.name
    }

    /// The setup the element was created with.
    pub fn setup(&self) -> Setup {
        self.inner.setup
    }

    /// Element type recorded at creation, without touching sysfs.
    pub fn setup_type(&self) -> ElementType {
        self.inner.setup.element_type()
    }

    /// Element type as reported by the driver.
    pub fn element_type(&self) -> Result<ElementType> {
        self.read_parsed(Attr::Type)
    }

    /// Main pin as reported by the driver. An index the driver reports but
    /// this crate does not know reads as [`Pin::Invalid`].
    pub fn pin(&self) -> Result<Pin> {
        self.read_pin(Attr::Pin)
    }

    /// Main pin by the header label the driver reports, such as `B03`.
    pub fn pin_name(&self) -> Result<Pin> {
        self.read_parsed(Attr::PinName)
    }

    /// Open the `value` attribute for repeated access.
    pub fn open_value_fd(&self, access: Access) -> Result<ValueFd> {
        let file = self.driver().open_attr(&self.inner.name, Attr::Value, access)?;
        Ok(ValueFd::new(file))
    }

    /// Typed view of this element.
    pub fn into_kind(self) -> ElementKind {
        match self.inner.kind {
            Kind::Encoder => ElementKind::Encoder(Encoder::new(self)),
            Kind::AnalogInput => ElementKind::AnalogInput(AnalogInput::new(self)),
            Kind::Gpio => ElementKind::Gpio(Gpio::new(self)),
            Kind::Activity => ElementKind::Activity(Activity::new(self)),
        }
    }

    // -----------------------------------------------------------------------
    // Attribute helpers for the typed views
    // -----------------------------------------------------------------------

    fn driver(&self) -> &SysfsDriver {
        &self.inner.ctx.driver
    }

    pub(crate) fn read_parsed<T: core::str::FromStr>(&self, attr: Attr) -> Result<T> {
        self.driver().read_parsed(&self.inner.name, attr)
    }

    pub(crate) fn read_int(&self, attr: Attr) -> Result<i32> {
        self.driver().read_int(&self.inner.name, attr)
    }

    pub(crate) fn write_int(&self, attr: Attr, value: i32) -> Result<()> {
        self.driver().write_int(&self.inner.name, attr, value)
    }

    pub(crate) fn write_str(&self, attr: Attr, value: &str) -> Result<()> {
        self.driver().write_str(&self.inner.name, attr, value)
    }

    pub(crate) fn read_pin(&self, attr: Attr) -> Result<Pin> {
        let index = self.read_int(attr)?;
        Ok(u32::try_from(index).map_or(Pin::Invalid, Pin::from_index))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.inner.name.as_str())
            .field("setup", &self.inner.setup)
            .finish()
    }
}

/// An element, resolved to its type.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Encoder(Encoder),
    AnalogInput(AnalogInput),
    Gpio(Gpio),
    Activity(Activity),
}

impl ElementKind {
    pub fn element(&self) -> &Element {
        match self {
            ElementKind::Encoder(e) => &**e,
            ElementKind::AnalogInput(a) => &**a,
            ElementKind::Gpio(g) => &**g,
            ElementKind::Activity(a) => &**a,
        }
    }

    pub fn into_element(self) -> Element {
        match self {
            ElementKind::Encoder(e) => e.into_element(),
            ElementKind::AnalogInput(a) => a.into_element(),
            ElementKind::Gpio(g) => g.into_element(),
            ElementKind::Activity(a) => a.into_element(),
        }
    }

    pub fn into_encoder(self) -> Option<Encoder> {
        match self {
            ElementKind::Encoder(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_analog_input(self) -> Option<AnalogInput> {
        match self {
            ElementKind::AnalogInput(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_gpio(self) -> Option<Gpio> {
        match self {
            ElementKind::Gpio(g) => Some(g),
            _ => None,
        }
    }

    pub fn into_activity(self) -> Option<Activity> {
        match self {
            ElementKind::Activity(a) => Some(a),
            _ => None,
        }
    }
}

/// Declares a typed element view that derefs to [`Element`].
macro_rules! element_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            element: $crate::element::Element,
        }

        impl $name {
            pub(crate) fn new(element: $crate::element::Element) -> Self {
                Self { element }
            }

            pub fn into_element(self) -> $crate::element::Element {
                self.element
            }
        }

        impl ::core::ops::Deref for $name {
            type Target = $crate::element::Element;

            fn deref(&self) -> &Self::Target {
                &self.element
            }
        }

        impl From<$name> for $crate::element::Element {
            fn from(view: $name) -> Self {
                view.element
            }
        }
    };
}

pub(crate) use element_view;

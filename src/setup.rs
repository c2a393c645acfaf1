//! Packed element setup word.
//!
//! A [`Setup`] is a plain `u32` describing one element: its type, the header
//! pin(s) it occupies and the type-specific options. It is the value handed to
//! the kernel driver, so the bit layout is fixed.
//!
//! Encoding is strict and decoding is lenient. Every `with_*` setter and
//! `for_*` constructor rejects values outside their enum's domain, while
//! getters never fail: a field that does not apply to the element type, or
//! holds an unknown bit pattern, reads back as the `Invalid` member.

use core::fmt;

use crate::error::ArgumentError;
use crate::fields;
use crate::pin::Pin;
use crate::types::{ActivityType, ElementType, PinDirection, PinPull};

/// Packed element setup.
///
/// ```
/// use pisound_micro::{ElementType, Pin, PinPull, Setup};
///
/// let setup = Setup::for_gpio_input(Pin::B03, PinPull::Up).unwrap();
/// assert_eq!(setup.element_type(), ElementType::Gpio);
/// assert_eq!(setup.pin(), Pin::B03);
/// assert_eq!(setup.gpio_pull(), PinPull::Up);
///
/// // Raw words are never rejected, only decoded leniently.
/// let junk = Setup::from_int(0xffff_ffff);
/// assert_eq!(junk.element_type(), ElementType::Invalid);
/// assert_eq!(junk.pin(), Pin::Invalid);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Setup(u32);

impl Setup {
    /// Wrap a raw word without validation.
    pub const fn from_int(raw: u32) -> Self {
        Setup(raw)
    }

    pub const fn to_int(self) -> u32 {
        self.0
    }

    // -----------------------------------------------------------------------
    // Named constructors
    // -----------------------------------------------------------------------

    /// GPIO input on `pin` with the given pull.
    pub fn for_gpio_input(pin: Pin, pull: PinPull) -> Result<Self, ArgumentError> {
        Setup::default()
            .with_element_type(ElementType::Gpio)?
            .with_pin(pin)?
            .with_gpio_direction(PinDirection::Input)?
            .with_gpio_pull(pull)
    }

    /// GPIO output on `pin`, driven high initially when `high` is set.
    pub fn for_gpio_output(pin: Pin, high: bool) -> Result<Self, ArgumentError> {
        Setup::default()
            .with_element_type(ElementType::Gpio)?
            .with_pin(pin)?
            .with_gpio_direction(PinDirection::Output)?
            .with_gpio_output(high)
    }

    pub fn for_analog_input(pin: Pin) -> Result<Self, ArgumentError> {
        Setup::default()
            .with_element_type(ElementType::AnalogInput)?
            .with_pin(pin)
    }

    /// Rotary encoder on two distinct pins.
    pub fn for_encoder(
        pin_a: Pin,
        pull_a: PinPull,
        pin_b: Pin,
        pull_b: PinPull,
    ) -> Result<Self, ArgumentError> {
        let setup = Setup::default()
            .with_element_type(ElementType::Encoder)?
            .with_pin(pin_a)?
            .with_gpio_pull(pull_a)?
            .with_encoder_pin_b(pin_b)?
            .with_encoder_pin_b_pull(pull_b)?;

        if pin_a == pin_b {
            return Err(ArgumentError::DuplicatePin);
        }
        Ok(setup)
    }

    pub fn for_activity(pin: Pin, activity: ActivityType) -> Result<Self, ArgumentError> {
        Setup::default()
            .with_element_type(ElementType::Activity)?
            .with_pin(pin)?
            .with_activity_type(activity)
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    pub const fn element_type(self) -> ElementType {
        ElementType::from_bits(fields::ELEMENT_TYPE.get(self.0))
    }

    /// Main pin, or [`Pin::Invalid`] for types without a pin.
    pub const fn pin(self) -> Pin {
        if self.element_type().has_pin() {
            Pin::from_index(fields::PIN.get(self.0))
        } else {
            Pin::Invalid
        }
    }

    /// Direction of a GPIO; `Invalid` for other types.
    pub const fn gpio_direction(self) -> PinDirection {
        match self.element_type() {
            ElementType::Gpio => PinDirection::from_bits(fields::GPIO_DIRECTION.get(self.0)),
            _ => PinDirection::Invalid,
        }
    }

    /// Pull of a GPIO input, or of an encoder's first pin.
    pub const fn gpio_pull(self) -> PinPull {
        if self.pull_applies() {
            PinPull::from_bits(fields::GPIO_PULL.get(self.0))
        } else {
            PinPull::Invalid
        }
    }

    /// Initial level of a GPIO output; `None` for anything else.
    pub const fn gpio_output(self) -> Option<bool> {
        if self.output_applies() {
            Some(fields::GPIO_OUTPUT.get(self.0) != 0)
        } else {
            None
        }
    }

    pub const fn encoder_pin_b(self) -> Pin {
        match self.element_type() {
            ElementType::Encoder => Pin::from_index(fields::ENCODER_PIN_B.get(self.0)),
            _ => Pin::Invalid,
        }
    }

    pub const fn encoder_pin_b_pull(self) -> PinPull {
        match self.element_type() {
            ElementType::Encoder => PinPull::from_bits(fields::ENCODER_PIN_B_PULL.get(self.0)),
            _ => PinPull::Invalid,
        }
    }

    pub const fn activity_type(self) -> ActivityType {
        match self.element_type() {
            ElementType::Activity => ActivityType::from_bits(fields::ACTIVITY_TYPE.get(self.0)),
            _ => ActivityType::Invalid,
        }
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    /// Start over with only the element type set. Every other field is reset.
    pub fn with_element_type(self, element_type: ElementType) -> Result<Self, ArgumentError> {
        let bits = element_type
            .to_bits()
            .ok_or(ArgumentError::InvalidElementType)?;
        Ok(Setup(fields::ELEMENT_TYPE.set(0, bits)))
    }

    pub fn with_pin(self, pin: Pin) -> Result<Self, ArgumentError> {
        if !pin.is_valid() {
            return Err(ArgumentError::InvalidPin);
        }
        if !self.element_type().has_pin() {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::PIN.set(self.0, pin.index() as u32)))
    }

    /// Set the direction of a GPIO.
    ///
    /// Pull and output level share bits, so switching direction resets them.
    pub fn with_gpio_direction(self, direction: PinDirection) -> Result<Self, ArgumentError> {
        let bits = direction.to_bits().ok_or(ArgumentError::InvalidDirection)?;
        if self.element_type() != ElementType::Gpio {
            return Err(ArgumentError::NotApplicable);
        }
        if self.gpio_direction() == direction {
            return Ok(self);
        }

        let word = self.0 & !(fields::GPIO_PULL.mask() | fields::GPIO_OUTPUT.mask());
        Ok(Setup(fields::GPIO_DIRECTION.set(word, bits)))
    }

    pub fn with_gpio_pull(self, pull: PinPull) -> Result<Self, ArgumentError> {
        let bits = pull.to_bits().ok_or(ArgumentError::InvalidPull)?;
        if !self.pull_applies() {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::GPIO_PULL.set(self.0, bits)))
    }

    pub fn with_gpio_output(self, high: bool) -> Result<Self, ArgumentError> {
        if !self.output_applies() {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::GPIO_OUTPUT.set(self.0, high as u32)))
    }

    pub fn with_encoder_pin_b(self, pin: Pin) -> Result<Self, ArgumentError> {
        if !pin.is_valid() {
            return Err(ArgumentError::InvalidPin);
        }
        if self.element_type() != ElementType::Encoder {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::ENCODER_PIN_B.set(self.0, pin.index() as u32)))
    }

    pub fn with_encoder_pin_b_pull(self, pull: PinPull) -> Result<Self, ArgumentError> {
        let bits = pull.to_bits().ok_or(ArgumentError::InvalidPull)?;
        if self.element_type() != ElementType::Encoder {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::ENCODER_PIN_B_PULL.set(self.0, bits)))
    }

    pub fn with_activity_type(self, activity: ActivityType) -> Result<Self, ArgumentError> {
        let bits = activity
            .to_bits()
            .ok_or(ArgumentError::InvalidActivityType)?;
        if self.element_type() != ElementType::Activity {
            return Err(ArgumentError::NotApplicable);
        }
        Ok(Setup(fields::ACTIVITY_TYPE.set(self.0, bits)))
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    const fn pull_applies(self) -> bool {
        match self.element_type() {
            ElementType::Encoder => true,
            ElementType::Gpio => {
                matches!(
                    PinDirection::from_bits(fields::GPIO_DIRECTION.get(self.0)),
                    PinDirection::Input
                )
            }
            _ => false,
        }
    }

    const fn output_applies(self) -> bool {
        matches!(self.element_type(), ElementType::Gpio)
            && matches!(
                PinDirection::from_bits(fields::GPIO_DIRECTION.get(self.0)),
                PinDirection::Output
            )
    }
}

impl From<u32> for Setup {
    fn from(raw: u32) -> Self {
        Setup::from_int(raw)
    }
}

impl From<Setup> for u32 {
    fn from(setup: Setup) -> Self {
        setup.to_int()
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = f.debug_struct("Setup");
        s.field("raw", &format_args!("{:#010x}", self.0));
        s.field("type", &self.element_type());
        match self.element_type() {
            ElementType::Encoder => {
                s.field("pin", &self.pin())
                    .field("pull", &self.gpio_pull())
                    .field("pin_b", &self.encoder_pin_b())
                    .field("pull_b", &self.encoder_pin_b_pull());
            }
            ElementType::AnalogInput => {
                s.field("pin", &self.pin());
            }
            ElementType::Gpio => {
                s.field("pin", &self.pin())
                    .field("direction", &self.gpio_direction());
                match self.gpio_direction() {
                    PinDirection::Input => {
                        s.field("pull", &self.gpio_pull());
                    }
                    PinDirection::Output => {
                        s.field("output", &self.gpio_output());
                    }
                    PinDirection::Invalid => {}
                }
            }
            ElementType::Activity => {
                s.field("pin", &self.pin())
                    .field("activity", &self.activity_type());
            }
            ElementType::None | ElementType::Invalid => {}
        }
        s.finish()
    }
}

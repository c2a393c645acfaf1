//! Text requests understood by the driver's `setup` control file.

use core::fmt::Write;

use heapless::String;

use crate::error::ArgumentError;
use crate::name::ElementName;
use crate::pin::Pin;
use crate::setup::Setup;
use crate::types::{ActivityType, ElementType, PinDirection, PinPull};

/// Longest request the driver accepts.
pub const MAX_REQUEST_LEN: usize = 128;

pub type Request = String<MAX_REQUEST_LEN>;

/// Render the setup request for `name`.
///
/// The setup is validated field by field, so a hand-built or corrupted raw
/// word fails here instead of in the kernel.
///
/// ```
/// use pisound_micro::{format_request, ElementName, Pin, PinPull, Setup};
///
/// let name = ElementName::new("button").unwrap();
/// let setup = Setup::for_gpio_input(Pin::B03, PinPull::Up).unwrap();
/// assert_eq!(
///     format_request(&name, setup).unwrap().as_str(),
///     "button gpio B03 input pull_up",
/// );
/// ```
pub fn format_request(name: &ElementName, setup: Setup) -> Result<Request, ArgumentError> {
    if !setup.element_type().has_pin() {
        return Err(ArgumentError::InvalidElementType);
    }
    let pin = valid_pin(setup.pin())?;
    let mut out = Request::new();

    let written = match setup.element_type() {
        ElementType::Encoder => write!(
            out,
            "{} encoder {} {} {} {}",
            name,
            pin,
            valid_pull(setup.gpio_pull())?,
            valid_pin(setup.encoder_pin_b())?,
            valid_pull(setup.encoder_pin_b_pull())?,
        ),
        ElementType::AnalogInput => write!(out, "{} analog_in {}", name, pin),
        ElementType::Gpio => match setup.gpio_direction() {
            PinDirection::Input => write!(
                out,
                "{} gpio {} input {}",
                name,
                pin,
                valid_pull(setup.gpio_pull())?,
            ),
            PinDirection::Output => write!(
                out,
                "{} gpio {} output {}",
                name,
                pin,
                if setup.gpio_output() == Some(true) { '1' } else { '0' },
            ),
            PinDirection::Invalid => return Err(ArgumentError::InvalidDirection),
        },
        ElementType::Activity => {
            let activity = setup.activity_type();
            if activity == ActivityType::Invalid {
                return Err(ArgumentError::InvalidActivityType);
            }
            write!(out, "{} activity_{} {}", name, activity, pin)
        }
        ElementType::None | ElementType::Invalid => {
            return Err(ArgumentError::InvalidElementType)
        }
    };

    // Names are capped well below the buffer size, so this only trips on a
    // layout change.
    written.map_err(|_| ArgumentError::InvalidName)?;
    Ok(out)
}

fn valid_pin(pin: Pin) -> Result<Pin, ArgumentError> {
    if pin.is_valid() {
        Ok(pin)
    } else {
        Err(ArgumentError::InvalidPin)
    }
}

fn valid_pull(pull: PinPull) -> Result<PinPull, ArgumentError> {
    if pull == PinPull::Invalid {
        Err(ArgumentError::InvalidPull)
    } else {
        Ok(pull)
    }
}

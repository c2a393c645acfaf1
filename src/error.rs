//! Error types for setup encoding and element management.

use core::fmt;

/// A value passed to a setup setter, constructor or element call was outside
/// its legal domain.
///
/// Getters never produce this error; they decode unknown bit patterns to the
/// `Invalid` member of the relevant enum instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    /// Element type is not one of NONE, ENCODER, ANALOG_INPUT, GPIO, ACTIVITY.
    InvalidElementType,
    /// Pin is [`Pin::Invalid`](crate::Pin::Invalid) or not a header pin.
    InvalidPin,
    /// Direction is [`PinDirection::Invalid`](crate::PinDirection::Invalid).
    InvalidDirection,
    /// Pull is [`PinPull::Invalid`](crate::PinPull::Invalid).
    InvalidPull,
    /// Activity type is [`ActivityType::Invalid`](crate::ActivityType::Invalid).
    InvalidActivityType,
    /// Value mode is [`ValueMode::Invalid`](crate::ValueMode::Invalid).
    InvalidValueMode,
    /// The field does not exist for the setup's element type (or GPIO direction).
    NotApplicable,
    /// An encoder was given the same pin for A and B.
    DuplicatePin,
    /// Element name is empty, too long or contains `/`.
    InvalidName,
    /// Element name is already set up as a different kind of element.
    NameInUse,
    /// Sysfs base path is not absolute.
    InvalidBasePath,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArgumentError::InvalidElementType => write!(f, "Invalid element type"),
            ArgumentError::InvalidPin => write!(f, "Invalid pin"),
            ArgumentError::InvalidDirection => write!(f, "Invalid pin direction"),
            ArgumentError::InvalidPull => write!(f, "Invalid pin pull"),
            ArgumentError::InvalidActivityType => write!(f, "Invalid activity type"),
            ArgumentError::InvalidValueMode => write!(f, "Invalid value mode"),
            ArgumentError::NotApplicable => {
                write!(f, "Field does not apply to this element type")
            }
            ArgumentError::DuplicatePin => write!(f, "Encoder pins A and B must differ"),
            ArgumentError::InvalidName => {
                write!(f, "Element name must be 1-63 bytes without '/'")
            }
            ArgumentError::NameInUse => {
                write!(f, "Element name is in use by another element type")
            }
            ArgumentError::InvalidBasePath => write!(f, "Sysfs base path must be absolute"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArgumentError {}

/// Errors returned by element management.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied value was rejected before touching sysfs.
    InvalidArgument(ArgumentError),

    /// Underlying filesystem error, including setup requests refused by the
    /// kernel driver.
    Io(std::io::Error),

    /// A sysfs attribute held content that could not be parsed.
    UnexpectedValue {
        /// Attribute file name.
        attr: &'static str,
    },
}

#[cfg(feature = "std")]
impl From<ArgumentError> for Error {
    fn from(error: ArgumentError) -> Self {
        Error::InvalidArgument(error)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

#[cfg(feature = "std")]
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::UnexpectedValue { attr } => write!(f, "Unexpected value in '{}'", attr),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidArgument(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::UnexpectedValue { .. } => None,
        }
    }
}

#[cfg(all(feature = "std", feature = "defmt"))]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidArgument(e) => defmt::write!(f, "Invalid argument: {}", e),
            Error::Io(_e) => defmt::write!(f, "I/O error"),
            Error::UnexpectedValue { attr } => defmt::write!(f, "Unexpected value in {=str}", *attr),
        }
    }
}

#[cfg(feature = "std")]
impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Convenience alias used throughout the element layer.
#[cfg(feature = "std")]
pub type Result<T> = core::result::Result<T, Error>;

//! Pisound Micro header pins.

use core::fmt;
use core::str::FromStr;

use crate::error::ArgumentError;

/// Number of usable header pins.
pub const PIN_COUNT: usize = 37;

/// A Pisound Micro header pin.
///
/// There are four contiguous index ranges: A27–A32, B03–B18, B23–B34 and
/// B37–B39. The discriminant is the pin index used by the kernel driver and in
/// the packed [`Setup`](crate::Setup) word. [`Pin::Invalid`] (index 37) is the
/// sentinel returned when a raw index does not name a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[rustfmt::skip]
pub enum Pin {
    A27, A28, A29, A30, A31, A32,
    B03, B04, B05, B06, B07, B08, B09, B10,
    B11, B12, B13, B14, B15, B16, B17, B18,
    B23, B24, B25, B26, B27, B28, B29, B30,
    B31, B32, B33, B34,
    B37, B38, B39,
    /// Not a pin.
    Invalid,
}

impl Pin {
    /// Every valid pin, in index order.
    #[rustfmt::skip]
    pub const ALL: [Pin; PIN_COUNT] = [
        Pin::A27, Pin::A28, Pin::A29, Pin::A30, Pin::A31, Pin::A32,
        Pin::B03, Pin::B04, Pin::B05, Pin::B06, Pin::B07, Pin::B08, Pin::B09, Pin::B10,
        Pin::B11, Pin::B12, Pin::B13, Pin::B14, Pin::B15, Pin::B16, Pin::B17, Pin::B18,
        Pin::B23, Pin::B24, Pin::B25, Pin::B26, Pin::B27, Pin::B28, Pin::B29, Pin::B30,
        Pin::B31, Pin::B32, Pin::B33, Pin::B34,
        Pin::B37, Pin::B38, Pin::B39,
    ];

    #[rustfmt::skip]
    const NAMES: [&'static str; PIN_COUNT] = [
        "A27", "A28", "A29", "A30", "A31", "A32",
        "B03", "B04", "B05", "B06", "B07", "B08", "B09", "B10",
        "B11", "B12", "B13", "B14", "B15", "B16", "B17", "B18",
        "B23", "B24", "B25", "B26", "B27", "B28", "B29", "B30",
        "B31", "B32", "B33", "B34",
        "B37", "B38", "B39",
    ];

    /// Look up a pin by index. Out-of-range indices map to [`Pin::Invalid`].
    pub const fn from_index(index: u32) -> Pin {
        if index < PIN_COUNT as u32 {
            Self::ALL[index as usize]
        } else {
            Pin::Invalid
        }
    }

    /// The pin's index; [`Pin::Invalid`] yields [`PIN_COUNT`].
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, Pin::Invalid)
    }

    /// Header label such as `"B03"`, or `""` for [`Pin::Invalid`].
    pub const fn as_str(self) -> &'static str {
        if self.is_valid() {
            Self::NAMES[self as usize]
        } else {
            ""
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pin {
    type Err = ArgumentError;

    /// Parse a header label. The header letter is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(ArgumentError::InvalidPin);
        }

        let header = bytes[0].to_ascii_uppercase();
        Self::NAMES
            .iter()
            .position(|name| {
                let n = name.as_bytes();
                n[0] == header && n[1..] == bytes[1..]
            })
            .map(|i| Self::ALL[i])
            .ok_or(ArgumentError::InvalidPin)
    }
}

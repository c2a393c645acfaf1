//! Element configuration enums shared by the setup codec and the sysfs layer.
//!
//! Each enum carries an `Invalid` member. Decoding a raw bit pattern or a
//! sysfs string that does not name a known member yields `Invalid`; setters
//! reject it.

use core::fmt;
use core::str::FromStr;

use crate::error::ArgumentError;

// ---------------------------------------------------------------------------
// ElementType
// ---------------------------------------------------------------------------

/// Kind of element a [`Setup`](crate::Setup) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ElementType {
    /// Empty setup, nothing to create.
    None,
    /// Rotary encoder on two pins.
    Encoder,
    /// Analog input.
    AnalogInput,
    /// Digital input or output.
    Gpio,
    /// MIDI activity indicator.
    Activity,
    /// Unknown discriminant.
    Invalid,
}

impl ElementType {
    pub const ALL: [ElementType; 5] = [
        ElementType::None,
        ElementType::Encoder,
        ElementType::AnalogInput,
        ElementType::Gpio,
        ElementType::Activity,
    ];

    pub(crate) const fn from_bits(bits: u32) -> Self {
        match bits {
            0 => ElementType::None,
            1 => ElementType::Encoder,
            2 => ElementType::AnalogInput,
            3 => ElementType::Gpio,
            4 => ElementType::Activity,
            _ => ElementType::Invalid,
        }
    }

    pub(crate) const fn to_bits(self) -> Option<u32> {
        match self {
            ElementType::None => Some(0),
            ElementType::Encoder => Some(1),
            ElementType::AnalogInput => Some(2),
            ElementType::Gpio => Some(3),
            ElementType::Activity => Some(4),
            ElementType::Invalid => Option::None,
        }
    }

    /// Whether elements of this type occupy a header pin.
    pub const fn has_pin(self) -> bool {
        matches!(
            self,
            ElementType::Encoder
                | ElementType::AnalogInput
                | ElementType::Gpio
                | ElementType::Activity
        )
    }

    /// Name used by the kernel driver's `type` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementType::None => "none",
            ElementType::Encoder => "encoder",
            ElementType::AnalogInput => "analog_in",
            ElementType::Gpio => "gpio",
            ElementType::Activity => "activity",
            ElementType::Invalid => "",
        }
    }
}

impl FromStr for ElementType {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ArgumentError::InvalidElementType)
    }
}

// ---------------------------------------------------------------------------
// PinDirection
// ---------------------------------------------------------------------------

/// GPIO direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinDirection {
    Input,
    Output,
    Invalid,
}

impl PinDirection {
    pub const ALL: [PinDirection; 2] = [PinDirection::Input, PinDirection::Output];

    pub(crate) const fn from_bits(bits: u32) -> Self {
        match bits {
            0 => PinDirection::Input,
            1 => PinDirection::Output,
            _ => PinDirection::Invalid,
        }
    }

    pub(crate) const fn to_bits(self) -> Option<u32> {
        match self {
            PinDirection::Input => Some(0),
            PinDirection::Output => Some(1),
            PinDirection::Invalid => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PinDirection::Input => "in",
            PinDirection::Output => "out",
            PinDirection::Invalid => "",
        }
    }
}

impl FromStr for PinDirection {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or(ArgumentError::InvalidDirection)
    }
}

// ---------------------------------------------------------------------------
// PinPull
// ---------------------------------------------------------------------------

/// Idle bias of an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinPull {
    /// Floating.
    None,
    Up,
    Down,
    Invalid,
}

impl PinPull {
    pub const ALL: [PinPull; 3] = [PinPull::None, PinPull::Up, PinPull::Down];

    pub(crate) const fn from_bits(bits: u32) -> Self {
        match bits {
            0 => PinPull::None,
            1 => PinPull::Up,
            2 => PinPull::Down,
            _ => PinPull::Invalid,
        }
    }

    pub(crate) const fn to_bits(self) -> Option<u32> {
        match self {
            PinPull::None => Some(0),
            PinPull::Up => Some(1),
            PinPull::Down => Some(2),
            PinPull::Invalid => Option::None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PinPull::None => "pull_none",
            PinPull::Up => "pull_up",
            PinPull::Down => "pull_down",
            PinPull::Invalid => "",
        }
    }
}

impl FromStr for PinPull {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(ArgumentError::InvalidPull)
    }
}

// ---------------------------------------------------------------------------
// ActivityType
// ---------------------------------------------------------------------------

/// Traffic an activity indicator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActivityType {
    MidiInput,
    MidiOutput,
    Invalid,
}

impl ActivityType {
    pub const ALL: [ActivityType; 2] = [ActivityType::MidiInput, ActivityType::MidiOutput];

    pub(crate) const fn from_bits(bits: u32) -> Self {
        match bits {
            0 => ActivityType::MidiInput,
            1 => ActivityType::MidiOutput,
            _ => ActivityType::Invalid,
        }
    }

    pub(crate) const fn to_bits(self) -> Option<u32> {
        match self {
            ActivityType::MidiInput => Some(0),
            ActivityType::MidiOutput => Some(1),
            ActivityType::Invalid => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ActivityType::MidiInput => "midi_in",
            ActivityType::MidiOutput => "midi_out",
            ActivityType::Invalid => "",
        }
    }
}

impl FromStr for ActivityType {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or(ArgumentError::InvalidActivityType)
    }
}

// ---------------------------------------------------------------------------
// ValueMode
// ---------------------------------------------------------------------------

/// What an encoder does when its value leaves the input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueMode {
    /// Stop at the range boundary.
    #[default]
    Clamp,
    /// Continue from the opposite boundary.
    Wrap,
    Invalid,
}

impl ValueMode {
    pub const ALL: [ValueMode; 2] = [ValueMode::Clamp, ValueMode::Wrap];

    pub const fn as_str(self) -> &'static str {
        match self {
            ValueMode::Clamp => "clamp",
            ValueMode::Wrap => "wrap",
            ValueMode::Invalid => "",
        }
    }
}

impl FromStr for ValueMode {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(ArgumentError::InvalidValueMode)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PinPull {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ValueMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_bits_follow_driver_numbering() {
        assert_eq!(ElementType::None.to_bits(), Some(0));
        assert_eq!(ElementType::Encoder.to_bits(), Some(1));
        assert_eq!(ElementType::AnalogInput.to_bits(), Some(2));
        assert_eq!(ElementType::Gpio.to_bits(), Some(3));
        assert_eq!(ElementType::Activity.to_bits(), Some(4));
        assert_eq!(ElementType::Invalid.to_bits(), None);
    }

    #[test]
    fn unknown_bits_decode_to_invalid() {
        for bits in 5..8 {
            assert_eq!(ElementType::from_bits(bits), ElementType::Invalid);
        }
        assert_eq!(PinPull::from_bits(3), PinPull::Invalid);
        assert_eq!(ActivityType::from_bits(2), ActivityType::Invalid);
        assert_eq!(ActivityType::from_bits(3), ActivityType::Invalid);
        assert_eq!(PinDirection::from_bits(2), PinDirection::Invalid);
    }

    #[test]
    fn sysfs_strings_parse_back() {
        assert_eq!("analog_in".parse(), Ok(ElementType::AnalogInput));
        assert_eq!("out".parse(), Ok(PinDirection::Output));
        assert_eq!("pull_down".parse(), Ok(PinPull::Down));
        assert_eq!("midi_out".parse(), Ok(ActivityType::MidiOutput));
        assert_eq!("wrap".parse(), Ok(ValueMode::Wrap));
    }

    #[test]
    fn empty_string_never_parses() {
        // `Invalid` renders as "", which must not parse back to anything.
        assert_eq!("".parse::<ElementType>(), Err(ArgumentError::InvalidElementType));
        assert_eq!("".parse::<PinDirection>(), Err(ArgumentError::InvalidDirection));
        assert_eq!("".parse::<PinPull>(), Err(ArgumentError::InvalidPull));
        assert_eq!("".parse::<ActivityType>(), Err(ArgumentError::InvalidActivityType));
        assert_eq!("".parse::<ValueMode>(), Err(ArgumentError::InvalidValueMode));
    }

    #[test]
    fn has_pin_excludes_none_and_invalid() {
        assert!(!ElementType::None.has_pin());
        assert!(!ElementType::Invalid.has_pin());
        assert!(ElementType::Gpio.has_pin());
        assert!(ElementType::Encoder.has_pin());
    }
}

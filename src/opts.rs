//! Value mapping options for encoders and analog inputs.

use crate::types::ValueMode;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Range {
    pub low: i32,
    pub high: i32,
}

impl Range {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }
}

/// Encoder value mapping.
///
/// The driver counts detents within `input_range`, maps them linearly onto
/// `value_range`, and either clamps or wraps at the ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderOpts {
    pub input_range: Range,
    pub value_range: Range,
    pub value_mode: ValueMode,
}

impl Default for EncoderOpts {
    fn default() -> Self {
        Self {
            input_range: Range::new(0, 23),
            value_range: Range::new(0, 23),
            value_mode: ValueMode::Clamp,
        }
    }
}

/// Analog input value mapping. Raw readings are 10-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogInputOpts {
    pub input_range: Range,
    pub value_range: Range,
}

impl Default for AnalogInputOpts {
    fn default() -> Self {
        Self {
            input_range: Range::new(0, 1023),
            value_range: Range::new(0, 1023),
        }
    }
}

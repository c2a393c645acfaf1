//! Rotary encoder elements.

use crate::driver::Attr;
use crate::element::element_view;
use crate::error::{ArgumentError, Result};
use crate::opts::{EncoderOpts, Range};
use crate::pin::Pin;
use crate::types::{PinPull, ValueMode};

element_view! {
    /// A quadrature rotary encoder on two header pins.
    Encoder
}

impl Encoder {
    /// Current mapped value.
    pub fn value(&self) -> Result<i32> {
        self.read_int(Attr::Value)
    }

    pub fn opts(&self) -> Result<EncoderOpts> {
        Ok(EncoderOpts {
            input_range: Range::new(
                self.read_int(Attr::InputMin)?,
                self.read_int(Attr::InputMax)?,
            ),
            value_range: Range::new(
                self.read_int(Attr::ValueLow)?,
                self.read_int(Attr::ValueHigh)?,
            ),
            value_mode: self.read_parsed(Attr::ValueMode)?,
        })
    }

    /// Apply value mapping options.
    ///
    /// # Errors
    /// * [`ArgumentError::InvalidValueMode`] for [`ValueMode::Invalid`],
    ///   before anything is written
    pub fn set_opts(&self, opts: &EncoderOpts) -> Result<()> {
        if opts.value_mode == ValueMode::Invalid {
            return Err(ArgumentError::InvalidValueMode.into());
        }
        self.write_int(Attr::InputMin, opts.input_range.low)?;
        self.write_int(Attr::InputMax, opts.input_range.high)?;
        self.write_int(Attr::ValueLow, opts.value_range.low)?;
        self.write_int(Attr::ValueHigh, opts.value_range.high)?;
        self.write_str(Attr::ValueMode, opts.value_mode.as_str())
    }

    /// Pull of the first pin.
    pub fn pin_pull(&self) -> Result<PinPull> {
        self.read_parsed(Attr::PinPull)
    }

    pub fn pin_b(&self) -> Result<Pin> {
        self.read_pin(Attr::PinB)
    }

    /// Second pin by header label.
    pub fn pin_b_name(&self) -> Result<Pin> {
        self.read_parsed(Attr::PinBName)
    }

    pub fn pin_b_pull(&self) -> Result<PinPull> {
        self.read_parsed(Attr::PinBPull)
    }
}

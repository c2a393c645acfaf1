//! Analog input elements.

use crate::driver::Attr;
use crate::element::element_view;
use crate::error::Result;
use crate::opts::{AnalogInputOpts, Range};

element_view! {
    /// A header pin sampled by the ADC.
    AnalogInput
}

impl AnalogInput {
    /// Current mapped value.
    pub fn value(&self) -> Result<i32> {
        self.read_int(Attr::Value)
    }

    pub fn opts(&self) -> Result<AnalogInputOpts> {
        Ok(AnalogInputOpts {
            input_range: Range::new(
                self.read_int(Attr::InputMin)?,
                self.read_int(Attr::InputMax)?,
            ),
            value_range: Range::new(
                self.read_int(Attr::ValueLow)?,
                self.read_int(Attr::ValueHigh)?,
            ),
        })
    }

    pub fn set_opts(&self, opts: &AnalogInputOpts) -> Result<()> {
        self.write_int(Attr::InputMin, opts.input_range.low)?;
        self.write_int(Attr::InputMax, opts.input_range.high)?;
        self.write_int(Attr::ValueLow, opts.value_range.low)?;
        self.write_int(Attr::ValueHigh, opts.value_range.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Pin;
    use crate::test_support::FakeSysfs;
    use crate::Context;

    #[test]
    fn setup_applies_opts() {
        let fake = FakeSysfs::new();
        fake.add_element(
            "pot",
            &[
                ("value", "1023\n"),
                ("input_min", "0\n"),
                ("input_max", "1023\n"),
                ("value_low", "0\n"),
                ("value_high", "1023\n"),
            ],
        );
        let ctx = Context::open_with(fake.config()).unwrap();

        let opts = AnalogInputOpts {
            input_range: Range::new(0, 1023),
            value_range: Range::new(0, 100),
        };
        let pot = ctx.setup_analog_input("pot", Pin::B23, Some(&opts)).unwrap();

        assert_eq!(pot.opts().unwrap(), opts);
        assert_eq!(fake.attr("pot", "value_high"), "100");
        assert_eq!(pot.value().unwrap(), 1023);
    }
}

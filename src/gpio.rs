//! GPIO elements.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::driver::Attr;
use crate::element::element_view;
use crate::error::{Error, Result};
use crate::types::{PinDirection, PinPull};

element_view! {
    /// A header pin used as a digital input or output.
    ///
    /// Also usable through the `embedded-hal` digital traits. Each call is a
    /// sysfs round trip; hot loops should read through
    /// [`open_value_fd`](crate::Element::open_value_fd) instead.
    Gpio
}

impl Gpio {
    pub fn direction(&self) -> Result<PinDirection> {
        self.read_parsed(Attr::Direction)
    }

    /// Pull of an input. Outputs report [`PinPull::None`].
    pub fn pull(&self) -> Result<PinPull> {
        self.read_parsed(Attr::PinPull)
    }

    /// Current level; `true` is high.
    pub fn value(&self) -> Result<bool> {
        Ok(self.read_int(Attr::Value)? != 0)
    }

    /// Drive an output. Inputs refuse the write.
    pub fn set_value(&self, high: bool) -> Result<()> {
        self.write_int(Attr::Value, high as i32)
    }
}

impl ErrorType for Gpio {
    type Error = Error;
}

impl InputPin for Gpio {
    fn is_high(&mut self) -> Result<bool> {
        self.value()
    }

    fn is_low(&mut self) -> Result<bool> {
        Ok(!self.value()?)
    }
}

impl OutputPin for Gpio {
    fn set_low(&mut self) -> Result<()> {
        self.set_value(false)
    }

    fn set_high(&mut self) -> Result<()> {
        self.set_value(true)
    }
}

impl StatefulOutputPin for Gpio {
    fn is_set_high(&mut self) -> Result<bool> {
        self.value()
    }

    fn is_set_low(&mut self) -> Result<bool> {
        Ok(!self.value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Pin;
    use crate::test_support::FakeSysfs;
    use crate::Context;

    #[test]
    fn reads_direction_and_pull() {
        let fake = FakeSysfs::new();
        let ctx = Context::open_with(fake.config()).unwrap();
        let g = ctx.setup_gpio_input("btn", Pin::B03, PinPull::Down).unwrap();
        fake.add_element("btn", &[("direction", "in\n"), ("pin_pull", "pull_down\n")]);

        assert_eq!(g.direction().unwrap(), PinDirection::Input);
        assert_eq!(g.pull().unwrap(), PinPull::Down);
    }

    #[test]
    fn value_is_boolean() {
        let fake = FakeSysfs::new();
        let ctx = Context::open_with(fake.config()).unwrap();
        let mut g = ctx.setup_gpio_input("btn", Pin::B03, PinPull::Up).unwrap();
        fake.add_element("btn", &[("value", "1\n")]);
        assert!(g.value().unwrap());
        assert!(g.is_high().unwrap());

        fake.set_attr("btn", "value", "0\n");
        assert!(g.is_low().unwrap());
    }

    #[test]
    fn output_pin_traits_write_value() {
        let fake = FakeSysfs::new();
        let ctx = Context::open_with(fake.config()).unwrap();
        let mut led = ctx.setup_gpio_output("led", Pin::B05, false).unwrap();
        fake.add_element("led", &[("value", "0\n")]);

        led.set_high().unwrap();
        assert_eq!(fake.attr("led", "value"), "1");
        assert!(led.is_set_high().unwrap());

        led.toggle().unwrap();
        assert_eq!(fake.attr("led", "value"), "0");
        assert!(led.is_set_low().unwrap());
    }

    #[test]
    fn unknown_direction_is_unexpected() {
        let fake = FakeSysfs::new();
        let ctx = Context::open_with(fake.config()).unwrap();
        let g = ctx.setup_gpio_input("btn", Pin::B03, PinPull::Up).unwrap();
        fake.add_element("btn", &[("direction", "both\n")]);
        assert!(matches!(
            g.direction(),
            Err(Error::UnexpectedValue { attr: "direction" })
        ));
    }
}

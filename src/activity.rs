//! Activity indicator elements.

use crate::driver::Attr;
use crate::element::element_view;
use crate::error::Result;
use crate::types::ActivityType;

element_view! {
    /// A header pin that blinks on MIDI traffic.
    Activity
}

impl Activity {
    pub fn activity_type(&self) -> Result<ActivityType> {
        self.read_parsed(Attr::ActivityType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Pin;
    use crate::test_support::FakeSysfs;
    use crate::Context;

    #[test]
    fn reads_activity_type() {
        let fake = FakeSysfs::new();
        let ctx = Context::open_with(fake.config()).unwrap();
        let act = ctx
            .setup_activity("midi", Pin::B09, ActivityType::MidiInput)
            .unwrap();
        fake.add_element("midi", &[("activity_type", "midi_in\n")]);
        assert_eq!(act.activity_type().unwrap(), ActivityType::MidiInput);
    }
}

//! Element setup and sysfs management for the Pisound Micro I/O expander.
//!
//! The Pisound Micro kernel driver exposes the board's 37 header pins through
//! a sysfs tree. Writing a request line to `<base>/setup` creates a named
//! element (encoder, analog input, GPIO or MIDI activity indicator) under
//! `<base>/elements/<name>/`, whose attribute files are then read and written
//! to operate it. Writing the name to `<base>/unsetup` removes it again.
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - **Codec** (`no_std`): [`Pin`], the type enums, the packed [`Setup`]
//!   word, validated [`ElementName`]s and [`format_request`], which renders
//!   a setup as the driver's request line.
//! - **`driver`** (crate-private): sysfs file primitives that handle path
//!   layout, attribute retries and value parsing.
//! - **[`Context`]** (public, `std`): tracks live elements by name, hands out
//!   shared [`Element`] handles and typed views ([`Encoder`], [`AnalogInput`],
//!   [`Gpio`], [`Activity`]) and unsetups elements once their last handle is
//!   dropped.
//!
//! # Quick start
//!
//! ```no_run
//! use pisound_micro::{Context, Pin, PinPull};
//!
//! let ctx = Context::open()?;
//!
//! let knob = ctx.setup_encoder("knob", Pin::B03, PinPull::Up, Pin::B04, PinPull::Up, None)?;
//! let led = ctx.setup_gpio_output("led", Pin::B05, false)?;
//!
//! led.set_value(knob.value()? > 10)?;
//! # Ok::<(), pisound_micro::Error>(())
//! ```
//!
//! # Features
//!
//! - **`std`** (default): the sysfs layer. Without it only the codec is
//!   built, and the crate is `no_std`.
//! - **`defmt`**: [`defmt::Format`] implementations on public types and
//!   debug logging of sysfs traffic.

#![cfg_attr(not(feature = "std"), no_std)]

pub use error::ArgumentError;
pub use name::{ElementName, MAX_NAME_LEN, MAX_PREFIX_LEN};
pub use opts::{AnalogInputOpts, EncoderOpts, Range};
pub use pin::{Pin, PIN_COUNT};
pub use request::{format_request, Request, MAX_REQUEST_LEN};
pub use setup::Setup;
pub use types::{ActivityType, ElementType, PinDirection, PinPull, ValueMode};

#[cfg(feature = "std")]
pub use activity::Activity;
#[cfg(feature = "std")]
pub use analog_input::AnalogInput;
#[cfg(feature = "std")]
pub use config::{Config, DEFAULT_SYSFS_BASE};
#[cfg(feature = "std")]
pub use context::Context;
#[cfg(feature = "std")]
pub use element::{Element, ElementKind};
#[cfg(feature = "std")]
pub use encoder::Encoder;
#[cfg(feature = "std")]
pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use gpio::Gpio;
#[cfg(feature = "std")]
pub use value_fd::{Access, ValueFd};

mod error;
mod fields;
mod name;
mod opts;
mod pin;
#[cfg_attr(not(feature = "std"), allow(dead_code))]
mod random;
mod request;
mod setup;
mod types;

#[cfg(feature = "std")]
mod activity;
#[cfg(feature = "std")]
mod analog_input;
#[cfg(feature = "std")]
mod config;
#[cfg(feature = "std")]
mod context;
#[cfg(feature = "std")]
mod driver;
#[cfg(feature = "std")]
mod element;
#[cfg(feature = "std")]
mod encoder;
#[cfg(feature = "std")]
mod gpio;
#[cfg(feature = "std")]
mod value_fd;

#[cfg(all(test, feature = "std"))]
mod test_support;

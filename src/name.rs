//! Element names.

use core::fmt::{self, Write};
use core::ops::Deref;
use core::str::FromStr;

use heapless::String;
use rand_core::RngCore;

use crate::error::ArgumentError;
use crate::random;

/// Longest element name in bytes.
pub const MAX_NAME_LEN: usize = 63;

/// Length of the random part of a generated name.
pub const RANDOM_NAME_LEN: usize = 22;

/// Longest prefix accepted by [`ElementName::randomized`]; leaves room for
/// the `-` separator and the random part.
pub const MAX_PREFIX_LEN: usize = MAX_NAME_LEN - RANDOM_NAME_LEN - 1;

/// A validated element name: 1 to 63 bytes, no `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementName(String<MAX_NAME_LEN>);

impl ElementName {
    pub fn new(name: &str) -> Result<Self, ArgumentError> {
        validate(name)?;
        let mut s = String::new();
        s.push_str(name).map_err(|_| ArgumentError::InvalidName)?;
        Ok(Self(s))
    }

    /// Build a name from format arguments.
    ///
    /// ```
    /// use pisound_micro::ElementName;
    ///
    /// let name = ElementName::from_fmt(format_args!("knob{}", 3)).unwrap();
    /// assert_eq!(name.as_str(), "knob3");
    /// ```
    pub fn from_fmt(args: fmt::Arguments) -> Result<Self, ArgumentError> {
        let mut s = String::<MAX_NAME_LEN>::new();
        s.write_fmt(args).map_err(|_| ArgumentError::InvalidName)?;
        validate(&s)?;
        Ok(Self(s))
    }

    /// `<prefix>-<22 random chars>`, or just the random part when `prefix`
    /// is empty.
    #[cfg_attr(not(feature = "std"), allow(dead_code))]
    pub(crate) fn randomized<R: RngCore>(prefix: &str, rng: &mut R) -> Result<Self, ArgumentError> {
        if prefix.len() > MAX_PREFIX_LEN || prefix.contains('/') {
            return Err(ArgumentError::InvalidName);
        }

        let id = random::base64url::<RANDOM_NAME_LEN>(&random::next_id(rng))
            .ok_or(ArgumentError::InvalidName)?;

        let mut s = String::new();
        if !prefix.is_empty() {
            s.push_str(prefix).map_err(|_| ArgumentError::InvalidName)?;
            s.push('-').map_err(|_| ArgumentError::InvalidName)?;
        }
        s.push_str(&id).map_err(|_| ArgumentError::InvalidName)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(name: &str) -> Result<(), ArgumentError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains('/') {
        return Err(ArgumentError::InvalidName);
    }
    Ok(())
}

impl Deref for ElementName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ElementName {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ElementName {
    type Error = ArgumentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ElementName {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}

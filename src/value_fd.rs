//! Owned descriptor for an element's `value` attribute.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use crate::driver;
use crate::error::Result;

/// How to open an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    #[default]
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub(crate) fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Access::ReadOnly => options.read(true),
            Access::WriteOnly => options.write(true),
            Access::ReadWrite => options.read(true).write(true),
        };
        options
    }
}

/// Open `value` attribute of an element.
///
/// Keeping the file open avoids a path lookup per access, and the raw
/// descriptor can be handed to `poll(2)`: the driver notifies `POLLPRI` when
/// the value changes. The descriptor is closed when the `ValueFd` is dropped
/// unless ownership is moved out with [`take`](Self::take).
#[derive(Debug)]
pub struct ValueFd {
    file: File,
}

impl ValueFd {
    pub(crate) fn new(file: File) -> Self {
        Self { file }
    }

    /// Read the current value.
    pub fn read(&mut self) -> Result<i32> {
        driver::read_value(&mut self.file, "value")
    }

    /// Write a new value. Only GPIO outputs accept writes.
    pub fn write(&mut self, value: i32) -> Result<()> {
        driver::write_value(&mut self.file, value)?;
        Ok(())
    }

    /// Duplicate the descriptor.
    pub fn try_clone(&self) -> Result<ValueFd> {
        Ok(ValueFd::new(self.file.try_clone()?))
    }

    /// Give up ownership of the descriptor.
    pub fn take(self) -> OwnedFd {
        self.file.into()
    }

    pub fn close(self) {
        drop(self.file);
    }
}

impl AsFd for ValueFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for ValueFd {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl From<ValueFd> for OwnedFd {
    fn from(fd: ValueFd) -> Self {
        fd.take()
    }
}

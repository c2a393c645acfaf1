//! Bit-field layout of the packed element setup word.
//!
//! The layout is fixed by the kernel driver and the native library; it is an
//! ABI contract, not something to re-derive. Several fields share bits, and
//! which one is live depends on the element type (and, for GPIO, on the
//! direction):
//!
//! ```text
//!  31        23 22 21 20            13 12 11 10             3 2     0
//! +------------+-----+----------------+-----+----------------+-------+
//! |   unused   |pullB|    pin B       |pull |      pin       | type  |  encoder
//! |   unused   |     |           dir  |out  |      pin       | type  |  gpio output
//! |   unused   |     |           dir  |pull |      pin       | type  |  gpio input
//! |   unused   |     |                |act  |      pin       | type  |  activity
//! +------------+-----+----------------+-----+----------------+-------+
//! ```

/// A contiguous run of bits inside the setup word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Mask of the field's bits, already shifted into place.
    pub const fn mask(self) -> u32 {
        ((1 << self.width) - 1) << self.shift
    }

    /// Extract the raw field value.
    pub const fn get(self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }

    /// Replace the field in `word`. Excess high bits of `value` are dropped.
    pub const fn set(self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }
}

// ---------------------------------------------------------------------------
// Common fields
// ---------------------------------------------------------------------------

/// Element type discriminant.
pub(crate) const ELEMENT_TYPE: Field = Field::new(0, 3);

/// Main pin index.
pub(crate) const PIN: Field = Field::new(3, 8);

// ---------------------------------------------------------------------------
// GPIO and encoder pin A
// ---------------------------------------------------------------------------

/// Pull of a GPIO input, or of the encoder's first pin.
pub(crate) const GPIO_PULL: Field = Field::new(11, 2);

/// Initial level of a GPIO output. Overlaps the high bit of [`GPIO_PULL`].
pub(crate) const GPIO_OUTPUT: Field = Field::new(12, 1);

/// GPIO direction. Overlaps the low bit of [`ENCODER_PIN_B`].
pub(crate) const GPIO_DIRECTION: Field = Field::new(13, 1);

// ---------------------------------------------------------------------------
// Encoder pin B
// ---------------------------------------------------------------------------

/// Second encoder pin index.
pub(crate) const ENCODER_PIN_B: Field = Field::new(13, 8);

/// Pull of the second encoder pin.
pub(crate) const ENCODER_PIN_B_PULL: Field = Field::new(21, 2);

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// Activity indicator type. Shares bits with [`GPIO_PULL`].
pub(crate) const ACTIVITY_TYPE: Field = Field::new(11, 2);

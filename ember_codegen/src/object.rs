//! References to runtime objects, as seen by the code buffer.
//!
//! The object model itself lives elsewhere; the buffer only needs the
//! reference bits to embed and two properties of the referenced object,
//! carried here as flags.

use bitflags::bitflags;

bitflags!
{
    /// Properties of a referenced object that embedding depends on.
    pub struct RefFlags: u8
    {
        /// The object lives at least as long as the generated code.
        ///
        /// Embedding a reference to a short-lived object would leave a
        /// dangling reference in the code once the object is collected.
        const LONG_LIVED = 1 << 0;

        /// A relocating collector tracks references to the object and
        /// rewrites them when the object moves.
        const RELOCATION_TRACKED = 1 << 1;
    }
}

/// Reference to a runtime object, ready to be embedded in code.
///
/// The reference bits are opaque to the buffer; it stores them verbatim
/// at the recorded offset when the buffer is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRef
{
    bits: u64,
    flags: RefFlags,
}

impl ObjectRef
{
    /// Create a reference from its bits and the properties of its object.
    pub fn new(bits: u64, flags: RefFlags) -> Self
    {
        Self{bits, flags}
    }

    /// The bits written into the code.
    pub fn bits(self) -> u64
    {
        self.bits
    }

    /// Whether the object outlives the generated code.
    pub fn is_long_lived(self) -> bool
    {
        self.flags.contains(RefFlags::LONG_LIVED)
    }

    /// Whether a relocating collector tracks references to the object.
    pub fn is_relocation_tracked(self) -> bool
    {
        self.flags.contains(RefFlags::RELOCATION_TRACKED)
    }
}

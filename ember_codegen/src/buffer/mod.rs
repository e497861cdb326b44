//! Relocatable machine-code buffer.
//!
//! # Emission, fixups, finalization
//!
//! A [`CodeBuffer`] holds the bytes of one compilation unit while they
//! are generated. Plain instruction bytes go in through the `emit_*`
//! methods. References to runtime objects go in through
//! [`emit_object_reference`][`CodeBuffer::emit_object_reference`],
//! which records a [`Fixup`] and reserves the bytes: the reference is
//! only written once [`finalize`][`CodeBuffer::finalize`] has copied
//! the code into its permanent region.
//!
//! All bookkeeping is relative to the start of the buffer, so growing
//! the backing storage moves no offsets, only the base pointer.

pub use self::buffer::*;
pub use self::fixup::*;

mod buffer;
mod fixup;
mod reserve;

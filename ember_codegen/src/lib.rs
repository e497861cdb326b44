//! This crate implements the relocatable code buffer of the runtime.
//!
//! A code generator emits instruction bytes into a
//! [`CodeBuffer`][`buffer::CodeBuffer`] backed by an [`Arena`][`arena::Arena`].
//! References to runtime objects cannot be written at emission time,
//! because the final address of the surrounding code is not known yet;
//! they are recorded as fixups and patched when the buffer is
//! finalized into a permanent [`MemoryRegion`][`region::MemoryRegion`].

#![no_std]
#![warn(missing_docs)]

extern crate alloc;
extern crate core;

pub mod arena;
pub mod buffer;
pub mod object;
pub mod region;

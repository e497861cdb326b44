//! This crate implements the cross-context message values of the runtime.
//!
//! Execution contexts share no mutable heap, so results and errors
//! cross the boundary as trees of self-describing [`Value`]s
//! ([`value::Value`]). Error conditions travel as arrays led by an
//! integer discriminant ([`envelope`]), and the one-shot send
//! primitive is abstracted by [`transport::Transport`].
//!
//! [`Value`]: `value::Value`

#![no_std]
#![warn(missing_docs)]

extern crate alloc;
extern crate core;

pub mod envelope;
pub mod transport;
pub mod value;

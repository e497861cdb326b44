use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::str;

/// Owned text payload of a value.
///
/// The length is stored explicitly and the bytes additionally carry a
/// trailing NUL terminator, so the payload can be handed to C-style
/// consumers without copying. The terminator is not counted by the
/// length, and the bytes before it may contain interior NULs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZString
{
    /// Invariant: never empty; the last byte is 0.
    bytes: Box<[u8]>,
}

impl ZString
{
    /// Copy the given text, appending a terminator.
    pub fn new(text: &str) -> Self
    {
        Self::from_bytes(text.as_bytes())
    }

    /// Copy the given bytes, appending a terminator.
    pub fn from_bytes(bytes: &[u8]) -> Self
    {
        let mut storage = Vec::with_capacity(bytes.len() + 1);
        storage.extend_from_slice(bytes);
        storage.push(0);
        Self{bytes: storage.into_boxed_slice()}
    }

    /// Create a string of the given length and let `fill` write it.
    ///
    /// The payload starts zeroed. This is for producers that know the
    /// length up front and produce the bytes in a streaming fashion.
    pub fn with_len(len: usize, fill: impl FnOnce(&mut [u8])) -> Self
    {
        let mut storage = vec![0u8; len + 1];
        fill(&mut storage[.. len]);
        Self{bytes: storage.into_boxed_slice()}
    }

    /// Length in bytes, excluding the terminator.
    pub fn len(&self) -> usize
    {
        self.bytes.len() - 1
    }

    /// Whether the string has no bytes before the terminator.
    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// The bytes, excluding the terminator.
    pub fn as_bytes(&self) -> &[u8]
    {
        &self.bytes[.. self.len()]
    }

    /// The bytes, including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8]
    {
        &self.bytes
    }

    /// The text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str>
    {
        str::from_utf8(self.as_bytes()).ok()
    }
}
